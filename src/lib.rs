//! An observable two-level tree of sections and items.
//!
//! Mutations go through [`ObservableSections`], which describes each one as a [`Changeset`] of
//! inserts, deletes, updates and moves addressed by [`IndexPath`]s. Bulk replacement of a
//! section's items can be described either as one section update or as a minimal item-level
//! edit script computed by [`diff::flat_diff`].

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod changeset;
pub mod cli;
pub mod diff;
pub mod observe;
pub mod script;
pub mod tree;

pub use changeset::{Changeset, Operation};
pub use observe::{ChangesetSink, ChannelSink, ObservableSections};
pub use tree::{IndexPath, ItemPath, Node, Section, SectionedTree, TreeError};
