//! Two-level tree storage.
//!
//! The tree is an ordered list of sections. Each section carries metadata and an ordered list of
//! items. Nodes are addressed by [`IndexPath`]s of length one (sections) or two (items).

mod errors;
mod node;
mod path;
mod sectioned_tree;

pub use errors::TreeError;
pub(crate) use errors::IndexOutOfRangeSnafu;
pub use node::{Node, NodeKind, NodeRef, Section};
pub use path::{IndexPath, ItemPath};
pub use sectioned_tree::SectionedTree;
