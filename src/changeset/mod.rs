//! Descriptions of structural changes and their per-mutation batches.

mod changeset;
mod operation;

pub use changeset::Changeset;
pub use operation::Operation;
