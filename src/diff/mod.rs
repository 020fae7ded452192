//! Ordered list diffing, and its translation into item-level operations of one section.

mod flat_diff;
mod section_diff;

pub use flat_diff::{FlatEdit, flat_diff};
pub use section_diff::diff_section_items;
