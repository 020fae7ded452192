use crate::changeset::Operation;
use crate::diff::{FlatEdit, flat_diff};
use crate::tree::{IndexPath, Node};

/// Diffs two item lists of one section and anchors the result at item paths of that section.
///
/// The returned operations only describe the change. Storage is updated separately by
/// assigning the new list, never by replaying these operations.
pub fn diff_section_items<S, I, F>(
    section: usize,
    old: &[I],
    new: &[I],
    equal: F,
) -> Vec<Operation<S, I>>
where
    I: Clone,
    F: FnMut(&I, &I) -> bool,
{
    flat_diff(old, new, equal)
        .into_iter()
        .map(|edit| match edit {
            FlatEdit::Delete { index } => Operation::Delete {
                path: IndexPath::item(section, index),
            },
            FlatEdit::Insert { index, value } => Operation::Insert {
                path: IndexPath::item(section, index),
                node: Node::Item(value.clone()),
            },
        })
        .collect()
}
