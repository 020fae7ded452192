use std::slice;
use std::sync::Arc;

use crate::changeset::Operation;
use crate::tree::{SectionedTree, TreeError};

/// Every operation produced by one logical mutation, plus the tree as it looked afterwards.
///
/// Operations are ordered: replaying them one by one onto the tree as it was before the
/// mutation yields [`Changeset::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset<S, I> {
    operations: Vec<Operation<S, I>>,
    snapshot: Arc<SectionedTree<S, I>>,
}

impl<S, I> Changeset<S, I> {
    pub fn new(operations: Vec<Operation<S, I>>, snapshot: Arc<SectionedTree<S, I>>) -> Self {
        Self {
            operations,
            snapshot,
        }
    }

    pub fn operations(&self) -> &[Operation<S, I>] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation<S, I>> {
        self.operations
    }

    pub fn snapshot(&self) -> &Arc<SectionedTree<S, I>> {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Whether this changeset resets the whole tree instead of describing individual edits.
    pub fn is_reload(&self) -> bool {
        self.operations.iter().any(Operation::is_reload)
    }

    pub fn iter(&self) -> slice::Iter<'_, Operation<S, I>> {
        self.operations.iter()
    }
}

impl<S: Clone, I: Clone> Changeset<S, I> {
    /// Applies the operations in order to `target`, which must hold the pre-mutation state.
    pub fn replay_onto(&self, target: &mut SectionedTree<S, I>) -> Result<(), TreeError> {
        for operation in &self.operations {
            match operation {
                Operation::Insert { path, node } => target.insert(node.clone(), *path)?,
                Operation::Delete { path } => {
                    target.remove(*path)?;
                }
                Operation::Update { path, node } => {
                    target.set(*path, node.clone())?;
                }
                Operation::Move { from, to } => target.move_node(*from, *to)?,
                Operation::Reload => *target = SectionedTree::clone(&self.snapshot),
            }
        }
        Ok(())
    }
}

impl<'a, S, I> IntoIterator for &'a Changeset<S, I> {
    type Item = &'a Operation<S, I>;
    type IntoIter = slice::Iter<'a, Operation<S, I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
