use std::fmt;

use derive_more::IsVariant;

use crate::tree::{IndexPath, Node};

/// One structural change to a tree, anchored at a path.
///
/// `Delete` paths refer to the tree before the deletion, `Insert` paths to the tree after the
/// insertion. `Move` follows remove-then-insert semantics: `to` is resolved after `from` has
/// been taken out. `Reload` says the whole tree was reset and carries no paths.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum Operation<S, I> {
    Insert { path: IndexPath, node: Node<S, I> },
    Delete { path: IndexPath },
    Update { path: IndexPath, node: Node<S, I> },
    Move { from: IndexPath, to: IndexPath },
    Reload,
}

impl<S, I> Operation<S, I> {
    /// The path an observer should look at first: the target for most operations, the source
    /// for moves.
    pub fn path(&self) -> Option<IndexPath> {
        match self {
            Operation::Insert { path, .. }
            | Operation::Delete { path }
            | Operation::Update { path, .. } => Some(*path),
            Operation::Move { from, .. } => Some(*from),
            Operation::Reload => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Insert { .. } => "insert",
            Operation::Delete { .. } => "delete",
            Operation::Update { .. } => "update",
            Operation::Move { .. } => "move",
            Operation::Reload => "reload",
        }
    }
}

impl<S, I> fmt::Display for Operation<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert { path, node } => write!(f, "insert {} at {}", node.kind(), path),
            Operation::Delete { path } => write!(f, "delete {}", path),
            Operation::Update { path, node } => write!(f, "update {} at {}", node.kind(), path),
            Operation::Move { from, to } => write!(f, "move {} -> {}", from, to),
            Operation::Reload => write!(f, "reload"),
        }
    }
}
