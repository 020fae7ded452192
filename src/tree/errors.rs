use snafu::Snafu;

use super::node::NodeKind;
use super::path::IndexPath;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("Path {} is out of range", path))]
    IndexOutOfRange { path: IndexPath },
    #[snafu(display(
        "Expected a {} node at path {}, got a {} node",
        expected,
        path,
        found
    ))]
    TypeMismatch {
        path: IndexPath,
        expected: NodeKind,
        found: NodeKind,
    },
    #[snafu(display("Paths must have one or two components, got {}", length))]
    InvalidPathLength { length: usize },
    #[snafu(display("Cannot move {} to {}: both paths must share a parent", from, to))]
    UnsupportedMove { from: IndexPath, to: IndexPath },
}
