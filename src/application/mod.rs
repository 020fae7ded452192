mod application;
mod changeset_printer;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use changeset_printer::{ChangesetPrinter, format_operation, format_tree};
pub use runtime_config::RuntimeConfig;
