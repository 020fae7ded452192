//! YAML replay scripts: initial sections plus a list of mutation steps.

mod replay_script;
mod step;
mod yaml;

pub use replay_script::{ReplayScript, ScriptError};
pub use step::Step;
