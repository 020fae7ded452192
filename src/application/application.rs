use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{ChangesetPrinter, RuntimeConfig, format_tree};
use crate::observe::ObservableSections;
use crate::script::{ReplayScript, ScriptError};
use crate::tree::TreeError;

pub struct Application;

impl Application {
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let script = ReplayScript::read(&app_config.script).context(ScriptSnafu)?;
        debug!("Loaded replay script: {:?}", script);

        let mut sections = ObservableSections::from_sections(script.sections().to_vec());
        sections.subscribe(ChangesetPrinter::new(app_config.color));

        for (index, step) in script.steps().iter().enumerate() {
            debug!("Applying step {}: {:?}", index, step);
            step.apply(&mut sections).context(StepSnafu {
                index,
                name: step.name(),
            })?;
        }
        info!("Applied {} steps", script.steps().len());

        for line in format_tree(sections.tree()) {
            println!("{}", line);
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the replay script"))]
    ScriptError { source: ScriptError },
    #[snafu(display("Step {} ({}) could not be applied", index, name))]
    StepError {
        index: usize,
        name: &'static str,
        source: TreeError,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_for(file: &NamedTempFile) -> RuntimeConfig {
        RuntimeConfig {
            script: file.path().to_path_buf(),
            color: false,
        }
    }

    #[test]
    fn application_runs_a_valid_script() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(
            file,
            "sections:\n  - title: Fruit\n    items: [pear, apple]\nsteps:\n  - sort_items: {{ section: 0, diff: true }}\n  - append_section: {{ title: Veg }}"
        )
        .expect("Failed to write to temp file");

        Application::run(config_for(&file)).expect("Script should run");
    }

    #[test]
    fn application_reports_the_failing_step() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(
            file,
            "sections:\n  - title: Fruit\nsteps:\n  - append_item: {{ section: 0, item: fig }}\n  - remove_item: {{ path: [0, 4] }}"
        )
        .expect("Failed to write to temp file");

        let result = Application::run(config_for(&file));

        assert!(matches!(
            result,
            Err(ApplicationError::StepError {
                index: 1,
                name: "remove_item",
                source: TreeError::IndexOutOfRange { .. },
            })
        ));
    }

    #[test]
    fn application_reports_a_missing_script() {
        let config = RuntimeConfig {
            script: PathBuf::from("does-not-exist.yaml"),
            color: false,
        };

        let result = Application::run(config);

        assert!(matches!(result, Err(ApplicationError::ScriptError { .. })));
    }
}
