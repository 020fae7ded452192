use std::path::PathBuf;

use supports_color::Stream;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub script: PathBuf,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            script: cli.script,
            color: !cli.no_color && supports_color::on(Stream::Stdout).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn no_color_flag_disables_color() {
        let cli = Cli::parse_from(["sectree", "script.yaml", "--no-color"]);
        let config = RuntimeConfig::from(cli);

        assert_eq!(config.script, PathBuf::from("script.yaml"));
        assert!(!config.color);
    }
}
