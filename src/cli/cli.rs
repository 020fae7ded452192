use std::path::PathBuf;

use clap::Parser;

use crate::cli::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML file with the initial sections and the steps to replay
    pub script: PathBuf,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Print changesets without ANSI colors
    #[clap(long)]
    pub no_color: bool,
}
