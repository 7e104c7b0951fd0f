use crate::common::OutputFormat;
use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "ctg",
    author,
    version,
    about = "Contingency lists from equipment filters",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long)]
    pub log_level: Option<tracing::Level>,

    /// Service configuration file
    #[arg(long, default_value = "ctg.toml", value_hint = ValueHint::FilePath)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the legacy script equivalent of a filter
    Compile {
        /// Filter description (JSON or YAML)
        #[arg(value_hint = ValueHint::FilePath)]
        spec: PathBuf,
    },
    /// List the network elements matching a filter
    Match {
        /// Network document (JSON or YAML)
        #[arg(value_hint = ValueHint::FilePath)]
        network: PathBuf,
        /// Filter description (JSON or YAML)
        #[arg(value_hint = ValueHint::FilePath)]
        spec: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Export contingency lists against a network as JSON
    Export {
        /// Network document (JSON or YAML)
        #[arg(value_hint = ValueHint::FilePath)]
        network: PathBuf,
        /// List records, or directories of list records
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        lists: Vec<PathBuf>,
        /// Worker threads ("auto" or a number; defaults to the config file)
        #[arg(long)]
        threads: Option<String>,
        /// Network UUID known to the filter service (enables filter-based lists)
        #[arg(long)]
        network_uuid: Option<Uuid>,
        /// Network variant for the filter service
        #[arg(long, requires = "network_uuid")]
        variant_id: Option<String>,
    },
    /// Summarise stored list records
    Lists {
        /// Directory of list records
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}
