use clap::ValueEnum;

/// Output format for listing commands.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON array (pipe-friendly)
    Json,
}
