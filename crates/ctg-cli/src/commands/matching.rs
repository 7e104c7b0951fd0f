use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ctg_cli::common::OutputFormat;
use ctg_core::{load_network_from_path, IdentifiableAttributes};
use ctg_filter::{load_filter_spec_from_path, FilterCompiler};
use tabwriter::TabWriter;
use tracing::info;

pub fn handle(network: &Path, spec: &Path, format: OutputFormat) -> Result<()> {
    let grid = load_network_from_path(network)
        .with_context(|| format!("loading network '{}'", network.display()))?;
    info!("Loaded network: {}", grid.stats());
    let spec = load_filter_spec_from_path(spec)?;
    let compiled = FilterCompiler::compile(&spec)?;
    let matched = compiled.matching_attributes(&grid);
    info!(
        "{} {} element(s) match",
        matched.len(),
        compiled.equipment_type()
    );
    match format {
        OutputFormat::Table => print_table(&matched),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), &matched)
                .context("serializing matched elements to JSON")?;
            println!();
            Ok(())
        }
    }
}

fn print_table(matched: &[IdentifiableAttributes]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "ID\tTYPE")?;
    for attributes in matched {
        writeln!(writer, "{}\t{}", attributes.id, attributes.kind)?;
    }
    writer.flush()?;
    Ok(())
}
