use std::path::Path;

use anyhow::{Context, Result};
use ctg_filter::{load_filter_spec_from_path, FilterCompiler};
use tracing::info;

pub fn handle(spec: &Path) -> Result<()> {
    info!("Compiling filter {}", spec.display());
    let spec = load_filter_spec_from_path(spec)?;
    let script = FilterCompiler::to_script(&spec).context("compiling filter")?;
    print!("{script}");
    Ok(())
}
