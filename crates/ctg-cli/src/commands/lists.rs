use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ctg_cli::common::OutputFormat;
use ctg_contingency::{load_list_records_from_dir, ContingencyListContent, ContingencyListRecord};
use serde::Serialize;
use tabwriter::TabWriter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListSummary<'a> {
    id: String,
    name: &'a str,
    #[serde(rename = "type")]
    kind: String,
    modification_date: String,
    detail: String,
}

fn summarize(record: &ContingencyListRecord) -> ListSummary<'_> {
    let detail = match &record.content {
        ContingencyListContent::Form { spec } => spec.equipment_type.to_string(),
        ContingencyListContent::IdentifierList { groups } => format!("{} group(s)", groups.len()),
        ContingencyListContent::FilterBased { filters } => format!("{} filter(s)", filters.len()),
        ContingencyListContent::Script { script } => format!("{} line(s)", script.lines().count()),
    };
    ListSummary {
        id: record.id.to_string(),
        name: &record.name,
        kind: record.kind().to_string(),
        modification_date: record.modification_date.to_rfc3339(),
        detail,
    }
}

pub fn handle(dir: &Path, format: OutputFormat) -> Result<()> {
    let records = load_list_records_from_dir(dir)
        .with_context(|| format!("reading list records from '{}'", dir.display()))?;
    let summaries: Vec<ListSummary> = records.iter().map(summarize).collect();
    match format {
        OutputFormat::Table => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(writer, "ID\tNAME\tTYPE\tMODIFIED\tDETAIL")?;
            for s in &summaries {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}",
                    s.id, s.name, s.kind, s.modification_date, s.detail
                )?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), &summaries)
                .context("serializing list summaries to JSON")?;
            println!();
        }
    }
    Ok(())
}
