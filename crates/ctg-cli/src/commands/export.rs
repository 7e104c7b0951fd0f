use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use ctg_contingency::{
    load_list_record_from_path, load_list_records_from_dir, ContingencyListRecord,
    ContingencyListService, FilterServiceClient, InMemoryContingencyListStore,
    NetworkFilterEvaluator, ServiceConfig, WorkerConfig,
};
use ctg_core::load_network_from_path;
use tracing::{error, info};
use uuid::Uuid;

pub struct ExportArgs<'a> {
    pub network: &'a Path,
    pub lists: &'a [PathBuf],
    pub threads: Option<&'a str>,
    pub network_uuid: Option<Uuid>,
    pub variant_id: Option<&'a str>,
}

pub fn handle(args: ExportArgs<'_>, config: &ServiceConfig) -> Result<()> {
    let grid = load_network_from_path(args.network)
        .with_context(|| format!("loading network '{}'", args.network.display()))?;
    info!("Loaded network: {}", grid.stats());

    let records = collect_records(args.lists)?;
    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
    let store = Arc::new(InMemoryContingencyListStore::with_records(records));
    let mut service = ContingencyListService::new(store);
    if let Some(network_uuid) = args.network_uuid {
        let client = FilterServiceClient::new(
            &config.filter_service,
            network_uuid,
            args.variant_id.map(str::to_string),
        );
        service = service.with_filter_export(Arc::new(client));
    }

    let threads = match args.threads {
        Some(spec) => WorkerConfig {
            threads: spec.to_string(),
        }
        .thread_count()?,
        None => config.workers.thread_count()?,
    };

    let evaluator = NetworkFilterEvaluator::new(&grid);
    let results = service.export_all(&ids, &evaluator, threads)?;

    let mut exported = Vec::with_capacity(results.len());
    let mut failures = 0usize;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(list) => exported.push(list),
            Err(err) => {
                failures += 1;
                error!("Export of list {id} failed: {err}");
            }
        }
    }
    serde_json::to_writer_pretty(io::stdout(), &exported)
        .context("serializing contingencies to JSON")?;
    println!();

    if failures > 0 {
        return Err(anyhow!("{failures} of {} list(s) failed to export", ids.len()));
    }
    Ok(())
}

fn collect_records(paths: &[PathBuf]) -> Result<Vec<ContingencyListRecord>> {
    let mut records = Vec::new();
    for path in paths {
        if path.is_dir() {
            records.extend(
                load_list_records_from_dir(path)
                    .with_context(|| format!("reading list records from '{}'", path.display()))?,
            );
        } else {
            records.push(load_list_record_from_path(path)?);
        }
    }
    Ok(records)
}
