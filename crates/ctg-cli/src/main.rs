use clap::Parser;
use ctg_cli::cli::{Cli, Commands};
use ctg_contingency::{load_service_config, ServiceConfig};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::export::ExportArgs;

fn run(cli: &Cli, config: &ServiceConfig) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Compile { spec } => commands::compile::handle(spec),
        Commands::Match {
            network,
            spec,
            format,
        } => commands::matching::handle(network, spec, *format),
        Commands::Export {
            network,
            lists,
            threads,
            network_uuid,
            variant_id,
        } => commands::export::handle(
            ExportArgs {
                network,
                lists,
                threads: threads.as_deref(),
                network_uuid: *network_uuid,
                variant_id: variant_id.as_deref(),
            },
            config,
        ),
        Commands::Lists { dir, format } => commands::lists::handle(dir, *format),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_service_config(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ctg: {err}");
            std::process::exit(2);
        }
    };
    let level = cli
        .log_level
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(tracing::Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("ctg: could not install log subscriber: {err}");
    }

    if let Err(err) = run(&cli, &config) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
