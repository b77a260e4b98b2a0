use anyhow::Result;
use clap::Parser;
use course_search::cli::Cli;
use course_search::{ActionServer, Config, MemoryStore};
use std::sync::Arc;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Config::resolve_path(cli.config.as_deref());
    let mut config = Config::load(config_path.as_deref())?;
    if let Some(records) = cli.records {
        config.store.records_path = Some(records);
    }

    course_search::tracing::init(config.logging.format);
    match &config_path {
        Some(path) => tracing::info!("Loaded configuration from {}", path.display()),
        None => tracing::info!("No configuration file, using defaults"),
    }
    tracing::info!(
        "Starting course-search (table {} in {}, scan limit {}, result cap {})",
        config.store.table_name,
        config.store.region,
        config.store.scan_limit,
        config.search.result_cap
    );

    let store = match &config.store.records_path {
        Some(path) => MemoryStore::from_json_file(path).await?,
        None => {
            tracing::warn!("No records file configured, serving an empty store");
            MemoryStore::default()
        }
    };
    let server = ActionServer::new(Arc::new(store), &config);

    let served = server
        .serve_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    tracing::info!("stdin closed after {} event(s), shutting down", served);
    Ok(())
}
