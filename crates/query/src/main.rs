#![forbid(unsafe_code)]

mod entry;
mod protocol;
mod server;
mod tools;

use cg_storage::SqliteStore;
use server::QueryServer;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "./data/context.db";

fn db_path() -> PathBuf {
    std::env::var("DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH))
}

fn init_logging() {
    let filter = std::env::var("CONTEXTGUARD_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> std::process::ExitCode {
    init_logging();

    let store = match SqliteStore::open(db_path()) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "failed to open storage");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut server = QueryServer::new(store);
    if let Err(err) = entry::run_stdio(&mut server) {
        tracing::error!(error = %err, "stdio transport ended with an error");
        return std::process::ExitCode::FAILURE;
    }

    std::process::ExitCode::SUCCESS
}
