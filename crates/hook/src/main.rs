#![forbid(unsafe_code)]

mod ingest;
mod patterns_inline;

use cg_storage::SqliteStore;
use std::io::Read;
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

/// The hook never fails the host. Any error here is logged to stderr and
/// the process still exits 0 (spec.md §4.3 "Silent failure policy", §6
/// "exits with status 0 on success" — success here means "did not crash
/// the host's lifecycle hook chain", not "ingested cleanly").
fn main() -> std::process::ExitCode {
    init_logging();

    let mut raw = Vec::new();
    if let Err(err) = std::io::stdin().read_to_end(&mut raw) {
        tracing::error!(error = %err, "failed to read hook input from stdin");
        return std::process::ExitCode::SUCCESS;
    }

    let mut store = match SqliteStore::open(db_path()) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "failed to open storage");
            return std::process::ExitCode::SUCCESS;
        }
    };

    if let Err(err) = ingest::ingest(&mut store, &raw) {
        tracing::error!(code = err.code(), error = %err, "dropping uningestable event");
    }

    std::process::ExitCode::SUCCESS
}
