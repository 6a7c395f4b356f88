#![forbid(unsafe_code)]

mod handlers;
mod runtime;
#[cfg(test)]
mod tests;

use cg_core::model::JobType;
use cg_storage::SqliteStore;
use handlers::{ExtractHandler, SanitizeHandler};
use runtime::{BackoffConfig, JobHandler, WorkerConfig};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "./data/context.db";
const DEFAULT_IDLE_MS: u64 = 500;
const DEFAULT_BACKOFF_BASE_MS: u64 = 200;
const DEFAULT_BACKOFF_MAX_MS: u64 = 30_000;

fn usage() -> &'static str {
    "cg-worker — ContextGuard job queue worker\n\n\
USAGE:\n\
  cg-worker --job-type <sanitize_async|extract_learning_ai>\n\n\
ENVIRONMENT:\n\
  DB_PATH                         embedded database file (default ./data/context.db)\n\
  ANTHROPIC_API_KEY               selects the model-backed validator/extractor when set\n\
  CONTEXTGUARD_LOG                tracing EnvFilter directive (default info)\n\
  CONTEXTGUARD_WORKER_IDLE_MS     idle poll interval when claim finds nothing (default 500)\n\
  CONTEXTGUARD_BACKOFF_BASE_MS    retry backoff base (default 200)\n\
  CONTEXTGUARD_BACKOFF_MAX_MS     retry backoff ceiling (default 30000)\n"
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

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

fn parse_job_type(args: &[String]) -> Option<JobType> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--job-type" {
            return iter.next().and_then(|v| JobType::from_str(v));
        }
    }
    None
}

fn main() -> std::process::ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(job_type) = parse_job_type(&args) else {
        eprintln!("{}", usage());
        return std::process::ExitCode::FAILURE;
    };

    let store = match SqliteStore::open(db_path()) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "failed to open storage");
            return std::process::ExitCode::FAILURE;
        }
    };

    let api_key = std::env::var("ANTHROPIC_API_KEY").ok();
    let handler: Box<dyn JobHandler> = match job_type {
        JobType::SanitizeAsync => Box::new(SanitizeHandler {
            validator: cg_pipeline::build_validator(api_key),
        }),
        JobType::ExtractLearningAi => Box::new(ExtractHandler {
            extractor: cg_pipeline::build_extractor(api_key),
        }),
        JobType::MineUpload => {
            tracing::error!("mine_upload has no worker runtime yet");
            return std::process::ExitCode::FAILURE;
        }
    };

    let config = WorkerConfig {
        job_type,
        idle_poll: Duration::from_millis(env_u64("CONTEXTGUARD_WORKER_IDLE_MS", DEFAULT_IDLE_MS)),
        backoff: BackoffConfig {
            base_ms: env_u64("CONTEXTGUARD_BACKOFF_BASE_MS", DEFAULT_BACKOFF_BASE_MS),
            max_ms: env_u64("CONTEXTGUARD_BACKOFF_MAX_MS", DEFAULT_BACKOFF_MAX_MS),
        },
    };

    match runtime::run(store, config, handler.as_ref()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "worker runtime exited with an error");
            std::process::ExitCode::FAILURE
        }
    }
}
