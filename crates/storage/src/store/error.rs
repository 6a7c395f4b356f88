#![forbid(unsafe_code)]

/// Hand-rolled error enum with a stable `code()`, matching
/// `bm_storage::StoreError` rather than reaching for `thiserror` — the
/// teacher never takes that dependency and this keeps the stack aligned.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    UnknownId,
    JobNotClaimable { job_id: String, status: String },
    JobAlreadyTerminal { job_id: String, status: String },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) | Self::Sql(_) => "INTERNAL",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownId => "NOT_FOUND",
            Self::JobNotClaimable { .. } => "JOB_NOT_CLAIMABLE",
            Self::JobAlreadyTerminal { .. } => "JOB_ALREADY_TERMINAL",
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Sql(e) => write!(f, "sql error: {e}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::UnknownId => write!(f, "unknown id"),
            Self::JobNotClaimable { job_id, status } => {
                write!(f, "job {job_id} is not claimable (status={status})")
            }
            Self::JobAlreadyTerminal { job_id, status } => {
                write!(f, "job {job_id} is already terminal (status={status})")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sql(e)
    }
}
