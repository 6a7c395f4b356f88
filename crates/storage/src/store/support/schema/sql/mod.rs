#![forbid(unsafe_code)]

mod core;
mod indexes;
mod jobs;
mod learnings;
mod sanitization_log;

pub(super) fn full_schema_sql() -> String {
    [
        core::SQL,
        jobs::SQL,
        sanitization_log::SQL,
        learnings::SQL,
        indexes::SQL,
    ]
    .concat()
}
