#![forbid(unsafe_code)]

mod store;

pub use store::{SqliteStore, StoreError};
pub use store::types::*;
