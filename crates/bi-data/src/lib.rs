//! Data handling for the insight dashboard
//!
//! Row sources turn files into [`bi_core::Row`] datasets; the entity store is
//! the persistence collaborator used for drill paths and pinned charts.

pub mod sources;
pub mod store;

use thiserror::Error;

// Re-exports
pub use sources::{ColumnInfo, ColumnType, CsvSource, RowSource};
pub use store::{DrillPathRepository, EntityStore, MemoryStore, Record};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("CSV file has no header row")]
    EmptyHeader,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
