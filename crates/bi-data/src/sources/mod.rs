pub mod csv_source;

pub use csv_source::{ColumnInfo, ColumnType, CsvSource};

use async_trait::async_trait;
use bi_core::Row;
use crate::DataError;

/// Trait for sources of tabular rows
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Get the source name/path
    fn source_name(&self) -> &str;

    /// Columns in file order
    fn columns(&self) -> &[ColumnInfo];

    /// Query all rows
    async fn query_all(&self) -> Result<Vec<Row>, DataError>;

    /// Get total row count
    async fn row_count(&self) -> Result<usize, DataError> {
        Ok(self.query_all().await?.len())
    }
}
