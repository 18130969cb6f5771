use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use csv::ReaderBuilder;
use bi_core::{Row, Value};
use crate::DataError;
use super::RowSource;

/// Detected type of a CSV column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Bool,
    Text,
}

/// Column info for previews and chart configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: ColumnType,
    pub null_count: usize,
}

/// CSV data source, fully loaded into typed rows
pub struct CsvSource {
    /// File name or caller-supplied label
    name: String,
    /// Columns in header order
    columns: Vec<ColumnInfo>,
    /// Loaded rows
    rows: Arc<Vec<Row>>,
}

impl CsvSource {
    /// Load a CSV file, keeping at most `max_rows` rows
    pub async fn new(path: PathBuf, max_rows: usize) -> Result<Self, DataError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let source = tokio::task::spawn_blocking(move || {
            let file = File::open(&path)?;
            Self::from_reader(name, BufReader::new(file), max_rows)
        })
        .await??;

        tracing::info!(
            "Loaded CSV '{}' with {} rows and {} columns",
            source.name,
            source.rows.len(),
            source.columns.len()
        );
        Ok(source)
    }

    /// Parse CSV text from any reader. The first record is the header.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R, max_rows: usize) -> Result<Self, DataError> {
        let name = name.into();
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(DataError::EmptyHeader);
        }

        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        let mut truncated = false;
        for result in csv_reader.records() {
            if raw_rows.len() >= max_rows {
                truncated = true;
                break;
            }
            let record = result?;
            raw_rows.push(record.iter().map(|s| s.trim().to_string()).collect());
        }

        if truncated {
            tracing::warn!("CSV '{}' truncated to {} rows", name, max_rows);
        }

        let columns: Vec<ColumnInfo> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| ColumnInfo {
                name: header.clone(),
                column_type: Self::detect_column_type(&raw_rows, idx),
                null_count: raw_rows
                    .iter()
                    .filter(|r| r.get(idx).map_or(true, |v| v.is_empty()))
                    .count(),
            })
            .collect();

        let rows = raw_rows
            .iter()
            .map(|raw| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(idx, column)| {
                        let cell = raw.get(idx).map(String::as_str).unwrap_or("");
                        (column.name.clone(), Self::parse_cell(cell, column.column_type))
                    })
                    .collect::<Row>()
            })
            .collect();

        Ok(Self {
            name,
            columns,
            rows: Arc::new(rows),
        })
    }

    /// Detect column type from sample data
    fn detect_column_type(samples: &[Vec<String>], col_idx: usize) -> ColumnType {
        let mut is_number = true;
        let mut is_bool = true;
        let mut seen_any = false;

        for row in samples {
            if let Some(value) = row.get(col_idx) {
                if value.is_empty() {
                    continue;
                }
                seen_any = true;

                if is_number && value.parse::<f64>().is_err() {
                    is_number = false;
                }

                if is_bool && Self::parse_bool(value).is_none() {
                    is_bool = false;
                }
            }
        }

        if !seen_any {
            ColumnType::Text
        } else if is_number {
            ColumnType::Number
        } else if is_bool {
            ColumnType::Bool
        } else {
            ColumnType::Text
        }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn parse_cell(cell: &str, column_type: ColumnType) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        match column_type {
            ColumnType::Number => cell.parse::<f64>().map(Value::Number).unwrap_or(Value::Null),
            ColumnType::Bool => Self::parse_bool(cell).map(Value::Bool).unwrap_or(Value::Null),
            ColumnType::Text => Value::String(cell.to_string()),
        }
    }

    /// Loaded rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Shared handle to the loaded rows
    pub fn shared_rows(&self) -> Arc<Vec<Row>> {
        self.rows.clone()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Columns usable as a value axis
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.column_type == ColumnType::Number)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Columns usable as a category axis or drill level
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.column_type != ColumnType::Number)
            .map(|c| c.name.clone())
            .collect()
    }
}

#[async_trait]
impl RowSource for CsvSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    async fn query_all(&self) -> Result<Vec<Row>, DataError> {
        Ok(self.rows.as_ref().clone())
    }

    async fn row_count(&self) -> Result<usize, DataError> {
        Ok(self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES: &str = "region,category,sales,online\n\
                         East,Books,10,true\n\
                         West,Games,20,false\n\
                         East,,5,\n";

    #[test]
    fn test_column_types_detected() {
        let source = CsvSource::from_reader("sales.csv", SALES.as_bytes(), 100).unwrap();

        let types: Vec<ColumnType> = source.columns().iter().map(|c| c.column_type).collect();
        assert_eq!(types, vec![ColumnType::Text, ColumnType::Text, ColumnType::Number, ColumnType::Bool]);
        assert_eq!(source.numeric_columns(), vec!["sales"]);
        assert_eq!(source.categorical_columns(), vec!["region", "category", "online"]);
        assert_eq!(source.columns()[1].null_count, 1);
    }

    #[test]
    fn test_cells_are_typed() {
        let source = CsvSource::from_reader("sales.csv", SALES.as_bytes(), 100).unwrap();
        let rows = source.rows();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("region"), Some(&Value::from("East")));
        assert_eq!(rows[0].get("sales"), Some(&Value::Number(10.0)));
        assert_eq!(rows[1].get("online"), Some(&Value::Bool(false)));
        assert_eq!(rows[2].get("category"), Some(&Value::Null));
        assert_eq!(rows[2].get("online"), Some(&Value::Null));
    }

    #[test]
    fn test_max_rows_truncates() {
        let source = CsvSource::from_reader("sales.csv", SALES.as_bytes(), 2).unwrap();
        assert_eq!(source.rows().len(), 2);
    }

    #[test]
    fn test_short_records_fill_nulls() {
        let text = "a,b\n1\n";
        let source = CsvSource::from_reader("short.csv", text.as_bytes(), 10).unwrap();
        assert_eq!(source.rows()[0].get("b"), Some(&Value::Null));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let result = CsvSource::from_reader("empty.csv", "".as_bytes(), 10);
        assert!(matches!(result, Err(DataError::EmptyHeader)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, SALES).unwrap();

        let source = CsvSource::new(path, 100).await.unwrap();
        assert_eq!(source.source_name(), "sales.csv");
        assert_eq!(source.row_count().await.unwrap(), 3);
        assert_eq!(source.query_all().await.unwrap().len(), 3);
    }
}
