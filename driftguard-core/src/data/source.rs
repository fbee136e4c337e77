//! Dataset sources. The engine only ever sees a loaded [`Dataset`]; everything
//! that touches the filesystem lives here.

use crate::data::dataset::{Column, Dataset};
use crate::error::DriftError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Cell values treated as missing.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "None"];

/// Trait for loading a dataset from a source.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Load the full dataset. Any failure is reported as `DataUnavailable`.
    async fn load(&self) -> Result<Dataset, DriftError>;

    /// Human-readable location used in errors and logs.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// CsvSource
// ---------------------------------------------------------------------------

/// CSV file data source. The first line is the header.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
    pub delimiter: char,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: ',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[async_trait]
impl DatasetSource for CsvSource {
    async fn load(&self) -> Result<Dataset, DriftError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| {
                DriftError::data_unavailable_from(self.describe(), "cannot read file", e)
            })?;
        let dataset = parse_csv(&content, self.delimiter)
            .map_err(|reason| DriftError::data_unavailable(self.describe(), reason))?;
        tracing::debug!(
            source = %self.describe(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Parse delimited text into a [`Dataset`].
///
/// A column is numeric when every non-missing cell parses as `f64`; otherwise it
/// is categorical. Short rows are padded with missing cells and surplus fields
/// are ignored.
pub fn parse_csv(content: &str, delimiter: char) -> Result<Dataset, String> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let header: Vec<String> = lines
        .next()
        .ok_or_else(|| "Empty CSV file".to_string())?
        .split(delimiter)
        .map(|s| unquote(s).to_string())
        .collect();

    if let Some(dup) = header
        .iter()
        .enumerate()
        .find(|(i, name)| header[..*i].contains(name))
        .map(|(_, name)| name)
    {
        return Err(format!("Duplicate column '{dup}' in header"));
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
    for line in lines {
        let mut fields = line.split(delimiter).map(unquote);
        for column in cells.iter_mut() {
            let cell = fields
                .next()
                .filter(|f| !MISSING_MARKERS.contains(f))
                .map(str::to_string);
            column.push(cell);
        }
    }

    let mut dataset = Dataset::new();
    for (name, raw) in header.into_iter().zip(cells) {
        dataset.push_column(infer_column(name, raw));
    }
    Ok(dataset)
}

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => text
                .parse::<f64>()
                .ok()
                .map(|v| if v.is_finite() { Some(v) } else { None }),
        })
        .collect();

    match parsed {
        Some(values) => Column::numeric(name, values),
        None => Column::categorical(name, raw),
    }
}
