//! Column-oriented datasets and the per-feature samples drawn from them.

use serde::{Deserialize, Serialize};

/// Values of a single column. Numeric columns use `None` for missing cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Categorical(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }

    /// Numeric cells, or `None` for a categorical column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Categorical(_) => None,
        }
    }
}

/// A column-oriented table. Column order is preserved and drives report order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, replacing an existing column of the same name in place.
    pub fn push_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Builder form of [`push_column`](Self::push_column) for a fully observed numeric column.
    pub fn with_numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.push_column(Column::numeric(name, values.into_iter().map(Some).collect()));
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.push_column(column);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Numeric columns in dataset order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.columns
            .iter()
            .filter_map(|c| c.as_numeric().map(|v| (c.name.as_str(), v)))
    }

    /// Number of rows, i.e. the length of the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The finite observations of one feature on one side of the comparison.
///
/// Missing and non-finite values are dropped on construction. A sorted copy is
/// kept alongside the original order since quantiles, KS and summary statistics
/// all need it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
    sorted: Vec<f64>,
}

impl Sample {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        Self { values, sorted }
    }

    pub fn from_column(cells: &[Option<f64>]) -> Self {
        Self::new(cells.iter().flatten().copied())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.sorted.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.sorted.last().copied()
    }

    /// Percentile `p` in `[0, 100]`, linearly interpolated between the closest
    /// ranks (`rank = p/100 * (n - 1)`).
    pub fn percentile(&self, p: f64) -> Option<f64> {
        let n = self.sorted.len();
        if n == 0 {
            return None;
        }
        let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
        let lo = rank.floor() as usize;
        let hi = (lo + 1).min(n - 1);
        let frac = rank - lo as f64;
        let (a, b) = (self.sorted[lo], self.sorted[hi]);
        let gap = b - a;
        if gap.is_finite() {
            Some(a + gap * frac)
        } else {
            // Neighbours near ±f64::MAX: the difference overflows.
            Some(a * (1.0 - frac) + b * frac)
        }
    }
}
