//! Datasets, per-feature samples, and the sources they are loaded from.

pub mod dataset;
pub mod source;
pub mod stats;

pub use dataset::{Column, ColumnValues, Dataset, Sample};
pub use source::{CsvSource, DatasetSource, parse_csv};
pub use stats::SummaryStats;
