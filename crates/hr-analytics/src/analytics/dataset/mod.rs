mod normalizer;
mod parser;

use crate::analytics::catalog::FilterCatalog;
use crate::analytics::domain::EmployeeRecord;
use crate::analytics::filters::{apply_filters, FilterSelection};
use crate::analytics::report::DashboardReport;
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

pub(crate) use normalizer::normalize_label;
pub use parser::{RowError, SkippedRow};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read employee dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid employee CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("employee CSV is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// The full employee record set, loaded once and shared read-only by every
/// dashboard computation.
#[derive(Debug, Clone)]
pub struct EmployeeDataset {
    records: Vec<EmployeeRecord>,
    skipped: Vec<SkippedRow>,
    as_of: NaiveDate,
}

impl EmployeeDataset {
    pub fn from_path<P: AsRef<Path>>(path: P, as_of: NaiveDate) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, as_of)
    }

    /// Parses CSV rows, deriving each employee's age as of `as_of`.
    pub fn from_reader<R: Read>(reader: R, as_of: NaiveDate) -> Result<Self, DatasetError> {
        let parsed = parser::parse_rows(reader, as_of)?;

        for skipped in &parsed.skipped {
            warn!(line = skipped.line, reason = %skipped.reason, "skipping malformed employee row");
        }
        debug!(
            records = parsed.records.len(),
            skipped = parsed.skipped.len(),
            %as_of,
            "employee dataset parsed"
        );

        Ok(Self {
            records: parsed.records,
            skipped: parsed.skipped,
            as_of,
        })
    }

    pub fn from_records(records: Vec<EmployeeRecord>, as_of: NaiveDate) -> Self {
        Self {
            records,
            skipped: Vec::new(),
            as_of,
        }
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn skipped_rows(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, selection: &FilterSelection) -> Vec<&EmployeeRecord> {
        apply_filters(&self.records, selection)
    }

    pub fn dashboard(&self, selection: &FilterSelection) -> DashboardReport {
        DashboardReport::from_records(&self.filter(selection))
    }

    pub fn catalog(&self) -> FilterCatalog {
        FilterCatalog::from_records(&self.records)
    }
}
