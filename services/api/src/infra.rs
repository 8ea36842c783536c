use chrono::NaiveDate;
use hr_analytics::analytics::{DatasetError, EmployeeDataset};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dataset: Arc<EmployeeDataset>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn load_dataset(path: &Path, as_of: NaiveDate) -> Result<EmployeeDataset, DatasetError> {
    let dataset = EmployeeDataset::from_path(path, as_of)?;
    if dataset.is_empty() {
        warn!(path = %path.display(), "employee dataset contains no usable rows");
    }
    info!(
        path = %path.display(),
        %as_of,
        records = dataset.len(),
        skipped = dataset.skipped_rows().len(),
        "employee dataset loaded"
    );
    Ok(dataset)
}
