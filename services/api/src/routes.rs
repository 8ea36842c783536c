use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use hr_analytics::analytics::{
    employee_table, filter_table, ColumnFilter, DashboardReport, EmployeeTableRow, FilterCatalog,
    FilterField, FilterSelection, SortKey,
};
use hr_analytics::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

const MAX_EMPLOYEE_ROWS: usize = 1_000;

#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    pub(crate) as_of: NaiveDate,
    pub(crate) active_filters: Vec<FilterField>,
    #[serde(flatten)]
    pub(crate) report: DashboardReport,
    /// First `MAX_EMPLOYEE_ROWS` matches; `headcount` counts them all.
    pub(crate) employees: Vec<EmployeeTableRow>,
    pub(crate) employees_truncated: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct EmployeesRequest {
    pub(crate) filters: FilterSelection,
    pub(crate) column_filters: Vec<ColumnFilter>,
    pub(crate) sort: Vec<SortKey>,
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmployeesResponse {
    pub(crate) total: usize,
    pub(crate) rows: Vec<EmployeeTableRow>,
}

pub(crate) fn dashboard_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/filters", get(filter_catalog_endpoint))
        .route("/api/v1/dashboard", post(dashboard_endpoint))
        .route("/api/v1/employees", post(employees_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "employees": state.dataset.len() })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn filter_catalog_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<FilterCatalog> {
    Json(state.dataset.catalog())
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Json(selection): Json<FilterSelection>,
) -> Json<DashboardResponse> {
    let matching = state.dataset.filter(&selection);
    let active_filters = selection.active_fields();
    debug!(
        ?active_filters,
        matched = matching.len(),
        total = state.dataset.len(),
        "dashboard view computed"
    );

    let report = DashboardReport::from_records(&matching);
    let employees_truncated = matching.len() > MAX_EMPLOYEE_ROWS;
    let employees = employee_table(&matching[..matching.len().min(MAX_EMPLOYEE_ROWS)], &[]);

    Json(DashboardResponse {
        as_of: state.dataset.as_of(),
        active_filters,
        report,
        employees,
        employees_truncated,
    })
}

pub(crate) async fn employees_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<EmployeesRequest>,
) -> Result<Json<EmployeesResponse>, AppError> {
    let EmployeesRequest {
        filters,
        column_filters,
        sort,
        limit,
    } = request;

    let limit = match limit {
        Some(0) => {
            return Err(AppError::InvalidRequest(
                "limit must be at least 1".to_string(),
            ))
        }
        Some(limit) if limit > MAX_EMPLOYEE_ROWS => {
            return Err(AppError::InvalidRequest(format!(
                "limit must not exceed {MAX_EMPLOYEE_ROWS}"
            )))
        }
        Some(limit) => limit,
        None => MAX_EMPLOYEE_ROWS,
    };

    let matching = filter_table(&state.dataset.filter(&filters), &column_filters);
    let mut rows = employee_table(&matching, &sort);
    rows.truncate(limit);
    debug!(
        matched = matching.len(),
        returned = rows.len(),
        column_filters = column_filters.len(),
        sort_keys = sort.len(),
        "employee table computed"
    );

    Ok(Json(EmployeesResponse {
        total: matching.len(),
        rows,
    }))
}
