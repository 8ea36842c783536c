pub mod catalog;
pub mod dataset;
pub mod domain;
pub mod filters;
pub mod report;
pub mod table;

pub use catalog::FilterCatalog;
pub use dataset::{DatasetError, EmployeeDataset};
pub use domain::{age_on, salary_bucket, EmployeeRecord, SALARY_BUCKET_WIDTH};
pub use filters::{apply_filters, ClosedRange, FilterField, FilterSelection};
pub use report::DashboardReport;
pub use table::{
    employee_table, filter_table, ColumnFilter, EmployeeTableRow, SortDirection, SortKey,
    TableColumn, TableQueryError,
};
