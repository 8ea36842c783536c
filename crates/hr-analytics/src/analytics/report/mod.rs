mod aggregates;
mod summary;
pub mod views;

pub use aggregates::{
    absences_by_salary_bucket, engagement_points, format_dollars, format_salary_display,
    gender_counts, mean_salary, recruitment_breakdown, NO_DATA_DISPLAY,
};
pub use summary::DashboardReport;
