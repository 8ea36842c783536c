use super::aggregates::{
    absences_by_salary_bucket, engagement_points, format_salary_display, gender_counts,
    mean_salary, recruitment_breakdown,
};
use super::views::{
    AbsencePoint, EngagementPoint, GenderCount, RecruitmentBreakdown, SalarySummary,
};
use crate::analytics::domain::EmployeeRecord;
use serde::Serialize;

/// Every chart aggregate for one filtered view. Never derived from a previous report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub headcount: usize,
    pub salary: SalarySummary,
    pub gender: Vec<GenderCount>,
    pub recruitment: RecruitmentBreakdown,
    pub absences_by_salary: Vec<AbsencePoint>,
    pub engagement: Vec<EngagementPoint>,
}

impl DashboardReport {
    pub fn from_records(records: &[&EmployeeRecord]) -> Self {
        let mean = mean_salary(records);

        Self {
            headcount: records.len(),
            salary: SalarySummary {
                mean_salary: mean,
                display: format_salary_display(mean),
            },
            gender: gender_counts(records),
            recruitment: recruitment_breakdown(records),
            absences_by_salary: absences_by_salary_bucket(records),
            engagement: engagement_points(records),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headcount == 0
    }
}
