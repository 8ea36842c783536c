use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalarySummary {
    pub mean_salary: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderCount {
    pub sex: String,
    pub count: usize,
}

/// One stacked bar: the department's mean satisfaction annotates the stack total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSatisfaction {
    pub department: String,
    pub mean_satisfaction: Option<f64>,
    pub annotation: String,
    pub total_recruited: usize,
}

/// One stack segment of a department bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecruitmentCount {
    pub department: String,
    pub source: String,
    pub count: usize,
    pub mean_satisfaction: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecruitmentBreakdown {
    /// Trace order for the stacked bars.
    pub sources: Vec<String>,
    pub counts: Vec<RecruitmentCount>,
    pub departments: Vec<DepartmentSatisfaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsencePoint {
    pub salary_bucket: u64,
    pub mean_absences: Option<f64>,
    pub employees: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementPoint {
    pub employee_id: u32,
    pub employee_name: String,
    pub department: String,
    pub salary: u32,
    pub engagement_survey: f64,
}
