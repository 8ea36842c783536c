use super::views::{
    AbsencePoint, DepartmentSatisfaction, EngagementPoint, GenderCount, RecruitmentBreakdown,
    RecruitmentCount,
};
use crate::analytics::domain::EmployeeRecord;
use std::collections::{BTreeMap, HashSet};

/// Display used wherever a mean has no contributing rows.
pub const NO_DATA_DISPLAY: &str = "N/A";

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

pub fn mean_salary(records: &[&EmployeeRecord]) -> Option<f64> {
    let mut mean = Mean::default();
    for record in records {
        mean.push(f64::from(record.salary));
    }
    mean.value()
}

/// `$62.5k` style rendering of a mean salary.
pub fn format_salary_display(mean: Option<f64>) -> String {
    match mean {
        Some(value) => format!("${:.1}k", value / 1000.0),
        None => NO_DATA_DISPLAY.to_string(),
    }
}

/// Whole currency units with thousands separators, e.g. `$45,046`.
pub fn format_dollars(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn format_satisfaction(mean: Option<f64>) -> String {
    match mean {
        Some(value) => format!("{value:.2}"),
        None => NO_DATA_DISPLAY.to_string(),
    }
}

/// Headcount per sex value, sorted by label. Blank values are not counted.
pub fn gender_counts(records: &[&EmployeeRecord]) -> Vec<GenderCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records.iter().filter(|record| !record.sex.is_empty()) {
        *counts.entry(record.sex.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(sex, count)| GenderCount {
            sex: sex.to_string(),
            count,
        })
        .collect()
}

/// Recruitment counts per (department, source) with each department's mean
/// satisfaction, both keyed in ascending label order.
pub fn recruitment_breakdown(records: &[&EmployeeRecord]) -> RecruitmentBreakdown {
    let mut satisfaction: BTreeMap<&str, Mean> = BTreeMap::new();
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();

    for record in records.iter().filter(|record| !record.department.is_empty()) {
        let mean = satisfaction.entry(record.department.as_str()).or_default();
        if let Some(score) = record.satisfaction {
            mean.push(f64::from(score));
        }

        if !record.recruitment_source.is_empty() {
            *counts
                .entry((
                    record.department.as_str(),
                    record.recruitment_source.as_str(),
                ))
                .or_default() += 1;
        }
    }

    let department_mean = |department: &str| {
        satisfaction
            .get(department)
            .copied()
            .and_then(Mean::value)
    };

    let mut seen_sources = HashSet::new();
    let sources = counts
        .keys()
        .filter(|(_, source)| seen_sources.insert(*source))
        .map(|(_, source)| source.to_string())
        .collect();

    let rows = counts
        .iter()
        .map(|(&(department, source), &count)| RecruitmentCount {
            department: department.to_string(),
            source: source.to_string(),
            count,
            mean_satisfaction: department_mean(department),
        })
        .collect();

    let departments = satisfaction
        .keys()
        .map(|&department| {
            let mean_satisfaction = department_mean(department);
            let total_recruited = counts
                .iter()
                .filter(|((dept, _), _)| *dept == department)
                .map(|(_, count)| count)
                .sum();
            DepartmentSatisfaction {
                department: department.to_string(),
                mean_satisfaction,
                annotation: format_satisfaction(mean_satisfaction),
                total_recruited,
            }
        })
        .collect();

    RecruitmentBreakdown {
        sources,
        counts: rows,
        departments,
    }
}

/// Mean absences per salary bucket, ascending by bucket.
pub fn absences_by_salary_bucket(records: &[&EmployeeRecord]) -> Vec<AbsencePoint> {
    let mut buckets: BTreeMap<u64, (Mean, usize)> = BTreeMap::new();
    for record in records {
        let (mean, employees) = buckets.entry(record.salary_bucket()).or_default();
        *employees += 1;
        if let Some(absences) = record.absences {
            mean.push(f64::from(absences));
        }
    }

    buckets
        .into_iter()
        .map(|(salary_bucket, (mean, employees))| AbsencePoint {
            salary_bucket,
            mean_absences: mean.value(),
            employees,
        })
        .collect()
}

/// Salary vs engagement scatter. Rows without an engagement score are omitted.
pub fn engagement_points(records: &[&EmployeeRecord]) -> Vec<EngagementPoint> {
    records
        .iter()
        .filter_map(|record| {
            record.engagement_survey.map(|score| EngagementPoint {
                employee_id: record.employee_id,
                employee_name: record.name.clone(),
                department: record.department.clone(),
                salary: record.salary,
                engagement_survey: score,
            })
        })
        .collect()
}
