//! Filter pipeline invariants over generated workforces and selections.
//!
//! Generated records may have blank labels and missing ages, hire dates or
//! satisfaction ratings; generated ranges may be inverted.

use chrono::{Days, NaiveDate};
use hr_analytics::analytics::report::NO_DATA_DISPLAY;
use hr_analytics::analytics::{
    apply_filters, ClosedRange, DashboardReport, EmployeeRecord, FilterSelection,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

const DEPARTMENTS: [&str; 4] = ["Production", "IT/IS", "Sales", ""];
const POSITIONS: [&str; 3] = ["Production Technician I", "Area Sales Manager", ""];
const SCORES: [&str; 4] = ["Exceeds", "Fully Meets", "PIP", ""];
const SEXES: [&str; 3] = ["M", "F", ""];
const STATUSES: [&str; 3] = ["Active", "Voluntarily Terminated", ""];
const SOURCES: [&str; 3] = ["Indeed", "LinkedIn", ""];

/// Selectable values include labels no record carries.
const SELECTABLE_DEPARTMENTS: [&str; 4] = ["Production", "IT/IS", "Sales", "Executive Office"];
const SELECTABLE_POSITIONS: [&str; 3] = ["Production Technician I", "Area Sales Manager", "CIO"];
const SELECTABLE_SCORES: [&str; 4] = ["Exceeds", "Fully Meets", "PIP", "Needs Improvement"];
const SELECTABLE_SEXES: [&str; 2] = ["M", "F"];
const SELECTABLE_STATUSES: [&str; 3] = ["Active", "Voluntarily Terminated", "Terminated for Cause"];

fn hire_day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2005, 1, 1)
        .and_then(|start| start.checked_add_days(Days::new(offset)))
        .expect("hire date in range")
}

fn label(pool: &'static [&'static str]) -> impl Strategy<Value = &'static str> {
    prop::sample::select(pool)
}

fn label_set(pool: &'static [&'static str]) -> impl Strategy<Value = BTreeSet<&'static str>> {
    prop::collection::btree_set(label(pool), 0..3)
}

fn record() -> impl Strategy<Value = EmployeeRecord> {
    (
        (label(&DEPARTMENTS), label(&POSITIONS), label(&SCORES)),
        (label(&SEXES), label(&STATUSES), label(&SOURCES)),
        30_000u32..120_000,
        prop::option::of(18u32..70),
        prop::option::of(1u8..=5),
        prop::option::of((0u64..6_000).prop_map(hire_day)),
        prop::option::of(0u32..20),
        prop::option::of(1.0f64..5.0),
    )
        .prop_map(
            |(
                (department, position, score),
                (sex, status, source),
                salary,
                age,
                satisfaction,
                hire_date,
                absences,
                engagement,
            )| EmployeeRecord {
                employee_id: 0,
                name: String::new(),
                date_of_birth: None,
                sex: sex.to_string(),
                marital_status: None,
                race: None,
                hispanic_latino: None,
                department: department.to_string(),
                position: position.to_string(),
                manager: None,
                employment_status: status.to_string(),
                terminated: status != "Active",
                termination_date: None,
                termination_reason: None,
                recruitment_source: source.to_string(),
                performance_score: score.to_string(),
                engagement_survey: engagement,
                satisfaction,
                absences,
                last_review_date: None,
                salary,
                hire_date,
                age,
            },
        )
}

fn workforce() -> impl Strategy<Value = Vec<EmployeeRecord>> {
    prop::collection::vec(record(), 0..40).prop_map(|mut records| {
        for (index, record) in records.iter_mut().enumerate() {
            record.employee_id = index as u32 + 1;
            record.name = format!("Employee {}", record.employee_id);
        }
        records
    })
}

fn range<T, S>(bounds: S) -> impl Strategy<Value = Option<ClosedRange<T>>>
where
    T: PartialOrd + std::fmt::Debug,
    S: Strategy<Value = T> + Clone,
{
    prop::option::of((bounds.clone(), bounds).prop_map(|(min, max)| ClosedRange::new(min, max)))
}

fn selections() -> impl Strategy<Value = FilterSelection> {
    (
        (
            label_set(&SELECTABLE_DEPARTMENTS),
            label_set(&SELECTABLE_POSITIONS),
            label_set(&SELECTABLE_SCORES),
            label_set(&SELECTABLE_SEXES),
            label_set(&SELECTABLE_STATUSES),
        ),
        range(25_000u32..125_000),
        range(16u32..72),
        prop::collection::btree_set(1u8..=5, 0..4),
        range((0u64..6_500).prop_map(hire_day)),
    )
        .prop_map(
            |(
                (departments, positions, scores, sexes, statuses),
                salary,
                age,
                satisfaction,
                hire_date,
            )| {
                let mut selection = FilterSelection::default()
                    .with_departments(departments)
                    .with_positions(positions)
                    .with_performance_scores(scores)
                    .with_sexes(sexes)
                    .with_employment_statuses(statuses)
                    .with_satisfaction(satisfaction);
                selection.salary = salary;
                selection.age = age;
                selection.hire_date = hire_date;
                selection
            },
        )
}

/// Independent statement of the filter semantics.
fn satisfies(selection: &FilterSelection, record: &EmployeeRecord) -> bool {
    fn listed(selected: &BTreeSet<String>, value: &str) -> bool {
        selected.is_empty() || selected.contains(value)
    }
    fn bounded<T: PartialOrd>(range: &Option<ClosedRange<T>>, value: Option<&T>) -> bool {
        match range {
            None => true,
            Some(range) => value.is_some_and(|value| range.min <= *value && *value <= range.max),
        }
    }

    listed(&selection.departments, &record.department)
        && listed(&selection.positions, &record.position)
        && listed(&selection.performance_scores, &record.performance_score)
        && listed(&selection.sexes, &record.sex)
        && listed(&selection.employment_statuses, &record.employment_status)
        && bounded(&selection.salary, Some(&record.salary))
        && bounded(&selection.age, record.age.as_ref())
        && (selection.satisfaction.is_empty()
            || record
                .satisfaction
                .is_some_and(|score| selection.satisfaction.contains(&score)))
        && bounded(&selection.hire_date, record.hire_date.as_ref())
}

fn ids(records: &[&EmployeeRecord]) -> Vec<u32> {
    records.iter().map(|record| record.employee_id).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn keeps_exactly_the_satisfying_records_in_order(
        records in workforce(),
        selection in selections()
    ) {
        let kept = ids(&apply_filters(&records, &selection));
        let expected: Vec<u32> = records
            .iter()
            .filter(|record| satisfies(&selection, record))
            .map(|record| record.employee_id)
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn filtering_twice_changes_nothing(records in workforce(), selection in selections()) {
        let once = apply_filters(&records, &selection);
        let twice = apply_filters(once.iter().copied(), &selection);
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn dropped_records_fail_a_constrained_field(
        records in workforce(),
        selection in selections()
    ) {
        let kept: BTreeSet<u32> = ids(&apply_filters(&records, &selection)).into_iter().collect();
        for record in &records {
            let rejections = selection.rejections(record);
            if kept.contains(&record.employee_id) {
                prop_assert!(rejections.is_empty());
            } else {
                prop_assert!(!rejections.is_empty());
                prop_assert!(rejections.iter().all(|field| selection.constrains(*field)));
            }
        }
    }

    #[test]
    fn unconstrained_selection_keeps_everything(records in workforce()) {
        let kept = ids(&apply_filters(&records, &FilterSelection::default()));
        let all: Vec<u32> = records.iter().map(|record| record.employee_id).collect();
        prop_assert_eq!(kept, all);
    }

    #[test]
    fn inverted_ranges_match_nothing(
        records in workforce(),
        low in 30_000u32..75_000,
        high in 75_001u32..120_000,
        young in 18u32..40,
        old in 41u32..70
    ) {
        let salary = FilterSelection::default().with_salary(high, low);
        prop_assert!(apply_filters(&records, &salary).is_empty());
        let age = FilterSelection::default().with_age(old, young);
        prop_assert!(apply_filters(&records, &age).is_empty());
    }

    #[test]
    fn aggregates_are_defined_for_every_view(
        records in workforce(),
        selection in selections()
    ) {
        let view = apply_filters(&records, &selection);
        let report = DashboardReport::from_records(&view);

        prop_assert_eq!(report.headcount, view.len());
        prop_assert_eq!(report.salary.mean_salary.is_none(), view.is_empty());
        if view.is_empty() {
            prop_assert_eq!(report.salary.display.as_str(), NO_DATA_DISPLAY);
        }

        let gendered: usize = report.gender.iter().map(|entry| entry.count).sum();
        prop_assert_eq!(gendered, view.iter().filter(|r| !r.sex.is_empty()).count());

        let recruited: usize = report.recruitment.counts.iter().map(|row| row.count).sum();
        let attributable = view
            .iter()
            .filter(|r| !r.department.is_empty() && !r.recruitment_source.is_empty())
            .count();
        prop_assert_eq!(recruited, attributable);

        let bucketed: usize = report.absences_by_salary.iter().map(|point| point.employees).sum();
        prop_assert_eq!(bucketed, view.len());
        prop_assert!(report
            .absences_by_salary
            .windows(2)
            .all(|pair| pair[0].salary_bucket < pair[1].salary_bucket));

        let scored = view.iter().filter(|r| r.engagement_survey.is_some()).count();
        prop_assert_eq!(report.engagement.len(), scored);
    }
}
