//! Option lists and bounds for the dashboard's filter widgets.

use super::domain::EmployeeRecord;
use super::report::format_dollars;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliderMark {
    pub value: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSlider {
    pub min: u32,
    pub max: u32,
    pub mid: u32,
    pub marks: Vec<SliderMark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCatalog {
    pub departments: Vec<String>,
    pub positions: Vec<String>,
    pub performance_scores: Vec<String>,
    pub sexes: Vec<String>,
    pub employment_statuses: Vec<String>,
    pub salary: Option<RangeSlider>,
    pub age: Option<RangeSlider>,
    pub satisfaction: Vec<u8>,
    pub hire_date: Option<DateBounds>,
}

impl FilterCatalog {
    pub fn from_records(records: &[EmployeeRecord]) -> Self {
        let salary = slider(records.iter().map(|r| r.salary), 1_000, |value| {
            format_dollars(value.into())
        });
        let age = slider(records.iter().filter_map(|r| r.age), 10, |value| {
            format!("{value} yrs")
        });

        let satisfaction: BTreeSet<u8> = records.iter().filter_map(|r| r.satisfaction).collect();

        let hire_dates = records.iter().filter_map(|r| r.hire_date);
        let hire_date = hire_dates
            .clone()
            .min()
            .zip(hire_dates.max())
            .map(|(earliest, latest)| DateBounds { earliest, latest });

        Self {
            departments: distinct(records.iter().map(|r| r.department.as_str())),
            positions: distinct(records.iter().map(|r| r.position.as_str())),
            performance_scores: distinct(records.iter().map(|r| r.performance_score.as_str())),
            sexes: distinct(records.iter().map(|r| r.sex.as_str())),
            employment_statuses: distinct(records.iter().map(|r| r.employment_status.as_str())),
            salary,
            age,
            satisfaction: satisfaction.into_iter().collect(),
            hire_date,
        }
    }
}

/// Non-blank values in first-appearance order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Min/max bounds with a midpoint rounded to `step` (ties to even) and a
/// mark at each distinct point.
fn slider<I, F>(values: I, step: u32, label: F) -> Option<RangeSlider>
where
    I: Iterator<Item = u32> + Clone,
    F: Fn(u32) -> String,
{
    let min = values.clone().min()?;
    let max = values.max()?;

    let midpoint = (f64::from(min) + f64::from(max)) / 2.0 / f64::from(step);
    let mid = (midpoint.round_ties_even() * f64::from(step)) as u32;

    let points: BTreeSet<u32> = [min, mid, max].into_iter().collect();
    let marks = points
        .into_iter()
        .map(|value| SliderMark {
            value,
            label: label(value),
        })
        .collect();

    Some(RangeSlider {
        min,
        max,
        mid,
        marks,
    })
}
