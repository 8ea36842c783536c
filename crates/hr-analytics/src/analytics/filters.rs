//! Filter selection and the conjunctive predicate pipeline.
//!
//! Every widget on the dashboard maps to one [`FilterField`]. A field left
//! empty in the [`FilterSelection`] is unconstrained; all constrained fields
//! must hold for a record to survive.

use super::dataset::normalize_label;
use super::domain::EmployeeRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Department,
    Position,
    PerformanceScore,
    Sex,
    EmploymentStatus,
    Salary,
    Age,
    Satisfaction,
    HireDate,
}

impl FilterField {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Department,
            Self::Position,
            Self::PerformanceScore,
            Self::Sex,
            Self::EmploymentStatus,
            Self::Salary,
            Self::Age,
            Self::Satisfaction,
            Self::HireDate,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::Position => "Position",
            Self::PerformanceScore => "Performance Score",
            Self::Sex => "Gender",
            Self::EmploymentStatus => "Employment Status",
            Self::Salary => "Salary",
            Self::Age => "Age",
            Self::Satisfaction => "Employee Satisfaction",
            Self::HireDate => "Hire Date",
        }
    }
}

/// Inclusive `[min, max]` interval. An inverted interval contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> ClosedRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.min <= *value && *value <= self.max
    }
}

/// Snapshot of the dashboard widgets. Immutable per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    #[serde(deserialize_with = "label_set")]
    pub departments: BTreeSet<String>,
    #[serde(deserialize_with = "label_set")]
    pub positions: BTreeSet<String>,
    #[serde(deserialize_with = "label_set")]
    pub performance_scores: BTreeSet<String>,
    #[serde(deserialize_with = "label_set")]
    pub sexes: BTreeSet<String>,
    #[serde(deserialize_with = "label_set")]
    pub employment_statuses: BTreeSet<String>,
    pub salary: Option<ClosedRange<u32>>,
    pub age: Option<ClosedRange<u32>>,
    #[serde(deserialize_with = "nullable_set")]
    pub satisfaction: BTreeSet<u8>,
    pub hire_date: Option<ClosedRange<NaiveDate>>,
}

/// `None` means the selection leaves the field unconstrained.
type FieldPredicate = fn(&FilterSelection, &EmployeeRecord) -> Option<bool>;

const PREDICATES: [(FilterField, FieldPredicate); 9] = [
    (FilterField::Department, |s, r| member(&s.departments, &r.department)),
    (FilterField::Position, |s, r| member(&s.positions, &r.position)),
    (FilterField::PerformanceScore, |s, r| {
        member(&s.performance_scores, &r.performance_score)
    }),
    (FilterField::Sex, |s, r| member(&s.sexes, &r.sex)),
    (FilterField::EmploymentStatus, |s, r| {
        member(&s.employment_statuses, &r.employment_status)
    }),
    (FilterField::Salary, |s, r| {
        s.salary.map(|range| range.contains(&r.salary))
    }),
    (FilterField::Age, |s, r| within(s.age.as_ref(), r.age.as_ref())),
    (FilterField::Satisfaction, |s, r| {
        (!s.satisfaction.is_empty())
            .then(|| r.satisfaction.is_some_and(|score| s.satisfaction.contains(&score)))
    }),
    (FilterField::HireDate, |s, r| {
        within(s.hire_date.as_ref(), r.hire_date.as_ref())
    }),
];

fn member(selected: &BTreeSet<String>, value: &str) -> Option<bool> {
    (!selected.is_empty()).then(|| selected.contains(value))
}

fn within<T: PartialOrd>(range: Option<&ClosedRange<T>>, value: Option<&T>) -> Option<bool> {
    range.map(|range| value.is_some_and(|value| range.contains(value)))
}

impl FilterSelection {
    pub fn with_departments<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.departments = collect_labels(values);
        self
    }

    pub fn with_positions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.positions = collect_labels(values);
        self
    }

    pub fn with_performance_scores<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.performance_scores = collect_labels(values);
        self
    }

    pub fn with_sexes<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sexes = collect_labels(values);
        self
    }

    pub fn with_employment_statuses<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.employment_statuses = collect_labels(values);
        self
    }

    pub fn with_salary(mut self, min: u32, max: u32) -> Self {
        self.salary = Some(ClosedRange::new(min, max));
        self
    }

    pub fn with_age(mut self, min: u32, max: u32) -> Self {
        self.age = Some(ClosedRange::new(min, max));
        self
    }

    pub fn with_satisfaction<I: IntoIterator<Item = u8>>(mut self, scores: I) -> Self {
        self.satisfaction = scores.into_iter().collect();
        self
    }

    pub fn with_hire_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.hire_date = Some(ClosedRange::new(start, end));
        self
    }

    /// Whether the selection places any restriction on `field`.
    pub fn constrains(&self, field: FilterField) -> bool {
        match field {
            FilterField::Department => !self.departments.is_empty(),
            FilterField::Position => !self.positions.is_empty(),
            FilterField::PerformanceScore => !self.performance_scores.is_empty(),
            FilterField::Sex => !self.sexes.is_empty(),
            FilterField::EmploymentStatus => !self.employment_statuses.is_empty(),
            FilterField::Salary => self.salary.is_some(),
            FilterField::Age => self.age.is_some(),
            FilterField::Satisfaction => !self.satisfaction.is_empty(),
            FilterField::HireDate => self.hire_date.is_some(),
        }
    }

    pub fn active_fields(&self) -> Vec<FilterField> {
        FilterField::ordered()
            .into_iter()
            .filter(|field| self.constrains(*field))
            .collect()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_fields().is_empty()
    }

    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        PREDICATES
            .iter()
            .all(|(_, predicate)| predicate(self, record).unwrap_or(true))
    }

    /// Constrained fields that `record` fails, in widget order.
    pub fn rejections(&self, record: &EmployeeRecord) -> Vec<FilterField> {
        PREDICATES
            .iter()
            .filter(|(_, predicate)| predicate(self, record) == Some(false))
            .map(|(field, _)| *field)
            .collect()
    }
}

/// Retains the records satisfying every constrained field, preserving order.
pub fn apply_filters<'a, I>(records: I, selection: &FilterSelection) -> Vec<&'a EmployeeRecord>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    records
        .into_iter()
        .filter(|record| selection.matches(record))
        .collect()
}

fn collect_labels<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| normalize_label(value.as_ref()))
        .filter(|value| !value.is_empty())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts `null`, a single label, or a list of labels.
fn label_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    };
    Ok(collect_labels(labels))
}

fn nullable_set<'de, D, T>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Ord,
{
    Ok(Option::<BTreeSet<T>>::deserialize(deserializer)?.unwrap_or_default())
}
