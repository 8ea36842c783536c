//! Browsable employee table: projection of the filtered records, per-column
//! query filters and optional multi-column sorting.

use super::domain::EmployeeRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeTableRow {
    pub employee_id: u32,
    pub employee_name: String,
    pub salary: u32,
    pub department: String,
    pub manager_name: Option<String>,
    pub recruitment_source: String,
    pub last_performance_review_date: Option<NaiveDate>,
    pub marital_status: Option<String>,
    pub race: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub absences: Option<u32>,
}

impl From<&EmployeeRecord> for EmployeeTableRow {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            employee_id: record.employee_id,
            employee_name: record.name.clone(),
            salary: record.salary,
            department: record.department.clone(),
            manager_name: record.manager.clone(),
            recruitment_source: record.recruitment_source.clone(),
            last_performance_review_date: record.last_review_date,
            marital_status: record.marital_status.clone(),
            race: record.race.clone(),
            date_of_birth: record
                .date_of_birth
                .map(|dob| dob.format("%Y-%m-%d").to_string()),
            absences: record.absences,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableColumn {
    EmployeeName,
    Salary,
    Department,
    ManagerName,
    RecruitmentSource,
    LastPerformanceReviewDate,
    MaritalStatus,
    Race,
    DateOfBirth,
    Absences,
}

impl TableColumn {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmployeeName => "Employee Name",
            Self::Salary => "Salary",
            Self::Department => "Department",
            Self::ManagerName => "Manager Name",
            Self::RecruitmentSource => "Recruitment Source",
            Self::LastPerformanceReviewDate => "Last Performance Review Date",
            Self::MaritalStatus => "Marital Status",
            Self::Race => "Race",
            Self::DateOfBirth => "Date of Birth",
            Self::Absences => "Absences",
        }
    }

    fn sort_value(self, record: &EmployeeRecord) -> Option<SortValue<'_>> {
        fn text(value: &str) -> Option<SortValue<'_>> {
            (!value.is_empty()).then_some(SortValue::Text(value))
        }

        match self {
            Self::EmployeeName => text(&record.name),
            Self::Salary => Some(SortValue::Number(record.salary)),
            Self::Department => text(&record.department),
            Self::ManagerName => record.manager.as_deref().map(SortValue::Text),
            Self::RecruitmentSource => text(&record.recruitment_source),
            Self::LastPerformanceReviewDate => record.last_review_date.map(SortValue::Date),
            Self::MaritalStatus => record.marital_status.as_deref().map(SortValue::Text),
            Self::Race => record.race.as_deref().map(SortValue::Text),
            Self::DateOfBirth => record.date_of_birth.map(SortValue::Date),
            Self::Absences => record.absences.map(SortValue::Number),
        }
    }
}

impl FromStr for TableColumn {
    type Err = TableQueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let column = match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "employee_name" | "name" => Self::EmployeeName,
            "salary" => Self::Salary,
            "department" => Self::Department,
            "manager_name" | "manager" => Self::ManagerName,
            "recruitment_source" => Self::RecruitmentSource,
            "last_performance_review_date" | "last_review" => Self::LastPerformanceReviewDate,
            "marital_status" => Self::MaritalStatus,
            "race" => Self::Race,
            "date_of_birth" | "dob" => Self::DateOfBirth,
            "absences" => Self::Absences,
            _ => return Err(TableQueryError::UnknownColumn(raw.trim().to_string())),
        };
        Ok(column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableQueryError {
    #[error("unknown table column '{0}'")]
    UnknownColumn(String),
    #[error("invalid sort key '{0}' (expected column[:asc|desc])")]
    InvalidSortKey(String),
    #[error("invalid filter '{query}' for column {column}")]
    InvalidFilter { column: &'static str, query: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue<'a> {
    Number(u32),
    Date(NaiveDate),
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: TableColumn,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(column: TableColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: TableColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }

    /// Absent values sort last in either direction.
    fn compare(&self, left: &EmployeeRecord, right: &EmployeeRecord) -> Ordering {
        match (
            self.column.sort_value(left),
            self.column.sort_value(right),
        ) {
            (Some(a), Some(b)) => match self.direction {
                SortDirection::Ascending => a.cmp(&b),
                SortDirection::Descending => b.cmp(&a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Parses `column` or `column:asc|desc`.
impl FromStr for SortKey {
    type Err = TableQueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match raw.rsplit_once(':') {
            Some((column, direction)) => (column, Some(direction.trim())),
            None => (raw, None),
        };
        let column = column.parse()?;
        match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") | Some("ascending") => Ok(Self::ascending(column)),
            Some("desc") | Some("descending") => Ok(Self::descending(column)),
            Some(_) => Err(TableQueryError::InvalidSortKey(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Contains,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// Splits a leading operator off `query`.
    fn split(query: &str) -> (Option<Self>, &str) {
        const OPERATORS: [(&str, Comparison); 6] = [
            (">=", Comparison::Ge),
            ("<=", Comparison::Le),
            ("!=", Comparison::Ne),
            (">", Comparison::Gt),
            ("<", Comparison::Lt),
            ("=", Comparison::Eq),
        ];
        let query = query.trim();
        OPERATORS
            .iter()
            .find_map(|(symbol, op)| {
                query
                    .strip_prefix(symbol)
                    .map(|rest| (Some(*op), rest.trim()))
            })
            .unwrap_or((None, query))
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Contains | Self::Eq => ordering.is_eq(),
            Self::Ne => ordering.is_ne(),
            Self::Lt => ordering.is_lt(),
            Self::Le => ordering.is_le(),
            Self::Gt => ordering.is_gt(),
            Self::Ge => ordering.is_ge(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Number(u32),
    Date(NaiveDate),
    /// Lowercased.
    Text(String),
}

/// A query against one table column, in the data-table filter syntax:
/// an optional operator (`>=`, `<=`, `!=`, `>`, `<`, `=`) followed by a value.
///
/// Text columns without an operator match case-insensitive substrings; number
/// and date columns (`YYYY-MM-DD`) without an operator match exactly. A row
/// with no value in the column never matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ColumnFilterRequest")]
pub struct ColumnFilter {
    column: TableColumn,
    comparison: Comparison,
    operand: Operand,
}

#[derive(Deserialize)]
struct ColumnFilterRequest {
    column: TableColumn,
    query: String,
}

impl TryFrom<ColumnFilterRequest> for ColumnFilter {
    type Error = TableQueryError;

    fn try_from(request: ColumnFilterRequest) -> Result<Self, Self::Error> {
        Self::new(request.column, &request.query)
    }
}

impl ColumnFilter {
    pub fn new(column: TableColumn, query: &str) -> Result<Self, TableQueryError> {
        let invalid = || TableQueryError::InvalidFilter {
            column: column.label(),
            query: query.to_string(),
        };

        let (operator, value) = Comparison::split(query);
        if value.is_empty() {
            return Err(invalid());
        }

        let (comparison, operand) = match column {
            TableColumn::Salary | TableColumn::Absences => {
                let number = value.parse::<u32>().map_err(|_| invalid())?;
                (operator.unwrap_or(Comparison::Eq), Operand::Number(number))
            }
            TableColumn::LastPerformanceReviewDate | TableColumn::DateOfBirth => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
                (operator.unwrap_or(Comparison::Eq), Operand::Date(date))
            }
            _ => (
                operator.unwrap_or(Comparison::Contains),
                Operand::Text(value.to_lowercase()),
            ),
        };

        Ok(Self {
            column,
            comparison,
            operand,
        })
    }

    pub fn column(&self) -> TableColumn {
        self.column
    }

    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        match (self.column.sort_value(record), &self.operand) {
            (Some(SortValue::Number(value)), Operand::Number(query)) => {
                self.comparison.holds(value.cmp(query))
            }
            (Some(SortValue::Date(value)), Operand::Date(query)) => {
                self.comparison.holds(value.cmp(query))
            }
            (Some(SortValue::Text(value)), Operand::Text(query)) => {
                let value = value.to_lowercase();
                match self.comparison {
                    Comparison::Contains => value.contains(query.as_str()),
                    comparison => comparison.holds(value.as_str().cmp(query.as_str())),
                }
            }
            _ => false,
        }
    }
}

/// Parses `column:query`, e.g. `salary:>=60000` or `manager_name:roup`.
impl FromStr for ColumnFilter {
    type Err = TableQueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (column, query) = raw
            .split_once(':')
            .ok_or_else(|| TableQueryError::InvalidFilter {
                column: "(none)",
                query: raw.to_string(),
            })?;
        Self::new(column.parse()?, query)
    }
}

/// Keeps the records passing every column filter, preserving order.
pub fn filter_table<'a>(
    records: &[&'a EmployeeRecord],
    filters: &[ColumnFilter],
) -> Vec<&'a EmployeeRecord> {
    records
        .iter()
        .copied()
        .filter(|record| filters.iter().all(|filter| filter.matches(record)))
        .collect()
}

/// Projects `records` into table rows, stably sorted by `sort` (first key wins).
pub fn employee_table(records: &[&EmployeeRecord], sort: &[SortKey]) -> Vec<EmployeeTableRow> {
    let mut ordered = records.to_vec();
    if !sort.is_empty() {
        ordered.sort_by(|left, right| {
            sort.iter()
                .map(|key| key.compare(left, right))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }
    ordered.into_iter().map(EmployeeTableRow::from).collect()
}
