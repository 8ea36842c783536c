use super::normalizer::{normalize_label, optional_label};
use super::DatasetError;
use crate::analytics::domain::{age_on, EmployeeRecord};
use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// Columns without which a row cannot be interpreted at all.
pub(crate) const REQUIRED_COLUMNS: [&str; 2] = ["EmpID", "Salary"];

#[derive(Debug, Default)]
pub(crate) struct ParsedRows {
    pub(crate) records: Vec<EmployeeRecord>,
    pub(crate) skipped: Vec<SkippedRow>,
}

/// A data row that was dropped during load, with the 1-based CSV line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("missing required field {0}")]
    MissingField(&'static str),
    #[error("field {field} has non-numeric value '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

pub(crate) fn parse_rows<R: Read>(reader: R, as_of: NaiveDate) -> Result<ParsedRows, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| normalize_label(header) == column) {
            return Err(DatasetError::MissingColumn(column));
        }
    }

    let mut parsed = ParsedRows::default();
    for result in csv_reader.records() {
        let raw = match result {
            Ok(raw) => raw,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err.position().map(|position| position.line()).unwrap_or(0);
                parsed.skipped.push(SkippedRow {
                    line,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let line = raw.position().map(|position| position.line()).unwrap_or(0);
        let outcome = raw
            .deserialize::<EmployeeRow>(Some(&headers))
            .map_err(|err| err.to_string())
            .and_then(|row| row.into_record(as_of).map_err(|err| err.to_string()));

        match outcome {
            Ok(record) => parsed.records.push(record),
            Err(reason) => parsed.skipped.push(SkippedRow { line, reason }),
        }
    }

    Ok(parsed)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmployeeRow {
    #[serde(rename = "Employee_Name")]
    name: Option<String>,
    #[serde(rename = "EmpID")]
    employee_id: Option<String>,
    #[serde(rename = "DOB")]
    date_of_birth: Option<String>,
    #[serde(rename = "Sex")]
    sex: Option<String>,
    #[serde(rename = "MaritalDesc")]
    marital_status: Option<String>,
    #[serde(rename = "RaceDesc")]
    race: Option<String>,
    #[serde(rename = "HispanicLatino")]
    hispanic_latino: Option<String>,
    #[serde(rename = "Department")]
    department: Option<String>,
    #[serde(rename = "Position")]
    position: Option<String>,
    #[serde(rename = "ManagerName")]
    manager: Option<String>,
    #[serde(rename = "EmploymentStatus")]
    employment_status: Option<String>,
    #[serde(rename = "Termd")]
    terminated: Option<String>,
    #[serde(rename = "DateofTermination")]
    termination_date: Option<String>,
    #[serde(rename = "TermReason")]
    termination_reason: Option<String>,
    #[serde(rename = "RecruitmentSource")]
    recruitment_source: Option<String>,
    #[serde(rename = "PerformanceScore")]
    performance_score: Option<String>,
    #[serde(rename = "EngagementSurvey")]
    engagement_survey: Option<String>,
    #[serde(rename = "EmpSatisfaction")]
    satisfaction: Option<String>,
    #[serde(rename = "Absences")]
    absences: Option<String>,
    #[serde(rename = "LastPerformanceReview_Date")]
    last_review_date: Option<String>,
    #[serde(rename = "Salary")]
    salary: Option<String>,
    #[serde(rename = "DateofHire")]
    hire_date: Option<String>,
}

impl EmployeeRow {
    fn into_record(self, as_of: NaiveDate) -> Result<EmployeeRecord, RowError> {
        let employee_id = required_number("EmpID", self.employee_id.as_deref())?;
        let salary_raw = self.salary.as_deref().map(|value| value.replace(['$', ','], ""));
        let salary = required_number("Salary", salary_raw.as_deref())?;

        let date_of_birth = self
            .date_of_birth
            .as_deref()
            .and_then(|value| parse_birth_date(value, as_of));
        let age = date_of_birth.and_then(|dob| age_on(dob, as_of));

        Ok(EmployeeRecord {
            employee_id,
            name: label(self.name.as_deref()),
            date_of_birth,
            sex: label(self.sex.as_deref()),
            marital_status: optional_label(self.marital_status.as_deref()),
            race: optional_label(self.race.as_deref()),
            hispanic_latino: self.hispanic_latino.as_deref().and_then(parse_yes_no),
            department: label(self.department.as_deref()),
            position: label(self.position.as_deref()),
            manager: optional_label(self.manager.as_deref()),
            employment_status: label(self.employment_status.as_deref()),
            terminated: self
                .terminated
                .as_deref()
                .and_then(parse_flag)
                .unwrap_or(false),
            termination_date: self.termination_date.as_deref().and_then(parse_date),
            termination_reason: optional_label(self.termination_reason.as_deref()),
            recruitment_source: label(self.recruitment_source.as_deref()),
            performance_score: label(self.performance_score.as_deref()),
            engagement_survey: self
                .engagement_survey
                .as_deref()
                .and_then(|value| value.trim().parse::<f64>().ok())
                .filter(|score| score.is_finite()),
            satisfaction: optional_number(self.satisfaction.as_deref()),
            absences: optional_number(self.absences.as_deref()),
            last_review_date: self.last_review_date.as_deref().and_then(parse_date),
            salary,
            hire_date: self.hire_date.as_deref().and_then(parse_date),
            age,
        })
    }
}

fn label(value: Option<&str>) -> String {
    value.map(normalize_label).unwrap_or_default()
}

fn required_number<T: FromStr>(field: &'static str, value: Option<&str>) -> Result<T, RowError> {
    let raw = value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or(RowError::MissingField(field))?;
    raw.parse::<T>().map_err(|_| RowError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn optional_number<T: FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|raw| raw.trim().parse::<T>().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `M/D/YYYY` and `M/D/YY`.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }

    let format = match year_digits(trimmed) {
        Some(4) => "%m/%d/%Y",
        Some(2) => "%m/%d/%y",
        _ => return None,
    };
    NaiveDate::parse_from_str(trimmed, format).ok()
}

/// Two-digit birth years that resolve past `as_of` belong to the previous century.
fn parse_birth_date(value: &str, as_of: NaiveDate) -> Option<NaiveDate> {
    let date = parse_date(value)?;
    if date > as_of && year_digits(value.trim()) == Some(2) {
        return date.checked_sub_months(Months::new(1200));
    }
    Some(date)
}

fn year_digits(value: &str) -> Option<usize> {
    let mut parts = value.split('/');
    let (_, _, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(year.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid as-of date")
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn parse_date_supports_iso_and_us_formats() {
        assert_eq!(parse_date("2011-07-05"), Some(date(2011, 7, 5)));
        assert_eq!(parse_date("2011-07-05 00:00:00"), Some(date(2011, 7, 5)));
        assert_eq!(parse_date("7/5/2011"), Some(date(2011, 7, 5)));
        assert_eq!(parse_date("1/17/2019"), Some(date(2019, 1, 17)));
        assert_eq!(parse_date("  "), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("13/45/2019"), None);
    }

    #[test]
    fn two_digit_birth_years_never_land_in_the_future() {
        assert_eq!(parse_birth_date("07/10/83", as_of()), Some(date(1983, 7, 10)));
        assert_eq!(parse_birth_date("05/02/55", as_of()), Some(date(1955, 5, 2)));
        assert_eq!(parse_birth_date("01/01/10", as_of()), Some(date(2010, 1, 1)));
        assert_eq!(parse_birth_date("12/31/2030", as_of()), Some(date(2030, 12, 31)));
    }

    #[test]
    fn row_with_blank_optional_fields_still_loads() {
        let csv = "Employee_Name,EmpID,Salary,Department,Sex,DOB,DateofHire,DateofTermination,TermReason,Absences\n\
Adinolfi  Wilson,10026,62506,Production       ,M ,07/10/83,7/5/2011,,N/A-StillEmployed,1\n";
        let parsed = parse_rows(Cursor::new(csv), as_of()).expect("parse");
        assert!(parsed.skipped.is_empty());

        let record = &parsed.records[0];
        assert_eq!(record.employee_id, 10026);
        assert_eq!(record.name, "Adinolfi Wilson");
        assert_eq!(record.department, "Production");
        assert_eq!(record.sex, "M");
        assert_eq!(record.age, Some(40));
        assert_eq!(record.hire_date, Some(date(2011, 7, 5)));
        assert_eq!(record.termination_date, None);
        assert_eq!(record.absences, Some(1));
        assert_eq!(record.satisfaction, None);
        assert!(!record.terminated);
    }

    #[test]
    fn rows_with_bad_required_numbers_are_skipped_with_line_numbers() {
        let csv = "EmpID,Salary,Department\n\
1,50000,Sales\n\
two,51000,Sales\n\
3,,Sales\n\
4,\"$52,000\",Sales\n";
        let parsed = parse_rows(Cursor::new(csv), as_of()).expect("parse");

        let ids: Vec<u32> = parsed.records.iter().map(|r| r.employee_id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(parsed.records[1].salary, 52_000);

        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[0].line, 3);
        assert!(parsed.skipped[0].reason.contains("EmpID"));
        assert_eq!(parsed.skipped[1].line, 4);
        assert!(parsed.skipped[1].reason.contains("Salary"));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "EmpID,Department\n1,Sales\n";
        let error = parse_rows(Cursor::new(csv), as_of()).expect_err("salary column missing");
        assert!(matches!(error, DatasetError::MissingColumn("Salary")));
    }

    #[test]
    fn flags_and_scores_parse_leniently() {
        let csv = "EmpID,Salary,Termd,HispanicLatino,EngagementSurvey,EmpSatisfaction\n\
1,50000,1,yes,4.6,5\n\
2,50000,0,No,n/a,high\n";
        let parsed = parse_rows(Cursor::new(csv), as_of()).expect("parse");
        let (first, second) = (&parsed.records[0], &parsed.records[1]);

        assert!(first.terminated);
        assert_eq!(first.hispanic_latino, Some(true));
        assert_eq!(first.engagement_survey, Some(4.6));
        assert_eq!(first.satisfaction, Some(5));

        assert!(!second.terminated);
        assert_eq!(second.hispanic_latino, Some(false));
        assert_eq!(second.engagement_survey, None);
        assert_eq!(second.satisfaction, None);
    }
}
