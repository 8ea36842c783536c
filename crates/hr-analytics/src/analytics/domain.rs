use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Width of the salary bands used by the absences-vs-salary aggregate.
pub const SALARY_BUCKET_WIDTH: u32 = 10_000;

/// One employee row after normalisation. Immutable once the dataset is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub employee_id: u32,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: String,
    pub marital_status: Option<String>,
    pub race: Option<String>,
    pub hispanic_latino: Option<bool>,
    pub department: String,
    pub position: String,
    pub manager: Option<String>,
    pub employment_status: String,
    pub terminated: bool,
    pub termination_date: Option<NaiveDate>,
    pub termination_reason: Option<String>,
    pub recruitment_source: String,
    pub performance_score: String,
    pub engagement_survey: Option<f64>,
    pub satisfaction: Option<u8>,
    pub absences: Option<u32>,
    pub last_review_date: Option<NaiveDate>,
    pub salary: u32,
    pub hire_date: Option<NaiveDate>,
    /// Whole years as of the dataset's reference date.
    pub age: Option<u32>,
}

impl EmployeeRecord {
    pub fn salary_bucket(&self) -> u64 {
        salary_bucket(self.salary)
    }
}

/// Completed years between `date_of_birth` and `as_of`.
///
/// Returns `None` when the birth date lies after `as_of`.
pub fn age_on(date_of_birth: NaiveDate, as_of: NaiveDate) -> Option<u32> {
    let mut years = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Salary rounded to the nearest [`SALARY_BUCKET_WIDTH`], ties to the even multiple.
pub fn salary_bucket(salary: u32) -> u64 {
    let width = u64::from(SALARY_BUCKET_WIDTH);
    let salary = u64::from(salary);
    let quotient = salary / width;
    let remainder = salary % width;
    let half = width / 2;

    let rounded = if remainder > half || (remainder == half && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    rounded * width
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn age_counts_birthday_only_once_it_has_passed() {
        let dob = date(1983, 7, 10);
        assert_eq!(age_on(dob, date(2024, 7, 9)), Some(40));
        assert_eq!(age_on(dob, date(2024, 7, 10)), Some(41));
        assert_eq!(age_on(dob, date(2024, 12, 1)), Some(41));
        assert_eq!(age_on(dob, date(2025, 1, 1)), Some(41));
    }

    #[test]
    fn age_is_absent_for_future_birth_dates() {
        assert_eq!(age_on(date(2030, 1, 1), date(2024, 6, 1)), None);
        assert_eq!(age_on(date(2024, 6, 2), date(2024, 6, 1)), None);
        assert_eq!(age_on(date(2024, 6, 1), date(2024, 6, 1)), Some(0));
    }

    #[test]
    fn leap_day_birthdays_roll_over_on_march_first() {
        let dob = date(2000, 2, 29);
        assert_eq!(age_on(dob, date(2023, 2, 28)), Some(22));
        assert_eq!(age_on(dob, date(2023, 3, 1)), Some(23));
    }

    #[test]
    fn salary_bucket_rounds_to_nearest_ten_thousand() {
        assert_eq!(salary_bucket(41_000), 40_000);
        assert_eq!(salary_bucket(48_000), 50_000);
        assert_eq!(salary_bucket(62_000), 60_000);
        assert_eq!(salary_bucket(4_999), 0);
        assert_eq!(salary_bucket(0), 0);
    }

    #[test]
    fn salary_bucket_ties_round_to_even_multiple() {
        assert_eq!(salary_bucket(45_000), 40_000);
        assert_eq!(salary_bucket(55_000), 60_000);
        assert_eq!(salary_bucket(45_001), 50_000);
        assert_eq!(salary_bucket(u32::MAX), 4_294_970_000);
    }
}
