use crate::infra::{load_dataset, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use hr_analytics::analytics::{
    employee_table, filter_table, ColumnFilter, DashboardReport, EmployeeDataset,
    EmployeeTableRow, FilterSelection, SortKey, TableColumn,
};
use hr_analytics::config::AppConfig;
use hr_analytics::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// CSV export to analyse (defaults to HR_DATASET_PATH)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Date used to derive employee ages (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Department to include (repeatable)
    #[arg(long)]
    pub(crate) department: Vec<String>,
    /// Position to include (repeatable)
    #[arg(long)]
    pub(crate) position: Vec<String>,
    /// Performance score category to include (repeatable)
    #[arg(long)]
    pub(crate) performance: Vec<String>,
    /// Sex value to include (repeatable)
    #[arg(long)]
    pub(crate) sex: Vec<String>,
    /// Employment status to include (repeatable)
    #[arg(long)]
    pub(crate) employment_status: Vec<String>,
    /// Satisfaction rating to include (repeatable)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub(crate) satisfaction: Vec<u8>,
    #[arg(long)]
    pub(crate) salary_min: Option<u32>,
    #[arg(long)]
    pub(crate) salary_max: Option<u32>,
    #[arg(long)]
    pub(crate) age_min: Option<u32>,
    #[arg(long)]
    pub(crate) age_max: Option<u32>,
    /// Earliest hire date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) hired_from: Option<NaiveDate>,
    /// Latest hire date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) hired_to: Option<NaiveDate>,
    /// Print the matching employee rows after the summary
    #[arg(long)]
    pub(crate) list_employees: bool,
    /// Sort key for the employee listing, e.g. `salary:desc` (repeatable)
    #[arg(long)]
    pub(crate) sort: Vec<SortKey>,
    /// Column filter for the employee listing, e.g. `salary:>=60000` (repeatable)
    #[arg(long = "where", value_name = "COLUMN:QUERY")]
    pub(crate) column_filters: Vec<ColumnFilter>,
}

const LISTING_COLUMNS: [TableColumn; 6] = [
    TableColumn::EmployeeName,
    TableColumn::Department,
    TableColumn::Salary,
    TableColumn::ManagerName,
    TableColumn::RecruitmentSource,
    TableColumn::Absences,
];

impl ReportArgs {
    /// One-sided ranges are completed with the widest possible bound.
    pub(crate) fn selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::default()
            .with_departments(&self.department)
            .with_positions(&self.position)
            .with_performance_scores(&self.performance)
            .with_sexes(&self.sex)
            .with_employment_statuses(&self.employment_status)
            .with_satisfaction(self.satisfaction.iter().copied());

        if self.salary_min.is_some() || self.salary_max.is_some() {
            selection = selection.with_salary(
                self.salary_min.unwrap_or(0),
                self.salary_max.unwrap_or(u32::MAX),
            );
        }
        if self.age_min.is_some() || self.age_max.is_some() {
            selection =
                selection.with_age(self.age_min.unwrap_or(0), self.age_max.unwrap_or(u32::MAX));
        }
        if self.hired_from.is_some() || self.hired_to.is_some() {
            selection = selection.with_hire_dates(
                self.hired_from.unwrap_or(NaiveDate::MIN),
                self.hired_to.unwrap_or(NaiveDate::MAX),
            );
        }
        selection
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let path = match args.dataset.clone() {
        Some(path) => path,
        None => AppConfig::load()?.dataset.path,
    };
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let dataset = load_dataset(&path, as_of)?;

    let selection = args.selection();
    let matching = dataset.filter(&selection);
    let report = DashboardReport::from_records(&matching);

    render_dashboard(&dataset, &selection, &report);

    if args.list_employees {
        let listed = filter_table(&matching, &args.column_filters);
        let rows = employee_table(&listed, &args.sort);
        if !args.column_filters.is_empty() {
            let columns: Vec<&str> = args
                .column_filters
                .iter()
                .map(|filter| filter.column().label())
                .collect();
            println!("\nColumn filters: {}", columns.join(", "));
        }
        if rows.is_empty() {
            println!("\nEmployees: none");
        } else {
            println!("\nEmployees ({})", rows.len());
            println!("{}", listing_header());
            for row in &rows {
                println!("{}", listing_line(row));
            }
        }
    }

    Ok(())
}

fn listing_header() -> String {
    LISTING_COLUMNS
        .iter()
        .map(|column| column.label())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn listing_line(row: &EmployeeTableRow) -> String {
    LISTING_COLUMNS
        .iter()
        .map(|column| match column {
            TableColumn::EmployeeName => row.employee_name.clone(),
            TableColumn::Department => row.department.clone(),
            TableColumn::Salary => format!("${}", row.salary),
            TableColumn::ManagerName => row.manager_name.clone().unwrap_or_else(|| "-".to_string()),
            TableColumn::RecruitmentSource => row.recruitment_source.clone(),
            TableColumn::Absences => row
                .absences
                .map(|count| count.to_string())
                .unwrap_or_else(|| "-".to_string()),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_dashboard(
    dataset: &EmployeeDataset,
    selection: &FilterSelection,
    report: &DashboardReport,
) {
    println!("HR analytics dashboard");
    println!(
        "Dataset: {} employees ({} rows skipped), ages as of {}",
        dataset.len(),
        dataset.skipped_rows().len(),
        dataset.as_of()
    );

    let active: Vec<&str> = selection
        .active_fields()
        .into_iter()
        .map(|field| field.label())
        .collect();
    if active.is_empty() {
        println!("Filters: none");
    } else {
        println!("Filters: {}", active.join(", "));
    }

    println!(
        "\nHeadcount {} | Average salary {}",
        report.headcount, report.salary.display
    );

    if report.gender.is_empty() {
        println!("\nGender split: no data");
    } else {
        println!("\nGender split");
        for entry in &report.gender {
            println!("- {}: {}", entry.sex, entry.count);
        }
    }

    if report.recruitment.departments.is_empty() {
        println!("\nRecruitment by department: no data");
    } else {
        println!("\nRecruitment by department");
        for department in &report.recruitment.departments {
            println!(
                "- {}: {} recruited, satisfaction {}",
                department.department, department.total_recruited, department.annotation
            );
            for count in report
                .recruitment
                .counts
                .iter()
                .filter(|count| count.department == department.department)
            {
                println!("    - {}: {}", count.source, count.count);
            }
        }
    }

    if report.absences_by_salary.is_empty() {
        println!("\nAbsences by salary: no data");
    } else {
        println!("\nAbsences by salary");
        for point in &report.absences_by_salary {
            match point.mean_absences {
                Some(mean) => println!(
                    "- ~${}: {:.1} avg absences ({} employees)",
                    point.salary_bucket, mean, point.employees
                ),
                None => println!(
                    "- ~${}: no absence data ({} employees)",
                    point.salary_bucket, point.employees
                ),
            }
        }
    }

    println!(
        "\nEngagement scores plotted: {} of {}",
        report.engagement.len(),
        report.headcount
    );
}
