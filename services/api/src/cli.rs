use crate::report::{run_report, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hr_analytics::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "HR Analytics Dashboard",
    about = "Serve or print filtered HR analytics over an employee dataset",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the dashboard summary for a filter selection
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override HR_DATASET_PATH
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_flags_repeat_and_accept_sort_keys() {
        let cli = Cli::try_parse_from([
            "hr-analytics-api",
            "report",
            "--department",
            "IT/IS",
            "--department",
            "Sales",
            "--satisfaction",
            "5",
            "--salary-min",
            "50000",
            "--sort",
            "salary:desc",
            "--where",
            "manager_name:roup",
        ])
        .expect("arguments parse");

        let Some(Command::Report(args)) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.department, vec!["IT/IS", "Sales"]);
        assert_eq!(args.satisfaction, vec![5]);
        assert_eq!(args.salary_min, Some(50_000));
        assert_eq!(args.sort.len(), 1);
        assert_eq!(args.column_filters.len(), 1);
    }

    #[test]
    fn malformed_column_filters_fail_argument_parsing() {
        let result = Cli::try_parse_from(["hr-analytics-api", "report", "--where", "salary:lots"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["hr-analytics-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
