use clap::{Args, Parser, Subcommand};
use kpi_dashboard::config::AppConfig;
use kpi_dashboard::dashboard::DashboardAssembler;
use kpi_dashboard::dataset::Dataset;
use kpi_dashboard::error::AppError;
use kpi_dashboard::export;
use kpi_dashboard::kpi::{report, KpiEngine, KpiStore};
use kpi_dashboard::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "KPI Dashboard",
    about = "Compute business KPIs from a CSV or spreadsheet and export dashboard data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute every KPI and print a summary report
    Report(InputArgs),
    /// Compute every KPI and write the dashboard document plus BI exports
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Dataset to analyze (.csv, .xlsx, .xls, .xlsm or .ods)
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Directory receiving the exported files (defaults to KPI_OUTPUT_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, "kpi dashboard starting");

    match cli.command {
        Command::Report(args) => run_report(&config, args),
        Command::Export(args) => run_export(&config, args),
    }
}

fn compute(config: &AppConfig, dataset: &Dataset) -> KpiStore {
    let mut engine = KpiEngine::new(dataset);
    engine.calculate_all(&config.analysis.columns);
    engine.into_store()
}

fn run_report(config: &AppConfig, args: InputArgs) -> Result<(), AppError> {
    let dataset = Dataset::from_path(&args.input)?;
    let store = compute(config, &dataset);
    println!("{}", report::summary_report(&store));
    Ok(())
}

fn run_export(config: &AppConfig, args: ExportArgs) -> Result<(), AppError> {
    let dataset = Dataset::from_path(&args.input.input)?;
    let store = compute(config, &dataset);
    println!("{}", report::summary_report(&store));

    let snapshot = DashboardAssembler::new(&dataset, &store).build_snapshot();
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.analysis.output_dir.clone());
    let written = export::export_all(&snapshot, &output_dir)?;

    println!("\nFiles written:");
    for path in written {
        println!("- {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_accepts_optional_output_dir() {
        let cli = Cli::try_parse_from([
            "kpi-dashboard",
            "export",
            "--input",
            "data.csv",
            "--output-dir",
            "out",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Export(args) => {
                assert_eq!(args.input.input, PathBuf::from("data.csv"));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn report_requires_input() {
        assert!(Cli::try_parse_from(["kpi-dashboard", "report"]).is_err());
    }
}
