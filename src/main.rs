// Command-line entry point.
//
// Loads leg rows from a CSV export, runs the statistics engine in
// single-year or multi-year mode, writes the report as JSON and prints
// markdown previews of the headline tables.
use clap::Parser;
use flight_stats::loader::load_legs;
use flight_stats::output::{preview_report, write_json};
use flight_stats::util::format_int;
use flight_stats::{CancelToken, Config, LegFilter, StatsEngine};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flight-stats", about = "Yearly flight statistics reports")]
struct Args {
    /// CSV file with one flight leg per row.
    #[arg(long)]
    input: PathBuf,

    /// Single-year mode.
    #[arg(long, conflicts_with = "years")]
    year: Option<i32>,

    /// Multi-year comparison mode, e.g. `--years 2022,2023,2024`.
    #[arg(long, value_delimiter = ',')]
    years: Vec<i32>,

    /// Only legs of this operation type code.
    #[arg(long, conflicts_with = "scheduled_only")]
    operation_type: Option<String>,

    /// Shorthand for `--operation-type SCHEDULED`.
    #[arg(long)]
    scheduled_only: bool,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the JSON report.
    #[arg(long, default_value = "flight_stats_report.json")]
    output: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: Args) -> flight_stats::Result<()> {
    let config = Config::load_or_default(args.config.as_deref())?;
    let (source, load_report) = load_legs(&args.input)?;
    println!(
        "Processing dataset... ({} rows loaded, {} unreadable)\n",
        format_int(load_report.loaded_rows),
        format_int(load_report.unreadable_rows)
    );

    let filter = if args.scheduled_only {
        LegFilter::scheduled_only()
    } else if let Some(code) = args.operation_type {
        LegFilter {
            operation_type: Some(code),
        }
    } else {
        config.engine.default_filter()
    };

    let engine = StatsEngine::new(&source, &config.engine);
    let cancel = CancelToken::new();
    let preview_rows = config.output.preview_rows;

    match (args.year, args.years.as_slice()) {
        (Some(year), _) => {
            let report = engine.yearly_report(year, &filter, &cancel)?;
            write_json(&args.output, &report)?;
            preview_report(&report, preview_rows);
        }
        (None, years) => {
            let report = engine.multi_year_report(years, &filter, &cancel)?;
            write_json(&args.output, &report)?;
            for year_report in &report.years_data {
                preview_report(year_report, preview_rows);
            }
            println!(
                "Common routes: {}  Common airlines: {}",
                report.comparisons.common_routes.len(),
                report.comparisons.common_airlines.len()
            );
        }
    }
    println!("(Full report exported to {})", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "report generation failed");
            ExitCode::FAILURE
        }
    }
}
