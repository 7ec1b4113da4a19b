use anyhow::{Context, Result};
use clap::Parser;
use rolemine::cli::{Cli, OutputFormat};
use rolemine::config::AnalyticsConfig;
use rolemine::ledger::{self, TicketLedger};
use rolemine::pipeline::{self, BatchInput};
use rolemine::report;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; logs go to stderr so stdout stays clean
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load every input up front; any failure aborts before output is touched
fn load_input(args: &Cli) -> Result<BatchInput> {
    let config = match &args.config {
        Some(path) => AnalyticsConfig::from_toml(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => AnalyticsConfig::embedded_default().context("Embedded configuration is invalid")?,
    };

    let ledger = TicketLedger::from_json_path(&args.tickets)
        .with_context(|| format!("Failed to load tickets {}", args.tickets.display()))?;

    let mut input = BatchInput::new(ledger, config);

    if let Some(path) = &args.revenue {
        let (records, stats) = ledger::load_revenue(path)
            .with_context(|| format!("Failed to load revenue {}", path.display()))?;
        input.revenue = records;
        input.revenue_stats = stats;
    }

    if let Some(path) = &args.staff {
        let (staff, stats) = ledger::load_staff(path)
            .with_context(|| format!("Failed to load staff {}", path.display()))?;
        input.staff = staff;
        input.staff_stats = stats;
    }

    Ok(input)
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let input = load_input(&args)?;
    let report = pipeline::run(&input).context("Batch run failed")?;

    match (args.format, &args.output) {
        (OutputFormat::Json, Some(path)) => {
            report::write_atomic(&report, path, args.pretty)?;
        }
        (OutputFormat::Json, None) => {
            let text = report.to_json(args.pretty)?;
            std::io::stdout()
                .lock()
                .write_all(text.as_bytes())
                .context("Failed to write report to stdout")?;
        }
        (OutputFormat::Text, Some(path)) => {
            report::replace_file(path, &report.render_text())
                .with_context(|| format!("Failed to write summary {}", path.display()))?;
        }
        (OutputFormat::Text, None) => {
            print!("{}", report.render_text());
        }
    }

    Ok(())
}
