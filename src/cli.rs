//! CLI argument parsing for rolemine

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format of the analytics document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON document for the presentation layer (default)
    Json,
    /// Human-readable summary
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "rolemine")]
#[command(version)]
#[command(
    about = "Historic role attribution and relationship mining over ticket data",
    long_about = None
)]
pub struct Cli {
    /// Ticket ledger (JSON array or project export object)
    #[arg(short, long, value_name = "FILE")]
    pub tickets: PathBuf,

    /// Curated configuration (roles, catalog, exclusions); embedded defaults if omitted
    #[arg(short, long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Revenue ledger keyed by cost group (JSON array)
    #[arg(long, value_name = "FILE")]
    pub revenue: Option<PathBuf>,

    /// Current staff and their formal roles (JSON array)
    #[arg(long, value_name = "FILE")]
    pub staff: Option<PathBuf>,

    /// Write the document here (atomic replace) instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Enable debug tracing output to stderr
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_tickets() {
        assert!(Cli::try_parse_from(["rolemine"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["rolemine", "--tickets", "tickets.json"]);
        assert_eq!(cli.tickets, PathBuf::from("tickets.json"));
        assert!(cli.config.is_none());
        assert!(cli.output.is_none());
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.pretty);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_all_inputs() {
        let cli = Cli::parse_from([
            "rolemine",
            "-t",
            "t.json",
            "-c",
            "roles.toml",
            "--revenue",
            "rev.json",
            "--staff",
            "staff.json",
            "-o",
            "out.json",
            "--pretty",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("roles.toml")));
        assert_eq!(cli.revenue, Some(PathBuf::from("rev.json")));
        assert_eq!(cli.staff, Some(PathBuf::from("staff.json")));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(cli.pretty);
    }

    #[test]
    fn test_cli_text_format() {
        let cli = Cli::parse_from(["rolemine", "--tickets", "t.json", "--format", "text"]);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["rolemine", "--tickets", "t.json", "--format", "csv"]).is_err());
    }
}
