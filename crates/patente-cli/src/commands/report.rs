//! Report command - end-of-shift summary of stored checks.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;

use patente_core::models::record::DAY_FORMAT;
use patente_core::{Clock, CsvStore, RecordStore, ShiftFilter, ShiftReport};

use super::load_config;

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Record store file (default: from config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Only include checks made today
    #[arg(long, conflicts_with = "date")]
    today: bool,

    /// Only include checks made on this day (DD/MM/YYYY)
    #[arg(long, value_parser = parse_day)]
    date: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|e| format!("expected DD/MM/YYYY: {}", e))
}

pub async fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let filter = match (args.today, args.date) {
        (true, _) => ShiftFilter::Day(config.clock().today()),
        (false, Some(day)) => ShiftFilter::Day(day),
        (false, None) => ShiftFilter::All,
    };

    let path = args.store.unwrap_or(config.store.path);
    let table = CsvStore::open(&path)?.table()?;
    let report = ShiftReport::build(&table, filter);

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text if report.is_empty() => {
            println!("{} No checks to report", style("ℹ").blue());
        }
        ReportFormat::Text => println!("{}", report),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("14/03/2025"), Ok(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()));
        assert!(parse_day("2025-03-14").is_err());
    }
}
