//! Extract command - license fields from a single document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use patente_core::{ExtractionResult, FieldRecord};

use super::{license_parser, load_config, read_document};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file: license photo or OCR text dump (`-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the normalized text the fields were matched against
    #[arg(long)]
    show_text: bool,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());
    let text = read_document(&args.input, &config)?;

    let parser = license_parser(&config);
    let result = parser.parse(&text);

    if args.show_text {
        eprintln!("{} {}", style("Normalized:").dim(), result.normalized_text);
    }

    let output = format_record(&result.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        print_confidence(&result);
    }

    for warning in &result.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    Ok(())
}

fn print_confidence(result: &ExtractionResult) {
    eprintln!();
    for (key, m) in &result.matches {
        eprintln!(
            "{} {:<15} {:>5.1}%  ({})",
            style("ℹ").blue(),
            key.as_str(),
            m.confidence * 100.0,
            m.source
        );
    }
    eprintln!(
        "{} Extraction confidence: {:.1}% in {}µs",
        style("ℹ").blue(),
        result.confidence() * 100.0,
        result.processing_time_us
    );
}

pub fn format_record(record: &FieldRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &FieldRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(record.iter().map(|(key, _)| key.as_str()))?;
    wtr.write_record(record.iter().map(|(_, value)| value))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &FieldRecord) -> String {
    let mut output = String::new();

    for (key, value) in record.iter() {
        let value = if value.is_empty() { "-" } else { value };
        output.push_str(&format!("{:<15} {}\n", format!("{}:", key), value));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FieldRecord {
        FieldRecord {
            surname: "ROSSI".into(),
            given_name: "MARIO".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_has_every_column() {
        let csv = format_record(&record(), OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("surname,given_name,birth_date,birth_place,issue_date,expiry_date,license_number")
        );
        assert_eq!(lines.next(), Some("ROSSI,MARIO,,,,,"));
    }

    #[test]
    fn test_text_marks_missing_fields() {
        let text = format_record(&record(), OutputFormat::Text).unwrap();
        assert!(text.contains("surname:        ROSSI"));
        assert!(text.contains("license_number: -"));
    }
}
