//! Save command - append one roadside check to the record store.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use patente_core::{CheckRecord, Clock, CsvStore, FieldRecord, RecordStore, COLUMNS};

use super::{license_parser, load_config, read_document};

/// Arguments for the save command.
#[derive(Args)]
pub struct SaveArgs {
    /// Municipality where the check took place
    #[arg(short, long)]
    municipality: String,

    /// Vehicle description
    #[arg(long, default_value = "")]
    vehicle: String,

    /// License plate
    #[arg(short, long, default_value = "")]
    plate: String,

    /// License photo or OCR text used to prefill the identity fields
    #[arg(short, long)]
    document: Option<PathBuf>,

    /// Surname (overrides the document)
    #[arg(long)]
    surname: Option<String>,

    /// Given name (overrides the document)
    #[arg(long)]
    given_name: Option<String>,

    /// Birth place (overrides the document)
    #[arg(long)]
    birth_place: Option<String>,

    /// Birth date (overrides the document)
    #[arg(long)]
    birth_date: Option<String>,

    /// Commercial vehicle
    #[arg(long)]
    commercial: bool,

    /// COPE intervention
    #[arg(long)]
    cope: bool,

    /// Dog unit intervention
    #[arg(long)]
    dog_unit: bool,

    /// Contested findings, as free text
    #[arg(long, value_name = "TEXT")]
    findings: Option<String>,

    /// Findings were contested (no description)
    #[arg(long)]
    contested: bool,

    /// Record store file (default: from config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Print the row instead of writing it
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: SaveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !config.is_known_municipality(&args.municipality) {
        eprintln!(
            "{} Municipality '{}' is not in the configured list",
            style("!").yellow(),
            args.municipality
        );
    }

    let mut identity = match &args.document {
        Some(path) => {
            let text = read_document(path, &config)?;
            license_parser(&config).parse(&text).record
        }
        None => FieldRecord::default(),
    };
    apply_overrides(&mut identity, &args);

    let mut record = CheckRecord::new(config.clock().now(), &args.municipality, &identity)
        .with_vehicle(&args.vehicle, &args.plate)
        .with_commercial(args.commercial)
        .with_cope(args.cope)
        .with_dog_unit(args.dog_unit);

    if let Some(findings) = &args.findings {
        record = record.with_findings(findings);
    } else if args.contested {
        record = record.with_findings("");
    }

    if args.dry_run {
        for (column, value) in COLUMNS.iter().zip(record.to_row()) {
            println!("{:<14} {}", column, value);
        }
        return Ok(());
    }

    let path = args.store.unwrap_or(config.store.path);
    let mut store = CsvStore::open(&path)?;
    store.append(&record)?;

    info!("Saved check for {} {}", record.surname, record.given_name);
    println!(
        "{} Check saved to {}",
        style("✓").green(),
        store.path().display()
    );

    Ok(())
}

fn apply_overrides(identity: &mut FieldRecord, args: &SaveArgs) {
    let overrides = [
        (&mut identity.surname, &args.surname),
        (&mut identity.given_name, &args.given_name),
        (&mut identity.birth_place, &args.birth_place),
        (&mut identity.birth_date, &args.birth_date),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value.clone();
        }
    }
}
