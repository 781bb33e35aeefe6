//! CLI application for driving-license scanning at roadside checks.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, report, save};

/// Driving-license scanner - extract identity fields and log roadside checks
#[derive(Parser)]
#[command(name = "patente")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract license fields from a photo or an OCR text dump
    Extract(extract::ExtractArgs),

    /// Extract license fields from many files
    Batch(batch::BatchArgs),

    /// Append a check record to the store
    Save(save::SaveArgs),

    /// Show the end-of-shift report
    Report(report::ReportArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Save(args) => save::run(args, cli.config.as_deref()).await,
        Commands::Report(args) => report::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
