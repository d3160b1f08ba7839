//! CLI for statement extraction and PII masking.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, detectors, mask, parse, process};

/// Statement extraction - mask PII and pull transactions out of raw text
#[derive(Parser)]
#[command(name = "stex")]
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
    /// Mask PII in text
    Mask(mask::MaskArgs),

    /// Parse a bank statement into transactions
    Parse(parse::ParseArgs),

    /// Parse, categorize, and normalize a statement end to end
    Process(process::ProcessArgs),

    /// List the PII detector registry
    Detectors(detectors::DetectorsArgs),

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
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Mask(args) => mask::run(args, cli.config.as_deref()),
        Commands::Parse(args) => parse::run(args, cli.config.as_deref()),
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Detectors(args) => detectors::run(args),
        Commands::Config(args) => config::run(args),
    }
}
