//! Mask command - redact PII from text.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use stex_core::{MaskStrategy, contains_pii, count_pii, mask, mask_specific};

use super::OutputFormat;

/// Arguments for the mask command.
#[derive(Args)]
pub struct MaskArgs {
    /// Input text file
    input: Option<PathBuf>,

    /// Inline text to mask instead of a file
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// Masking strategy (default: from config)
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Comma-separated detector names to run (default: all)
    #[arg(long)]
    only: Option<String>,

    /// Print per-detector match counts instead of masking
    #[arg(long)]
    counts: bool,

    /// Only report whether critical PII is present
    #[arg(long)]
    check: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum StrategyArg {
    /// Keep the last four characters of card/account numbers
    Last4,
    /// Replace every match with a redaction tag
    Full,
    /// Like full, but emails keep their domain
    Domain,
}

impl From<StrategyArg> for MaskStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Last4 => MaskStrategy::Last4,
            StrategyArg::Full => MaskStrategy::Full,
            StrategyArg::Domain => MaskStrategy::Domain,
        }
    }
}

pub fn run(args: MaskArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let text = match (&args.input, &args.text) {
        (Some(path), _) => fs::read_to_string(path)?,
        (None, Some(text)) => text.clone(),
        (None, None) => anyhow::bail!("Provide an input file or --text"),
    };

    if args.check {
        if contains_pii(&text) {
            println!("{} PII detected", style("!").yellow());
        } else {
            println!("{} no PII detected", style("✓").green());
        }
        return Ok(());
    }

    if args.counts {
        // BTreeMap for stable output ordering.
        let counts: BTreeMap<&str, usize> = count_pii(&text).into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    let strategy = args
        .strategy
        .map(MaskStrategy::from)
        .unwrap_or(config.masking.strategy);

    let result = match &args.only {
        Some(names) => {
            let names: Vec<&str> = names.split(',').map(str::trim).collect();
            mask_specific(&text, &names, strategy)
        }
        None => mask(&text, strategy),
    };

    info!(findings = result.found.len(), "masking complete");

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => result.masked.clone(),
        OutputFormat::Csv => anyhow::bail!("CSV output is not supported for mask"),
    };

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

    Ok(())
}
