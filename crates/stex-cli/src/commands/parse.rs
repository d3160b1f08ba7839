//! Parse command - extract transactions from a statement text file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use stex_core::{ParsedLine, PipelineConfig, StatementParser};

use super::OutputFormat;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Statement text file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;
    let lines = build_parser(&config).parse(&text);

    info!(transactions = lines.len(), "statement parsed");

    let output = format_lines(&lines, args.format)?;

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

pub fn build_parser(config: &PipelineConfig) -> StatementParser {
    StatementParser::new()
        .with_min_line_chars(config.statement.min_line_chars)
        .with_max_description_chars(config.statement.max_description_chars)
        .with_max_merchant_chars(config.statement.max_merchant_chars)
}

fn format_lines(lines: &[ParsedLine], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(lines)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["date", "merchant", "description", "amount", "category"])?;
            for line in lines {
                writer.write_record([
                    line.date.map(|d| d.to_string()).unwrap_or_default(),
                    line.merchant.clone(),
                    line.description.clone(),
                    line.amount.to_string(),
                    line.category.unwrap_or_default().to_string(),
                ])?;
            }
            Ok(String::from_utf8(writer.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for line in lines {
                let date = line
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "----------".to_string());
                out.push_str(&format!(
                    "{}  {:<24} {:>12}  {}\n",
                    date,
                    line.merchant,
                    line.amount,
                    line.category.unwrap_or("")
                ));
            }
            out.push_str(&format!("{} transaction(s)", lines.len()));
            Ok(out)
        }
    }
}
