//! Process command - parse, categorize, and normalize a statement.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use stex_core::{
    Categorization, Categorizer, NormalizedTransaction, ParsedDocument, TagClassifier,
    from_statement, to_transactions,
};
use serde::Serialize;

use super::OutputFormat;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Statement text file
    #[arg(required = true)]
    input: PathBuf,

    /// User identifier attached to the normalized rows
    #[arg(short, long, default_value = "local")]
    user: String,

    /// Treat the input as parsed-document JSON instead of statement text
    #[arg(long)]
    document: bool,

    /// Disable the model fallback even when credentials are present
    #[arg(long)]
    no_model: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// One fully processed transaction row.
#[derive(Serialize)]
struct ProcessedRow {
    #[serde(flatten)]
    transaction: NormalizedTransaction,
    categorization: Categorization,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;

    let mut categorizer =
        Categorizer::new().with_fallback_threshold(config.categorizer.fallback_threshold);

    if !args.no_model {
        match TagClassifier::from_env() {
            Ok(classifier) => {
                let mut classifier = classifier.with_model(config.categorizer.model.clone());
                if let Some(base) = &config.categorizer.api_base {
                    classifier = classifier.with_base_url(base.clone());
                }
                categorizer = categorizer.with_classifier(Arc::new(classifier));
            }
            Err(error) => {
                info!(%error, "model fallback disabled");
            }
        }
    }

    // Pair each transaction with the text the keyword rules run against:
    // the full cleaned description for statement lines, the merchant for
    // pre-parsed documents.
    let inputs: Vec<(NormalizedTransaction, String)> = if args.document {
        let doc: ParsedDocument = serde_json::from_str(&text)?;
        to_transactions(&args.user, &doc, None)
            .into_iter()
            .map(|tx| {
                let rule_text = tx.merchant.clone().unwrap_or_default();
                (tx, rule_text)
            })
            .collect()
    } else {
        let lines = super::parse::build_parser(&config).parse(&text);
        from_statement(&args.user, &lines)
            .into_iter()
            .zip(lines)
            .map(|(tx, line)| (tx, line.description))
            .collect()
    };
    info!(transactions = inputs.len(), "input normalized");

    let mut rows = Vec::with_capacity(inputs.len());
    for (transaction, rule_text) in inputs {
        let items: Vec<String> = transaction
            .items
            .iter()
            .flatten()
            .map(|item| item.name.clone())
            .collect();
        let categorization = categorizer
            .categorize(&rule_text, transaction.amount, transaction.date, &items)
            .await;
        rows.push(ProcessedRow {
            transaction,
            categorization,
        });
    }

    let output = format_rows(&rows, args.format)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_rows(rows: &[ProcessedRow], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record([
                "date",
                "merchant",
                "amount",
                "currency",
                "category",
                "confidence",
                "method",
            ])?;
            for row in rows {
                writer.write_record([
                    row.transaction
                        .date
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    row.transaction.merchant.clone().unwrap_or_default(),
                    row.transaction
                        .amount
                        .map(|a| a.to_string())
                        .unwrap_or_default(),
                    row.transaction.currency.clone().unwrap_or_default(),
                    row.categorization.category().to_string(),
                    format!("{:.2}", row.categorization.confidence()),
                    row.categorization.method().to_string(),
                ])?;
            }
            Ok(String::from_utf8(writer.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for row in rows {
                let date = row
                    .transaction
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "----------".to_string());
                out.push_str(&format!(
                    "{}  {:<24} {:>12}  {} ({:.0}%)\n",
                    date,
                    row.transaction.merchant.as_deref().unwrap_or(""),
                    row.transaction
                        .amount
                        .map(|a| a.to_string())
                        .unwrap_or_default(),
                    row.categorization.category(),
                    row.categorization.confidence() * 100.0
                ));
            }
            out.push_str(&format!("{} transaction(s)", rows.len()));
            Ok(out)
        }
    }
}
