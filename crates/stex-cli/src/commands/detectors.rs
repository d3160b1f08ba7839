//! Detectors command - list the PII detector registry.

use clap::Args;
use console::style;
use serde::Serialize;

use stex_core::pii::{PiiCategory, list_detectors};

use super::OutputFormat;

/// Arguments for the detectors command.
#[derive(Args)]
pub struct DetectorsArgs {
    /// Only show one category
    #[arg(long, value_enum)]
    category: Option<CategoryArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CategoryArg {
    Financial,
    Government,
    Contact,
    Address,
    Network,
}

impl From<CategoryArg> for PiiCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Financial => PiiCategory::Financial,
            CategoryArg::Government => PiiCategory::Government,
            CategoryArg::Contact => PiiCategory::Contact,
            CategoryArg::Address => PiiCategory::Address,
            CategoryArg::Network => PiiCategory::Network,
        }
    }
}

#[derive(Serialize)]
struct DetectorRow {
    name: &'static str,
    category: PiiCategory,
    priority: u16,
    description: &'static str,
}

pub fn run(args: DetectorsArgs) -> anyhow::Result<()> {
    let filter: Option<PiiCategory> = args.category.map(PiiCategory::from);

    let rows: Vec<DetectorRow> = list_detectors()
        .iter()
        .filter(|d| filter.is_none_or(|c| d.category == c))
        .map(|d| DetectorRow {
            name: d.name,
            category: d.category,
            priority: d.priority,
            description: d.description,
        })
        .collect();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["name", "category", "priority", "description"])?;
            for row in &rows {
                let priority = row.priority.to_string();
                writer.write_record([
                    row.name,
                    row.category.as_str(),
                    priority.as_str(),
                    row.description,
                ])?;
            }
            print!("{}", String::from_utf8(writer.into_inner()?)?);
        }
        OutputFormat::Text => {
            let mut current: Option<PiiCategory> = None;
            for row in &rows {
                if current != Some(row.category) {
                    current = Some(row.category);
                    println!("{}", style(row.category.as_str()).bold());
                }
                println!("  {:>4}  {:<18} {}", row.priority, row.name, row.description);
            }
            println!();
            println!("{} detector(s)", rows.len());
        }
    }

    Ok(())
}
