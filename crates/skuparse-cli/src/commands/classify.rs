//! Classify command - resolve table labels for a single SKU.

use clap::Args;
use console::style;
use tracing::debug;

use skuparse_core::{ClassificationTable, TableAudit};

use super::{load_parser, OutputFormat};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// SKU to classify
    #[arg(required = true)]
    sku: String,

    /// Only run this table
    #[arg(short, long)]
    table: Option<String>,

    /// Show every examined candidate
    #[arg(long)]
    audit: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let parser = load_parser(config_path)?;

    let tables: Vec<&ClassificationTable> = match &args.table {
        Some(name) => vec![
            parser
                .table(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown table: {}", name))?,
        ],
        None => parser.tables().collect(),
    };

    let text = parser.classification_text(&parser.normalize(&args.sku));
    debug!("Classification text: {:?}", text);

    let mut audits: Vec<TableAudit> = tables
        .iter()
        .map(|table| TableAudit {
            table: table.name().to_string(),
            audit: table.classify_with_audit(&text),
        })
        .collect();

    if !args.audit {
        for result in &mut audits {
            result.audit.trail.clear();
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&audits)?),
        OutputFormat::Text => {
            for result in &audits {
                let label = if result.audit.label.is_empty() {
                    style("-".to_string()).dim()
                } else {
                    style(result.audit.label.clone()).green()
                };
                println!("{}: {}", result.table, label);
                if args.audit {
                    for entry in &result.audit.trail {
                        println!("  {}", entry);
                    }
                }
            }
        }
    }

    Ok(())
}
