//! Extract command - resolve attribute values for a single SKU.

use clap::Args;

use super::{load_parser, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// SKU to extract attributes from
    #[arg(required = true)]
    sku: String,

    /// Only report this attribute
    #[arg(short, long)]
    attribute: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let parser = load_parser(config_path)?;

    if let Some(name) = &args.attribute {
        if parser.attribute(name).is_none() {
            anyhow::bail!("Unknown attribute: {}", name);
        }
    }

    // Stripping attributes change what later ones see, so run the whole chain
    // list and filter afterwards.
    let mut attributes = parser.parse(&args.sku).attributes;
    if let Some(name) = &args.attribute {
        attributes.retain(|a| &a.name == name);
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&attributes)?),
        OutputFormat::Text => {
            for attribute in &attributes {
                println!("{}: {}", attribute.name, attribute.value);
            }
        }
    }

    Ok(())
}
