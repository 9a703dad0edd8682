//! Batch command - parse a file of SKUs into CSV.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use skuparse_core::{ParsedSku, SkuParser};

use super::load_parser;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input file with one SKU per line
    #[arg(required = true)]
    input: PathBuf,

    /// Output CSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read the SKU from this 1-based tab-separated column
    #[arg(long)]
    column: Option<usize>,

    /// Skip the first input line
    #[arg(long)]
    skip_header: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Add the decisive identifiers of every table
    #[arg(long)]
    audit: bool,
}

/// Parsed SKU tagged with its input row.
struct ParsedRow {
    index: usize,
    sku: String,
    parsed: ParsedSku,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    if args.column == Some(0) {
        anyhow::bail!("Columns are numbered from 1");
    }

    let parser = Arc::new(load_parser(config_path)?);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let content = fs::read_to_string(&args.input)?;
    let skus: Vec<String> = content
        .lines()
        .skip(usize::from(args.skip_header))
        .map(|line| select_column(line, args.column))
        .collect();

    debug!("Read {} SKUs from {}", skus.len(), args.input.display());

    let pb = ProgressBar::new(skus.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} SKUs")?
            .progress_chars("=>-"),
    );

    let rows = parse_rows(parser.clone(), skus, args.jobs, args.audit, &pb).await?;
    pb.finish_and_clear();

    let writer: Box<dyn io::Write> = match &args.output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(io::stdout()),
    };
    write_csv(writer, &parser, &rows, args.audit)?;

    let classified = rows
        .iter()
        .filter(|r| r.parsed.labels.iter().any(|l| !l.value.is_empty()))
        .count();

    // Keep stdout clean when it carries the CSV.
    let summary = format!(
        "{} Processed {} SKUs in {:?}\n   {} classified, {} unclassified",
        style("✓").green(),
        rows.len(),
        start.elapsed(),
        style(classified).green(),
        style(rows.len() - classified).yellow()
    );
    match &args.output {
        Some(path) => {
            println!("{}", summary);
            println!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => eprintln!("{}", summary),
    }

    Ok(())
}

fn select_column(line: &str, column: Option<usize>) -> String {
    match column {
        Some(n) => line.split('\t').nth(n - 1).unwrap_or("").to_string(),
        None => line.to_string(),
    }
}

/// Parse `skus` on blocking workers, one contiguous chunk per worker, and
/// return the rows in input order.
async fn parse_rows(
    parser: Arc<SkuParser>,
    skus: Vec<String>,
    jobs: usize,
    audit: bool,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<ParsedRow>> {
    if skus.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_size = skus.len().div_ceil(jobs.max(1));
    let mut handles = Vec::new();

    for (chunk_index, chunk) in skus.chunks(chunk_size).enumerate() {
        let parser = Arc::clone(&parser);
        let chunk = chunk.to_vec();
        let offset = chunk_index * chunk_size;
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            chunk
                .into_iter()
                .enumerate()
                .map(|(i, sku)| {
                    let parsed = if audit {
                        parser.parse_with_audit(&sku)
                    } else {
                        parser.parse(&sku)
                    };
                    pb.inc(1);
                    ParsedRow {
                        index: offset + i,
                        sku,
                        parsed,
                    }
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut rows = Vec::with_capacity(skus.len());
    for handle in handles {
        rows.extend(handle.await?);
    }
    rows.sort_by_key(|r| r.index);

    Ok(rows)
}

fn write_csv(
    writer: Box<dyn io::Write>,
    parser: &SkuParser,
    rows: &[ParsedRow],
    audit: bool,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["sku".to_string()];
    header.extend(parser.tables().map(|t| t.name().to_string()));
    header.extend(parser.attributes().map(|a| a.name().to_string()));
    if audit {
        for table in parser.tables() {
            header.push(format!("{}_main", table.name()));
            header.push(format!("{}_limiting_main", table.name()));
            header.push(format!("{}_limiting_additional", table.name()));
        }
    }
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.sku.clone()];
        record.extend(row.parsed.labels.iter().map(|l| l.value.clone()));
        record.extend(row.parsed.attributes.iter().map(|a| a.value.clone()));
        if audit {
            for result in &row.parsed.audits {
                let decisive = result.audit.decisive.clone().unwrap_or_default();
                record.push(decisive.main);
                record.push(decisive.limiting_main.unwrap_or_default());
                record.push(decisive.limiting_additional.unwrap_or_default());
            }
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_column() {
        assert_eq!(select_column("a\tb\tc", None), "a\tb\tc");
        assert_eq!(select_column("a\tb\tc", Some(2)), "b");
        assert_eq!(select_column("a", Some(3)), "");
    }
}
