//! Read-only inspection command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use seti_decoder::{analyze, fetch_message, ImageInfo};

use super::{http_transport, message_source, CommandExecutor, SourceArgs};

/// Report image height, image count and per-image headers.
///
/// Nothing but the cache is written.
#[derive(Args, Debug)]
pub struct InspectCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct InspectReport {
    rows: usize,
    columns: usize,
    image_height: usize,
    num_images: usize,
    dropped_rows: usize,
    images: Vec<ImageInfo>,
}

impl CommandExecutor for InspectCommand {
    fn execute(&self) -> Result<()> {
        let config = self.source.load_config()?;
        let transport = http_transport(&config)?;
        let (message, _) =
            fetch_message(&message_source(&config), &transport).context("Failed to fetch message")?;

        let analysis = analyze(&message, &config).context("Failed to analyze message")?;
        let report = InspectReport {
            rows: analysis.matrix.row_count(),
            columns: analysis.matrix.columns(),
            image_height: analysis.image_height,
            num_images: analysis.num_images(),
            dropped_rows: analysis.split.dropped_rows,
            images: analysis.infos,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Matrix: {}x{}", report.rows, report.columns);
        println!("  Image height: {}", report.image_height);
        println!("  Images: {}", report.num_images);
        println!("  Dropped rows: {}", report.dropped_rows);
        println!();
        println!("{:<8} {:>9}  {:<24} {}", "IMAGE", "SIZE", "ROW 1", "ROW 2");
        for info in &report.images {
            println!(
                "{:<8} {:>9}  {:<24} {}",
                info.name,
                format!("{}x{}", info.width, info.height),
                describe(info.row1_binary.as_deref(), info.row1_binary_idx),
                describe(info.row2_binary.as_deref(), info.row2_binary_idx),
            );
        }

        Ok(())
    }
}

fn describe(bits: Option<&str>, start: Option<usize>) -> String {
    match (bits, start) {
        (Some(bits), Some(start)) => format!("{} @{}", bits, start),
        _ => "-".to_string(),
    }
}
