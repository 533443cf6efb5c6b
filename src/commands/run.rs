//! Full pipeline command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use seti_decoder::config::DEFAULT_MATRIX_DIR;
use seti_decoder::{run_pipeline, ImageStore, JsonFileStore, PipelineReport};

use super::{http_transport, CommandExecutor, SourceArgs};

/// Run the full pipeline: fetch, reshape, detect, render.
///
/// Writes img0.png, img1.png, ... into the output directory. Re-running with
/// the same cache produces byte-identical images.
#[derive(Args, Debug)]
pub struct RunCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory for the rendered PNGs
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Do not write per-image PNGs
    #[arg(long)]
    pub no_save: bool,

    /// Print a block-character preview of every image
    #[arg(long)]
    pub show: bool,

    /// Cells per preview character (default: 4)
    #[arg(long)]
    pub scale: Option<usize>,

    /// Dump every image's digit rows as text (default dir: ./matrices)
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_MATRIX_DIR)]
    pub dump_matrices: Option<PathBuf>,

    /// Also render the whole message as one image at this path
    #[arg(long)]
    pub full_image: Option<PathBuf>,

    /// JSON file to upsert per-image metadata into
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CommandExecutor for RunCommand {
    fn execute(&self) -> Result<()> {
        let mut config = self.source.load_config()?;
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if self.no_save {
            config.output_dir = None;
        }
        if self.show {
            config.show = true;
        }
        if let Some(scale) = self.scale {
            config.preview_scale = scale;
        }
        if let Some(dir) = &self.dump_matrices {
            config.matrix_dump_dir = Some(dir.clone());
        }
        if let Some(path) = &self.full_image {
            config.full_image_path = Some(path.clone());
        }
        if let Some(path) = &self.store {
            config.store_path = Some(path.clone());
        }
        config.validate().context("Invalid configuration")?;

        // The store is optional: if it cannot be opened the run goes on without it
        let mut store = config.store_path.as_ref().and_then(|path| {
            JsonFileStore::open(path)
                .map_err(|e| warn!("Image store {} unavailable: {}", path.display(), e))
                .ok()
        });

        let transport = http_transport(&config)?;
        let report = run_pipeline(
            &config,
            &transport,
            store.as_mut().map(|s| s as &mut dyn ImageStore),
        )
        .context("Pipeline failed")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        for (image, preview) in report.images.iter().zip(&report.previews) {
            println!("{} ({}x{})", image.name, image.width, image.height);
            println!("{}", preview);
        }
        print_summary(&report);

        Ok(())
    }
}

fn print_summary(report: &PipelineReport) {
    println!("Message: {}x{} (from {})", report.rows, report.columns, report.origin);
    println!("  Image height: {}", report.image_height);
    println!("  Images: {}", report.num_images);
    if report.dropped_rows > 0 {
        println!("  Dropped rows: {}", report.dropped_rows);
    }
    if report.stored > 0 {
        println!("  Stored records: {}", report.stored);
    }
    for path in &report.written {
        println!("  Wrote {}", path.display());
    }
}
