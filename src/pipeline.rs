//! End-to-end run: fetch, reshape, segment, render.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::fetch::{
    fetch_message, FetchError, MessageOrigin, MessageSource, MessageTransport, RawMessage,
};
use crate::header::{row_to_bits, SubImageHeaders};
use crate::info::ImageInfo;
use crate::matrix::{build_matrix, Matrix, MatrixError};
use crate::render::{save_full_image, split_sub_images, RenderError, SplitResult};
use crate::segment::detect_image_height;
use crate::store::ImageStore;

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Retrieval failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Bad message shape: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Everything derived from a message, before any output is written.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub matrix: Matrix,
    pub image_height: usize,
    pub split: SplitResult,
    pub infos: Vec<ImageInfo>,
}

impl Analysis {
    pub fn num_images(&self) -> usize {
        self.split.images.len()
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub origin: MessageOrigin,
    pub rows: usize,
    pub columns: usize,
    pub image_height: usize,
    pub num_images: usize,
    pub dropped_rows: usize,
    pub images: Vec<ImageInfo>,
    pub written: Vec<PathBuf>,
    pub stored: usize,
    #[serde(skip)]
    pub previews: Vec<String>,
}

/// Reshapes, segments and inspects `raw` without writing anything.
pub fn analyze(raw: &RawMessage, config: &PipelineConfig) -> Result<Analysis, PipelineError> {
    let matrix = build_matrix(raw, config.columns)?;
    info!("Matrix shape:     {}", matrix.shape());

    let image_height = detect_image_height(&matrix);
    info!("Image height:     {}", image_height);
    if let Some(expected) = config.expected_image_height {
        if image_height != expected {
            warn!(
                "Detected image height {} differs from the expected {}",
                image_height, expected
            );
        }
    }

    let split = split_sub_images(&matrix, image_height)?;
    info!("Number of images: {}", split.images.len());
    if split.dropped_rows > 0 {
        info!("Dropping {} trailing rows", split.dropped_rows);
    }

    let mut infos = Vec::with_capacity(split.images.len());
    for image in &split.images {
        let headers = SubImageHeaders::from_sub_image(image);
        log_headers(image.matrix(), image.index(), &headers);

        let mut record = ImageInfo::new(image.index(), image.width(), image.height());
        record.apply_headers(&headers);
        infos.push(record);
    }

    Ok(Analysis {
        matrix,
        image_height,
        split,
        infos,
    })
}

/// Runs the whole pipeline.
///
/// `store`, when given, receives one upsert per image. Store failures are
/// logged and never abort the run.
pub fn run_pipeline(
    config: &PipelineConfig,
    transport: &dyn MessageTransport,
    store: Option<&mut dyn ImageStore>,
) -> Result<PipelineReport, PipelineError> {
    let source = MessageSource::new(&config.cache_path, &config.url);
    let (raw, origin) = fetch_message(&source, transport)?;
    let analysis = analyze(&raw, config)?;

    let stored = match store {
        Some(store) => persist_infos(store, &analysis.infos),
        None => 0,
    };

    if let Some(dir) = &config.matrix_dump_dir {
        for image in &analysis.split.images {
            let path = dir.join(image.matrix_file_name());
            image.matrix().write_text(&path)?;
            debug!("Wrote {}", path.display());
        }
    }

    let mut written = Vec::new();
    if let Some(path) = &config.full_image_path {
        save_full_image(&analysis.matrix, path)?;
        info!("Saved full message image to {}", path.display());
        written.push(path.clone());
    }

    if let Some(dir) = &config.output_dir {
        for image in &analysis.split.images {
            let path = image.save_png(dir)?;
            info!("Saved {}", path.display());
            written.push(path);
        }
    }

    let previews = if config.show {
        analysis
            .split
            .images
            .iter()
            .map(|image| image.preview(config.preview_scale))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    Ok(PipelineReport {
        origin,
        rows: analysis.matrix.row_count(),
        columns: analysis.matrix.columns(),
        image_height: analysis.image_height,
        num_images: analysis.num_images(),
        dropped_rows: analysis.split.dropped_rows,
        images: analysis.infos,
        written,
        stored,
        previews,
    })
}

fn persist_infos(store: &mut dyn ImageStore, infos: &[ImageInfo]) -> usize {
    let mut stored = 0;
    for record in infos {
        match store.upsert(record) {
            Ok(()) => stored += 1,
            Err(e) => warn!("Could not store {}: {}", record.name, e),
        }
    }
    stored
}

fn log_headers(matrix: &Matrix, index: usize, headers: &SubImageHeaders) {
    for row in 0..2 {
        if let Some(bits) = matrix.row(row).map(row_to_bits) {
            debug!("Image{} row {}: {}", index, row + 1, bits);
        }
    }

    let found = [(1, &headers.first_row), (2, &headers.second_row)];
    for (row, header) in found {
        match header {
            Some(h) => info!("Image{} row {} binary; index: {}; {}", index, row, h.start, h.bits),
            None => debug!("Image{} row {} has no header", index, row),
        }
    }
}
