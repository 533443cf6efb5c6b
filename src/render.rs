//! Sub-image slicing and rendering.
//!
//! The matrix is cut into consecutive blocks of the detected height; rows
//! that do not fill a whole block are dropped. For display every cell is
//! scaled from `{0,1}` to `{0,255}` and written as an 8-bit grayscale PNG.
//! The original digit matrix is never written as an image.

use image::{GrayImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::matrix::{Matrix, MatrixError};
use crate::segment::image_count;

/// Character used for a lit cell in terminal previews.
const PREVIEW_ON: char = '█';

/// Character used for a dark cell in terminal previews.
const PREVIEW_OFF: char = ' ';

/// Errors that can occur while slicing or rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image height must be greater than zero")]
    ZeroHeight,

    #[error("Preview scale must be greater than zero")]
    ZeroScale,

    #[error("Image of {width}x{height} is too large to encode")]
    TooLarge { width: usize, height: usize },

    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One decoded image: a block of consecutive matrix rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubImage {
    index: usize,
    matrix: Matrix,
}

impl SubImage {
    /// Wraps a block of rows as sub-image number `index`.
    pub fn new(index: usize, matrix: Matrix) -> Self {
        Self { index, matrix }
    }

    /// Position of this image in the message, from 0.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> usize {
        self.matrix.columns()
    }

    pub fn height(&self) -> usize {
        self.matrix.row_count()
    }

    /// The unscaled digit rows.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// File name used when saving, e.g. `img0.png`.
    pub fn file_name(&self) -> String {
        format!("img{}.png", self.index)
    }

    /// Name used for matrix text dumps, e.g. `matrix0.txt`.
    pub fn matrix_file_name(&self) -> String {
        format!("matrix{}.txt", self.index)
    }

    /// Scaled grayscale rendering.
    pub fn to_gray_image(&self) -> Result<GrayImage, RenderError> {
        to_gray_image(&self.matrix)
    }

    /// Saves the scaled rendering as `dir/img{index}.png` and returns the path.
    pub fn save_png<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, RenderError> {
        let path = dir.as_ref().join(self.file_name());
        save_png(&self.matrix, &path)?;
        Ok(path)
    }

    /// Block-character preview, `scale` cells per character along each axis.
    pub fn preview(&self, scale: usize) -> Result<String, RenderError> {
        render_preview(&self.matrix, scale)
    }
}

/// Sub-images cut from a matrix, plus the rows left over.
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub images: Vec<SubImage>,
    pub dropped_rows: usize,
}

/// Cuts `matrix` into `floor(rows / image_height)` consecutive blocks.
///
/// Trailing rows that do not fill a whole block are dropped and counted in
/// [`SplitResult::dropped_rows`].
pub fn split_sub_images(matrix: &Matrix, image_height: usize) -> Result<SplitResult, RenderError> {
    if image_height == 0 {
        return Err(RenderError::ZeroHeight);
    }

    let (count, dropped_rows) = image_count(matrix.row_count(), image_height);
    let images = (0..count)
        .map(|i| {
            let start = i * image_height;
            matrix
                .slice_rows(start, start + image_height)
                .map(|block| SubImage::new(i, block))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SplitResult {
        images,
        dropped_rows,
    })
}

/// Scales a digit matrix to an 8-bit grayscale image (`v * 255`, saturating).
pub fn to_gray_image(matrix: &Matrix) -> Result<GrayImage, RenderError> {
    let too_large = || RenderError::TooLarge {
        width: matrix.columns(),
        height: matrix.row_count(),
    };
    let width = u32::try_from(matrix.columns()).map_err(|_| too_large())?;
    let height = u32::try_from(matrix.row_count()).map_err(|_| too_large())?;

    let pixels = matrix.cells().iter().map(|&v| v.saturating_mul(255)).collect();
    GrayImage::from_raw(width, height, pixels).ok_or_else(too_large)
}

/// Writes the scaled rendering of `matrix` as a PNG at `path`.
pub fn save_png<P: AsRef<Path>>(matrix: &Matrix, path: P) -> Result<(), RenderError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    to_gray_image(matrix)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| RenderError::ImageSaveError(e.to_string()))
}

/// Renders the whole matrix as one image, without splitting.
pub fn save_full_image<P: AsRef<Path>>(matrix: &Matrix, path: P) -> Result<(), RenderError> {
    save_png(matrix, path)
}

/// Downsamples `matrix` into lines of block characters.
///
/// Each character covers a `scale`x`scale` block of cells and is lit when
/// any cell in the block is non-zero. Trailing blanks are trimmed.
pub fn render_preview(matrix: &Matrix, scale: usize) -> Result<String, RenderError> {
    if scale == 0 {
        return Err(RenderError::ZeroScale);
    }

    let columns = matrix.columns();
    let rows: Vec<&[u8]> = matrix.rows().collect();
    let mut out = String::new();

    for band in rows.chunks(scale) {
        let mut line = String::with_capacity(columns.div_ceil(scale));
        for x in (0..columns).step_by(scale) {
            let x_end = (x + scale).min(columns);
            let lit = band.iter().any(|row| row[x..x_end].iter().any(|&v| v != 0));
            line.push(if lit { PREVIEW_ON } else { PREVIEW_OFF });
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    Ok(out)
}
