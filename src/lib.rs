//! # seti-decoder - Render the 2016 SETI challenge message
//!
//! In 2016 René Heller published a text file of `0`/`1` characters and asked
//! people to decode it as if it had arrived from a star 50 light years away.
//! This crate turns that file into pictures.
//!
//! ## Overview
//!
//! The pipeline is strictly linear:
//! - **Fetch**: read `message.txt` from the local cache, or download it once
//! - **Reshape**: parse every character as a digit and lay it out in rows of
//!   [`COLUMNS`] cells
//! - **Segment**: the rows right after the first one carry a single set bit;
//!   the length of that run gives the height of each embedded image
//! - **Render**: slice the grid into sub-images, scale `{0,1}` to `{0,255}`
//!   and write one grayscale PNG per image
//!
//! Along the way the first two rows of every sub-image are inspected for
//! binary "headers", and an optional [`store::ImageStore`] can record one
//! [`ImageInfo`] per image.
//!
//! ## Example Usage
//!
//! ```rust
//! use seti_decoder::{build_matrix, detect_image_height, split_sub_images, RawMessage};
//!
//! // Two 3-column sub-images of height 2: a marker row followed by a single-bit row
//! let raw = RawMessage::new("111001111000");
//! let matrix = build_matrix(&raw, 3).unwrap();
//!
//! let height = detect_image_height(&matrix);
//! assert_eq!(height, 2);
//!
//! let split = split_sub_images(&matrix, height).unwrap();
//! assert_eq!(split.images.len(), 2);
//! assert_eq!(split.dropped_rows, 0);
//! ```
//!
//! ## Modules
//!
//! - [`config`]: pipeline configuration and defaults
//! - [`fetch`]: cache-or-download retrieval of the raw message
//! - [`matrix`]: fixed-width reshaping of the raw message
//! - [`segment`]: sub-image height detection
//! - [`header`]: binary header extraction from leading rows
//! - [`info`]: per-image metadata records
//! - [`render`]: sub-image slicing, PNG output and terminal previews
//! - [`store`]: optional keyed persistence of image metadata
//! - [`pipeline`]: the end-to-end run

/// Row width of the message.
///
/// The message opens with a run of 359 ones, and 359 is prime, which is
/// what makes it the natural line length. Any other dataset would need a
/// different value.
pub const COLUMNS: usize = 359;

/// Sub-image height the segment detector finds for the published message.
///
/// Only used to flag a surprising detection result; the pipeline always uses
/// the detected value.
pub const EXPECTED_IMAGE_HEIGHT: usize = 757;

/// Location the challenge text was published at.
pub const DEFAULT_MESSAGE_URL: &str =
    "http://www2.mps.mpg.de/homes/heller/downloads/files/SETI_message.txt";

pub mod config;
pub mod fetch;
pub mod header;
pub mod info;
pub mod matrix;
pub mod pipeline;
pub mod render;
pub mod segment;
pub mod store;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, PipelineConfig};
pub use fetch::{
    fetch_message, FetchError, HttpTransport, MessageOrigin, MessageSource, MessageTransport,
    RawMessage,
};
pub use header::{extract_header, row_to_bits, BinaryHeader, SubImageHeaders};
pub use info::ImageInfo;
pub use matrix::{build_matrix, Matrix, MatrixError};
pub use pipeline::{analyze, run_pipeline, Analysis, PipelineError, PipelineReport};
pub use render::{split_sub_images, RenderError, SplitResult, SubImage};
pub use segment::{detect_image_height, image_count};
pub use store::{ImageStore, JsonFileStore, MemoryStore, StoreError};
