//! Pipeline configuration.
//!
//! Every magic value of the puzzle lives here so that a different dataset
//! only needs a different config. Defaults reproduce the reference run:
//! cache in `./message.txt`, images in `./images/`, no datastore.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{COLUMNS, DEFAULT_MESSAGE_URL, EXPECTED_IMAGE_HEIGHT};

/// Default location of the cached message text.
pub const DEFAULT_CACHE_PATH: &str = "./message.txt";

/// Default directory for rendered sub-images.
pub const DEFAULT_OUTPUT_DIR: &str = "./images";

/// Default directory for per-image matrix text dumps.
pub const DEFAULT_MATRIX_DIR: &str = "./matrices";

/// Default downsampling factor for terminal previews.
pub const DEFAULT_PREVIEW_SCALE: usize = 4;

/// Errors that can occur while loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Remote location of the message text.
    pub url: String,

    /// Local cache of the message text.
    pub cache_path: PathBuf,

    /// Row width used to reshape the message.
    pub columns: usize,

    /// Height the detector is expected to find; a mismatch is logged.
    pub expected_image_height: Option<usize>,

    /// Where PNGs are written (`None` disables saving).
    pub output_dir: Option<PathBuf>,

    /// Print a block-character preview of every sub-image.
    pub show: bool,

    /// Cells per preview character along each axis.
    pub preview_scale: usize,

    /// Where `matrix{N}.txt` dumps are written (`None` disables them).
    pub matrix_dump_dir: Option<PathBuf>,

    /// Render the whole matrix as a single image at this path.
    pub full_image_path: Option<PathBuf>,

    /// JSON file used as the image metadata store (`None` disables it).
    pub store_path: Option<PathBuf>,

    /// HTTP timeout in seconds (`None` keeps the client default).
    pub timeout_secs: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MESSAGE_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            columns: COLUMNS,
            expected_image_height: Some(EXPECTED_IMAGE_HEIGHT),
            output_dir: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
            show: false,
            preview_scale: DEFAULT_PREVIEW_SCALE,
            matrix_dump_dir: None,
            full_image_path: None,
            store_path: None,
            timeout_secs: None,
        }
    }
}

impl PipelineConfig {
    /// Loads a config from a TOML file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::Invalid("columns must be greater than zero".into()));
        }
        if self.preview_scale == 0 {
            return Err(ConfigError::Invalid("preview_scale must be greater than zero".into()));
        }
        Ok(())
    }
}
