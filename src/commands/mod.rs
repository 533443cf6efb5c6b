//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! Options shared by every command (config file, URL, cache path, columns)
//! live in [`SourceArgs`].

mod fetch;
mod inspect;
mod run;

pub use fetch::FetchCommand;
pub use inspect::InspectCommand;
pub use run::RunCommand;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use seti_decoder::{HttpTransport, MessageSource, PipelineConfig};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Where the message comes from and how it is shaped.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// TOML config file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// URL of the message text
    #[arg(long)]
    pub url: Option<String>,

    /// Local cache of the message text
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Row width used to reshape the message
    #[arg(long)]
    pub columns: Option<usize>,
}

impl SourceArgs {
    /// Builds the effective config: defaults, then the config file, then flags.
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(cache) = &self.cache {
            config.cache_path = cache.clone();
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Cache path and URL of `config`.
pub fn message_source(config: &PipelineConfig) -> MessageSource {
    MessageSource::new(&config.cache_path, &config.url)
}

/// HTTP transport honouring the configured timeout.
pub fn http_transport(config: &PipelineConfig) -> Result<HttpTransport> {
    HttpTransport::new(config.timeout_secs.map(Duration::from_secs))
        .context("Failed to set up HTTP client")
}
