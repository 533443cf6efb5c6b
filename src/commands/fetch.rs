//! Cache-filling command.

use anyhow::{Context, Result};
use clap::Args;

use seti_decoder::fetch::refresh;
use seti_decoder::{fetch_message, MessageOrigin};

use super::{http_transport, message_source, CommandExecutor, SourceArgs};

/// Download the message into the local cache.
///
/// Does nothing if the cache already exists, unless --force is given.
#[derive(Args, Debug)]
pub struct FetchCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Download again and overwrite the cache
    #[arg(long)]
    pub force: bool,
}

impl CommandExecutor for FetchCommand {
    fn execute(&self) -> Result<()> {
        let config = self.source.load_config()?;
        let source = message_source(&config);
        let transport = http_transport(&config)?;

        let (message, origin) = if self.force {
            let message = refresh(&source, &transport).context("Failed to download message")?;
            (message, MessageOrigin::Remote)
        } else {
            fetch_message(&source, &transport).context("Failed to fetch message")?
        };

        println!(
            "Message: {} characters (from {})",
            message.char_count(),
            origin
        );
        println!("  Cache: {}", source.cache_path.display());

        let columns = config.columns;
        let remainder = message.char_count() % columns;
        if remainder != 0 {
            println!(
                "  Warning: length is not a multiple of {} ({} left over)",
                columns, remainder
            );
        }

        Ok(())
    }
}
