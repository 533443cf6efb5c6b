//! seti-decoder - Render the 2016 SETI challenge message
//!
//! Downloads (once) the published text of zeros and ones, reshapes it into
//! 359-column rows and writes every embedded picture as a grayscale PNG.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CommandExecutor, FetchCommand, InspectCommand, RunCommand};

/// seti-decoder - Render the 2016 SETI challenge message
///
/// The message is cached in ./message.txt on first use; later runs never
/// touch the network.
#[derive(Parser)]
#[command(name = "seti-decoder")]
#[command(version)]
#[command(about = "Fetch, reshape and render the 2016 SETI challenge message")]
#[command(long_about = None)]
struct Cli {
    /// More log output (-v for debug, -vv for trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write one PNG per embedded image
    Run(RunCommand),

    /// Download the message into the local cache
    Fetch(FetchCommand),

    /// Report image height, image count and headers without writing images
    Inspect(InspectCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(cmd) => cmd.execute(),
        Commands::Fetch(cmd) => cmd.execute(),
        Commands::Inspect(cmd) => cmd.execute(),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("seti_decoder={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
