use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Catalyst scanner: ingests press releases and filings, scores them
/// against market context, and dispatches high-conviction alerts.
#[derive(Debug, Parser)]
#[command(name = "catalyst-bot", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, short = 'c', default_value = "./config/catalyst-bot.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the live ingest-to-alert daemon until interrupted.
    Run,
    /// Run the historical analyzer once over a lookback window and exit.
    Analyze {
        /// Overrides the configured lookback window, in days.
        #[arg(long)]
        since_days: Option<u32>,
    },
    /// Seed the dedup/journal state from a historical window of feed items.
    Bootstrap {
        /// Start of the historical window, RFC 3339.
        #[arg(long)]
        start: chrono::DateTime<chrono::Utc>,
        /// End of the historical window, RFC 3339. Defaults to now.
        #[arg(long)]
        end: Option<chrono::DateTime<chrono::Utc>>,
    },
}
