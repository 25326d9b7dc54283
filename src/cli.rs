use clap::Parser;

use crate::config::DEFAULT_CONFIG_PATH;

/// Medicover appointment sniper: sends a push notification when a slot
/// opens for the configured doctor. Run it from cron or a systemd timer.
#[derive(Debug, Parser)]
#[command(name = "medisnip", version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MEDISNIP_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// List all DoctorLocatorIDs (needed for configuration)
    #[arg(short, long)]
    pub list: bool,
}
