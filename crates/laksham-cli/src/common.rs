//! Shared helpers for CLI commands.

use laksham_core::{Config, PortalClient};

/// Load config and build a portal client from it.
pub fn portal_client() -> Result<(Config, PortalClient), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = PortalClient::from_config(&config.api)?;
    Ok((config, client))
}

/// Render a second count the way the portal shows its timer:
/// `m:ss` under an hour, `h:mm:ss` from there up.
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
