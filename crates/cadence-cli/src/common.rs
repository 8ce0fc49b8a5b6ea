//! Shared formatting helpers.

use std::time::Duration;

/// Render a duration as `MMmSSs`, e.g. `25m00s`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}m{:02}s", secs / 60, secs % 60)
}
