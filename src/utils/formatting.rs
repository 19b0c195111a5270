/// Format a millisecond position as `MM:SS`.
///
/// Positions of one hour or more switch to `H:MM:SS` so the minutes field
/// never exceeds 59.
pub fn format_time(millis: u64) -> String {
    let total_secs = millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// `elapsed / total` label shown next to the seek bar
pub fn format_progress(elapsed_ms: u64, total_ms: u64) -> String {
    format!("{} / {}", format_time(elapsed_ms), format_time(total_ms))
}
