//! Countdown text formatting

/// Render a count of seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so 7501 seconds renders as `125:01`.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
