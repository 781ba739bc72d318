//! Display formatting for elapsed and remaining time.

/// Formats milliseconds as `SS.hh`, `MM:SS.hh` or `H:MM:SS`.
///
/// The shortest form is used while minutes are zero. Once hours are
/// present the hundredths are dropped. Hours are never padded.
pub fn format_time(ms: u64) -> String {
    let hundredths = (ms % 1000) / 10;
    let seconds = (ms / 1000) % 60;
    let minutes = (ms / 60_000) % 60;
    let hours = ms / 3_600_000;

    if minutes == 0 {
        format!("{:02}.{:02}", seconds, hundredths)
    } else if hours == 0 {
        format!("{:02}:{:02}.{:02}", minutes, seconds, hundredths)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    }
}
