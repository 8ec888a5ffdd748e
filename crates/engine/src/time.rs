const SECONDS_PER_MINUTE: u64 = 60;

/// Formats an offset in seconds as `m:ss`.
///
/// Minutes carry no leading zero and seconds are always two digits. Fractional
/// input is floored; negative or non-finite input renders as `0:00`.
///
/// # Example
/// ```
/// use engine::format_timestamp;
///
/// assert_eq!(format_timestamp(65.0), "1:05");
/// assert_eq!(format_timestamp(600.0), "10:00");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!(
        "{}:{:02}",
        total / SECONDS_PER_MINUTE,
        total % SECONDS_PER_MINUTE
    )
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        // `as` saturates for values beyond u64::MAX.
        seconds.floor() as u64
    } else {
        0
    }
}
