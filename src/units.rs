// Human-readable units for the wire format (viewers render these verbatim).

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with a base-1024 unit suffix, at most two decimals,
/// trailing zeros trimmed: 0 -> "0 B", 1024 -> "1 KB", 1536 -> "1.5 KB".
pub fn format_bytes(bytes: f64) -> String {
    if bytes <= 0.0 {
        return "0 B".into();
    }
    let exp = if bytes < 1024.0 {
        0
    } else {
        ((bytes.log2() / 10.0).floor() as usize).min(BYTE_UNITS.len() - 1)
    };
    let value = bytes / 1024f64.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;
    let mut s = format!("{:.2}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    format!("{} {}", s, BYTE_UNITS[exp])
}

/// Format a transfer rate as bytes per second.
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec))
}

/// Format an uptime as "Xd Xh Xm". Days and hours are omitted when zero;
/// minutes are always shown.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{}d ", days));
    }
    if hours > 0 {
        out.push_str(&format!("{}h ", hours));
    }
    out.push_str(&format!("{}m", minutes));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_zero() {
        assert_eq!(format_bytes(0.0), "0 B");
    }

    #[test]
    fn format_bytes_below_one_unit() {
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1023.0), "1023 B");
    }

    #[test]
    fn format_bytes_trims_trailing_zeros() {
        assert_eq!(format_bytes(1024.0), "1 KB");
        assert_eq!(format_bytes(1536.0), "1.5 KB");
        assert_eq!(format_bytes(1024.0 * 1024.0), "1 MB");
    }

    #[test]
    fn format_bytes_keeps_two_decimals() {
        // 1.2345 MB rounds to 1.23 MB
        assert_eq!(format_bytes(1.2345 * 1024.0 * 1024.0), "1.23 MB");
    }

    #[test]
    fn format_bytes_caps_at_tb() {
        let huge = 1024f64.powi(5) * 3.0; // 3 PB still reported in TB
        assert_eq!(format_bytes(huge), "3072 TB");
    }

    #[test]
    fn format_bytes_fractional_rate_input() {
        assert_eq!(format_bytes(0.4), "0.4 B");
    }

    #[test]
    fn format_rate_suffixes_per_second() {
        assert_eq!(format_rate(2048.0), "2 KB/s");
        assert_eq!(format_rate(0.0), "0 B/s");
    }

    #[test]
    fn format_uptime_all_units() {
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
    }

    #[test]
    fn format_uptime_minutes_always_shown() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(0), "0m");
    }

    #[test]
    fn format_uptime_omits_zero_days_and_hours() {
        assert_eq!(format_uptime(3_660), "1h 1m");
        assert_eq!(format_uptime(120), "2m");
        // zero hours between days and minutes is dropped as well
        assert_eq!(format_uptime(86_460), "1d 1m");
    }
}
