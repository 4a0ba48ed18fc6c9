use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to a display width, ending with an ellipsis when anything was
/// cut. Width-aware so wide glyphs in process names don't overflow cells.
pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            out.push('\u{2026}');
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec.max(0.0) as u64))
}

pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours:02}h {mins:02}m")
    } else if hours > 0 {
        format!("{hours:02}h {mins:02}m")
    } else {
        format!("{mins:02}m")
    }
}

/// Elapsed runtime for the process table's TIME column.
pub fn format_runtime(secs: u64) -> String {
    let hours = secs / 3_600;
    let mins = (secs % 3_600) / 60;
    let rem = secs % 60;

    if hours > 0 {
        format!("{hours}:{mins:02}:{rem:02}")
    } else {
        format!("{mins}:{rem:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_unicode("cargo", 10), "cargo");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        let out = truncate_unicode("a very long command line", 10);
        assert!(out.ends_with('\u{2026}'));
        assert!(out.width() <= 10);
    }

    #[test]
    fn bytes_pick_sensible_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn rate_is_bytes_per_second() {
        assert_eq!(format_rate(2048.0), "2 KB/s");
        assert_eq!(format_rate(-5.0), "0 B/s");
    }

    #[test]
    fn uptime_omits_leading_zero_units() {
        assert_eq!(format_uptime(59), "00m");
        assert_eq!(format_uptime(3 * 3600 + 5 * 60), "03h 05m");
        assert_eq!(format_uptime(2 * 86_400 + 3600), "2d 01h 00m");
    }

    #[test]
    fn runtime_formats_like_a_clock() {
        assert_eq!(format_runtime(59), "0:59");
        assert_eq!(format_runtime(61), "1:01");
        assert_eq!(format_runtime(3 * 3600 + 62), "3:01:02");
    }
}
