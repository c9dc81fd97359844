//! Timing and size formatting for console summaries.

use std::time::Duration;

/// Formats a duration as HH:MM:SS.d (tenths of a second).
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let tenths = d.subsec_millis() / 100;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{tenths}")
}

/// Formats a base count with decimal units (bp, kb, Mb, Gb).
#[must_use]
pub fn format_bases(bases: u64) -> String {
    const KB: u64 = 1_000;
    const MB: u64 = 1_000_000;
    const GB: u64 = 1_000_000_000;

    if bases >= GB {
        format!("{:.1} Gb", bases as f64 / GB as f64)
    } else if bases >= MB {
        format!("{:.1} Mb", bases as f64 / MB as f64)
    } else if bases >= KB {
        format!("{:.1} kb", bases as f64 / KB as f64)
    } else {
        format!("{bases} bp")
    }
}

/// Bases processed per second, or None for a zero-length interval.
#[must_use]
pub fn throughput(bases: u64, d: Duration) -> Option<String> {
    let secs = d.as_secs_f64();
    if secs <= 0.0 {
        return None;
    }
    Some(format!("{}/s", format_bases((bases as f64 / secs) as u64)))
}
