//! ISO-8601 duration rendering.

use std::fmt::Write;
use std::time::Duration;

/// Render `duration` as `PT…` notation, truncated to milliseconds.
///
/// Hours are never folded into days, and zero renders as `PT0S`.
pub fn iso8601(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis == 0 {
        return "PT0S".to_string();
    }

    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1_000) % 60;
    let fraction = millis % 1_000;

    let mut out = String::from("PT");
    if hours > 0 {
        let _ = write!(out, "{hours}H");
    }
    if minutes > 0 {
        let _ = write!(out, "{minutes}M");
    }
    if seconds > 0 || fraction > 0 {
        let _ = write!(out, "{seconds}");
        if fraction > 0 {
            let digits = format!("{fraction:03}");
            out.push('.');
            out.push_str(digits.trim_end_matches('0'));
        }
        out.push('S');
    }
    out
}
