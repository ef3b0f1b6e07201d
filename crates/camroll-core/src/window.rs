//! Time window parsing.
//!
//! Windows are entered as human text like `"1 min"`, `"30 sec"`, `"1.5 min"`,
//! or a bare number of seconds. Unit matching is prefix-based and lenient:
//! an unrecognized unit falls back to seconds rather than erroring.

use chrono::Duration;
use thiserror::Error;

/// Errors from window text parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowParseError {
    /// The input contained no tokens at all.
    #[error("empty input")]
    Empty,

    /// The magnitude token was not a number.
    #[error("invalid numeric value: {value}")]
    InvalidNumber { value: String },
}

/// Recognized window units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowUnit {
    Seconds,
    Minutes,
    Hours,
}

impl WindowUnit {
    /// Matches a lowercased unit token by prefix: `sec`, `secs`, `second`,
    /// `seconds` all mean seconds, likewise `min…` and `hour…`/`hr…`.
    /// Any other token, including the empty one, means seconds.
    fn from_prefix(token: &str) -> Self {
        if token.starts_with("sec") {
            Self::Seconds
        } else if token.starts_with("min") {
            Self::Minutes
        } else if token.starts_with("hour") || token.starts_with("hr") {
            Self::Hours
        } else {
            Self::Seconds
        }
    }

    const fn seconds_per_unit(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
        }
    }
}

/// Parses window text like `"1 min"` or `"90 sec"` into a [`Duration`].
///
/// The input is trimmed and lowercased, then read as a magnitude followed by
/// an optional unit token. Fractional magnitudes are fine (`"1.5 min"`), and
/// the result keeps microsecond precision. Negative magnitudes are not
/// rejected; they produce a negative window, which
/// [`find_clusters`](crate::find_clusters) handles degenerately.
///
/// # Errors
///
/// [`WindowParseError::Empty`] when the input has no tokens,
/// [`WindowParseError::InvalidNumber`] when the magnitude token is not a
/// finite number.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_window(text: &str) -> Result<Duration, WindowParseError> {
    let text = text.trim().to_lowercase();
    let mut tokens = text.split_whitespace();

    let Some(magnitude) = tokens.next() else {
        return Err(WindowParseError::Empty);
    };

    let value: f64 = magnitude
        .parse()
        .map_err(|_| WindowParseError::InvalidNumber {
            value: magnitude.to_string(),
        })?;
    if !value.is_finite() {
        return Err(WindowParseError::InvalidNumber {
            value: magnitude.to_string(),
        });
    }

    let unit = WindowUnit::from_prefix(tokens.next().unwrap_or(""));
    let micros = (value * unit.seconds_per_unit() * 1_000_000.0).round();
    Ok(Duration::microseconds(micros as i64))
}

/// Formats a window for display, e.g. `"1m 30s"` or `"2h"`.
///
/// Zero components are omitted; a zero window prints as `"0s"` and a
/// sub-second one as milliseconds.
pub fn format_window(window: Duration) -> String {
    if window < Duration::zero() {
        return format!("-{}", format_window(-window));
    }

    let total_seconds = window.num_seconds();
    if total_seconds == 0 {
        let ms = window.num_milliseconds();
        if ms > 0 {
            return format!("{ms}ms");
        }
        return "0s".to_string();
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}
