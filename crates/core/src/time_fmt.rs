// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human duration strings: parsing for configuration, formatting for
//! timeout messages.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFmtError {
    #[error("empty duration string")]
    Empty,
    #[error("invalid number in duration: {0}")]
    InvalidNumber(String),
    #[error("unknown duration suffix: {0}")]
    UnknownSuffix(String),
    #[error("duration out of range: {0}")]
    Overflow(String),
}

/// Parse `"30s"`, `"5m"`, `"1h"`, `"2d"`, `"250ms"` (and long forms such as
/// `"5mins"`). A bare number is seconds.
pub fn parse_duration(s: &str) -> Result<Duration, TimeFmtError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeFmtError::Empty);
    }

    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: u64 = num_str.parse().map_err(|_| TimeFmtError::InvalidNumber(s.to_string()))?;

    let multiplier = match suffix.trim() {
        "ms" | "millis" | "millisecond" | "milliseconds" => {
            return Ok(Duration::from_millis(num));
        }
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
        "d" | "day" | "days" => 86400,
        other => return Err(TimeFmtError::UnknownSuffix(other.to_string())),
    };

    let secs = num.checked_mul(multiplier).ok_or_else(|| TimeFmtError::Overflow(s.to_string()))?;
    Ok(Duration::from_secs(secs))
}

/// Round to the nearest minute and render as `HHhMMm`, e.g. `00h31m`.
///
/// Hours are not wrapped into days: 36 hours renders as `36h00m`.
pub fn format_hours_minutes(d: Duration) -> String {
    let minutes = d.as_secs().saturating_add(30) / 60;
    format!("{:02}h{:02}m", minutes / 60, minutes % 60)
}

/// Serde adapter for `Duration` fields written as human strings.
pub mod serde_duration {
    use super::{parse_duration, Duration};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        if d.subsec_millis() != 0 {
            s.serialize_str(&format!("{}ms", d.as_millis()))
        } else {
            s.serialize_str(&format!("{}s", d.as_secs()))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
