//! Human-friendly duration literals for the email cooldown setting.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(ms|s|m|h)?$").expect("duration pattern"));

/// Parse a literal like `"500ms"`, `"30s"`, `"5m"` or `"2h"` into
/// milliseconds. The unit is case-insensitive and defaults to seconds when
/// omitted. Negative or unparseable input is rejected.
pub fn parse_duration_ms(input: &str) -> Result<u64> {
    let invalid = || Error::InvalidDuration(input.to_string());

    let caps = DURATION_LITERAL.captures(input).ok_or_else(invalid)?;
    let value: f64 = caps[1].parse().map_err(|_| invalid())?;

    let ms = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(unit) if unit == "ms" => value,
        Some(unit) if unit == "m" => value * 60.0 * 1000.0,
        Some(unit) if unit == "h" => value * 60.0 * 60.0 * 1000.0,
        // "s" or no unit at all
        _ => value * 1000.0,
    };

    Ok(ms.round() as u64)
}
