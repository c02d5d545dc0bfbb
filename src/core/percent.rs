//! Percentage cell text
//!
//! Input cells hold whatever text the user typed. Reading a value out of a
//! cell never fails: text that is not a percentage in [0, 100] reads as 0.

use serde::{Deserialize, Serialize};

use crate::core::table::ValidationError;

/// Lowest accepted percentage
pub const MIN_PERCENT: f64 = 0.0;

/// Highest accepted percentage
pub const MAX_PERCENT: f64 = 100.0;

/// Strip surrounding whitespace and one trailing `%`
fn strip_percent(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed.strip_suffix('%').unwrap_or(trimmed).trim()
}

fn in_range(value: f64) -> bool {
    value.is_finite() && (MIN_PERCENT..=MAX_PERCENT).contains(&value)
}

/// Map `-0.0` to `0.0` so no sign reaches the table
pub fn unsigned_zero(value: f64) -> f64 {
    value + 0.0
}

/// Parse percentage text, degrading anything unusable to 0
///
/// Accepts `"60"`, `"60%"`, `" 12.5 % "`. Empty, non-numeric, non-finite or
/// out-of-range text yields `0.0`.
pub fn parse_percent(text: &str) -> f64 {
    match strip_percent(text).parse::<f64>() {
        Ok(value) if in_range(value) => unsigned_zero(value),
        _ => 0.0,
    }
}

/// Parse percentage text, rejecting anything unusable
///
/// Used where a new row is built from text; editing an existing cell goes
/// through [`parse_percent`] instead.
pub fn parse_percent_strict(text: &str) -> Result<f64, ValidationError> {
    let value = strip_percent(text)
        .parse::<f64>()
        .map_err(|_| ValidationError::MalformedPercent {
            text: text.to_string(),
        })?;
    check_range(value)?;
    Ok(unsigned_zero(value))
}

/// Check a value is a finite percentage in [0, 100]
pub fn check_range(value: f64) -> Result<(), ValidationError> {
    if in_range(value) {
        Ok(())
    } else {
        Err(ValidationError::PercentOutOfRange { value })
    }
}

/// Format a derived percentage with exactly two decimals, e.g. `42.86%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", unsigned_zero(value))
}

/// Cell text for a value supplied numerically, e.g. `60%` or `12.5%`
pub fn format_input(value: f64) -> String {
    format!("{}%", unsigned_zero(value))
}

/// Text of an editable percentage cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PercentText(String);

impl PercentText {
    /// Cell text for a numeric value
    pub fn from_value(value: f64) -> Self {
        Self(format_input(value))
    }

    /// Cell text exactly as typed
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw cell text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The percentage this cell reads as (0 when unusable)
    pub fn value(&self) -> f64 {
        parse_percent(&self.0)
    }

    /// The same percentage as a probability in [0, 1]
    pub fn probability(&self) -> f64 {
        self.value() / 100.0
    }
}

impl std::fmt::Display for PercentText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent_plain_and_suffixed() {
        assert_eq!(parse_percent("60"), 60.0);
        assert_eq!(parse_percent("60%"), 60.0);
        assert_eq!(parse_percent("  12.5 % "), 12.5);
        assert_eq!(parse_percent("0%"), 0.0);
        assert_eq!(parse_percent("100%"), 100.0);
    }

    #[test]
    fn test_parse_percent_degrades_to_zero() {
        assert_eq!(parse_percent(""), 0.0);
        assert_eq!(parse_percent("%"), 0.0);
        assert_eq!(parse_percent("abc"), 0.0);
        assert_eq!(parse_percent("NaN"), 0.0);
        assert_eq!(parse_percent("inf%"), 0.0);
        assert_eq!(parse_percent("150"), 0.0);
        assert_eq!(parse_percent("-5%"), 0.0);
        // Only one trailing sign is stripped
        assert_eq!(parse_percent("5%%"), 0.0);
    }

    #[test]
    fn test_parse_percent_strict() {
        assert_eq!(parse_percent_strict("40%").unwrap(), 40.0);
        assert!(matches!(
            parse_percent_strict("forty"),
            Err(ValidationError::MalformedPercent { .. })
        ));
        assert!(matches!(
            parse_percent_strict("101"),
            Err(ValidationError::PercentOutOfRange { .. })
        ));
    }

    #[test]
    fn test_negative_zero_reads_as_zero() {
        assert!(parse_percent("-0").is_sign_positive());
        assert!(parse_percent("-0%").is_sign_positive());
        assert!(parse_percent_strict("-0.0").unwrap().is_sign_positive());
        assert_eq!(format_percent(-0.0), "0.00%");
        assert_eq!(format_input(-0.0), "0%");
        assert_eq!(PercentText::from_value(-0.0).as_str(), "0%");
    }

    #[test]
    fn test_format_percent_two_decimals() {
        assert_eq!(format_percent(42.857142), "42.86%");
        assert_eq!(format_percent(95.0), "95.00%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_percent_text_round_trips_through_value() {
        let cell = PercentText::from_value(60.0);
        assert_eq!(cell.as_str(), "60%");
        assert_eq!(cell.value(), 60.0);
        assert!((cell.probability() - 0.6).abs() < 1e-12);

        let junk = PercentText::from_raw("sixty");
        assert_eq!(junk.value(), 0.0);
        assert_eq!(junk.to_string(), "sixty");
    }
}
