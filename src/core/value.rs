use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw laboratory value as it arrived from the data source.
///
/// Values are never coerced at ingestion time; each consumer decides how
/// to treat text that does not read as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    /// Decode one JSON cell. `null`, empty strings and the unavailable
    /// marker are all treated as missing.
    pub fn from_json(value: &serde_json::Value, unavailable_marker: &str) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Missing,
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => RawValue::Number(v),
                None => RawValue::Text(n.to_string()),
            },
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed == unavailable_marker {
                    RawValue::Missing
                } else {
                    RawValue::Text(s.clone())
                }
            }
            other => RawValue::Text(other.to_string()),
        }
    }

    /// Numeric coercion. Returns `None` for missing values, text that does
    /// not parse as a real number, NaN and infinities.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) if v.is_finite() => Some(*v),
            RawValue::Number(_) => None,
            RawValue::Text(s) => parse_number(s),
            RawValue::Missing => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    /// Presentation form of the value: numbers formatted, text verbatim,
    /// missing as an empty string.
    pub fn display(&self) -> String {
        match self {
            RawValue::Number(v) => format_number(*v),
            RawValue::Text(s) => s.clone(),
            RawValue::Missing => String::new(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Parse text as a finite real number.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Format a number for a report cell. Whole numbers lose their fractional
/// part, everything else keeps up to six significant decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{:.6}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
