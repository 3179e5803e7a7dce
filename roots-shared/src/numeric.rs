//! Lenient decoding for checkout payloads.
//!
//! The storefront sends whatever its form state holds: prices may be numbers or
//! strings, ids may be numeric, and unset fields may be `null`. None of that is
//! an error for notification purposes, so these helpers coerce instead of
//! rejecting.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decimal field: numbers pass through, numeric strings are parsed from their
/// leading digits, anything else becomes zero.
pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_decimal(&value))
}

/// Integer count field: fractional parts are truncated and negatives clamp to zero.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_count(&value))
}

/// Optional text field that also accepts numbers (`"id": 42`). Empty strings,
/// zero, `false` and `null` are treated as absent.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_text(&value))
}

pub fn to_decimal(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_leading_decimal(s),
        _ => 0.0,
    }
}

pub fn to_count(value: &Value) -> u32 {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_leading_integer(s),
        _ => 0,
    };
    raw.clamp(0, u32::MAX as i64) as u32
}

pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => number_text(n),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// `42.0` prints as `42`, like the storefront shows it
fn number_text(n: &serde_json::Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    let f = n.as_f64()?;
    if f == 0.0 {
        None
    } else if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some((f as i64).to_string())
    } else {
        Some(f.to_string())
    }
}

fn parse_leading_decimal(input: &str) -> f64 {
    let s = input.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return 0.0;
    }
    s[..end].trim_end_matches('.').parse().unwrap_or(0.0)
}

fn parse_leading_integer(input: &str) -> i64 {
    let s = input.trim_start();
    let end = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '+' || c == '-')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    s[..end].parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_accepts_numbers_and_strings() {
        assert_eq!(to_decimal(&json!(450)), 450.0);
        assert_eq!(to_decimal(&json!("12.5")), 12.5);
        assert_eq!(to_decimal(&json!(" 99.90 rupees")), 99.9);
        assert_eq!(to_decimal(&json!("abc")), 0.0);
        assert_eq!(to_decimal(&json!(null)), 0.0);
    }

    #[test]
    fn test_count_truncates_and_clamps() {
        assert_eq!(to_count(&json!(2)), 2);
        assert_eq!(to_count(&json!(2.9)), 2);
        assert_eq!(to_count(&json!("3 packs")), 3);
        assert_eq!(to_count(&json!(-4)), 0);
        assert_eq!(to_count(&json!("-1")), 0);
        assert_eq!(to_count(&json!({})), 0);
    }

    #[test]
    fn test_text_treats_empty_as_absent() {
        assert_eq!(to_text(&json!(42)), Some("42".to_string()));
        assert_eq!(to_text(&json!("ORD-1")), Some("ORD-1".to_string()));
        assert_eq!(to_text(&json!("")), None);
        assert_eq!(to_text(&json!(null)), None);
    }

    #[test]
    fn test_text_formats_whole_floats_as_integers() {
        assert_eq!(to_text(&json!(42.0)), Some("42".to_string()));
        assert_eq!(to_text(&json!(7.5)), Some("7.5".to_string()));
        assert_eq!(to_text(&json!(-3)), Some("-3".to_string()));
    }

    #[test]
    fn test_text_treats_zero_and_false_as_absent() {
        assert_eq!(to_text(&json!(0)), None);
        assert_eq!(to_text(&json!(0.0)), None);
        assert_eq!(to_text(&json!(false)), None);
        assert_eq!(to_text(&json!(true)), Some("true".to_string()));
    }
}
