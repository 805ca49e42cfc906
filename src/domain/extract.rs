//! Boundary adapter from loosely-typed event records to [`Occurrences`].
//!
//! Events arrive as arbitrary JSON produced by the pipeline. Each counter is
//! coerced to an integer the permissive way: absent or `null` becomes zero,
//! floats are truncated, strings contribute their leading digits. Only values
//! that have no integer reading at all (booleans, arrays, objects) or that do
//! not fit in an `i64` are rejected.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::Occurrences;

pub const EVENT_OCCURRENCES: &str = "occurrences";
pub const CHECK_OCCURRENCES: &str = "check.occurrences";
pub const CHECK_RETRY_OCCURRENCES: &str = "check.retry_occurrences";

/// Counters pulled out of an event, plus the fields that defaulted to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub occurrences: Occurrences,
    pub missing: Vec<&'static str>,
}

/// Extract the occurrence counters from an event record.
pub fn extract(event: &Value) -> Result<Extracted, FilterError> {
    let event = event
        .as_object()
        .ok_or_else(|| FilterError::Data(format!("event must be an object, got {}", kind(event))))?;

    let mut missing = Vec::new();

    let event_occurrences = coerce_field(event, "occurrences", EVENT_OCCURRENCES, &mut missing)?;

    let (check_occurrences, retry_occurrences) = match event.get("check") {
        None | Some(Value::Null) => {
            missing.push(CHECK_OCCURRENCES);
            missing.push(CHECK_RETRY_OCCURRENCES);
            (0, 0)
        }
        Some(Value::Object(check)) => (
            coerce_field(check, "occurrences", CHECK_OCCURRENCES, &mut missing)?,
            coerce_field(
                check,
                "retry_occurrences",
                CHECK_RETRY_OCCURRENCES,
                &mut missing,
            )?,
        ),
        Some(other) => {
            return Err(FilterError::Data(format!(
                "check must be an object, got {}",
                kind(other)
            )))
        }
    };

    Ok(Extracted {
        occurrences: Occurrences::new(event_occurrences, check_occurrences, retry_occurrences),
        missing,
    })
}

fn coerce_field(
    record: &Map<String, Value>,
    key: &str,
    path: &'static str,
    missing: &mut Vec<&'static str>,
) -> Result<i64, FilterError> {
    match record.get(key) {
        None | Some(Value::Null) => {
            missing.push(path);
            Ok(0)
        }
        Some(value) => coerce_integer(path, value),
    }
}

/// Coerce a JSON value to an integer.
pub fn coerce_integer(path: &str, value: &Value) -> Result<i64, FilterError> {
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if n.is_u64() {
                return Err(out_of_range(path, value));
            }
            match n.as_f64() {
                // i64::MAX is not representable as f64, so the upper bound is exclusive
                Some(f) if f >= -9_223_372_036_854_775_808.0 && f < 9_223_372_036_854_775_808.0 => {
                    Ok(f.trunc() as i64)
                }
                _ => Err(out_of_range(path, value)),
            }
        }
        Value::String(s) => coerce_str(path, s),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(FilterError::Data(format!(
            "{} cannot be converted to an integer: {}",
            path,
            kind(value)
        ))),
    }
}

fn coerce_str(path: &str, s: &str) -> Result<i64, FilterError> {
    static LEADING_INTEGER: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_INTEGER.get_or_init(|| {
        Regex::new(r"^\s*([+-]?[0-9]+(?:_[0-9]+)*)").expect("leading integer pattern is valid")
    });

    let Some(caps) = re.captures(s) else {
        return Ok(0);
    };

    let digits: String = caps[1].chars().filter(|c| *c != '_').collect();
    digits
        .parse::<i64>()
        .map_err(|_| FilterError::Data(format!("{} is out of integer range: {:?}", path, s)))
}

fn out_of_range(path: &str, value: &Value) -> FilterError {
    FilterError::Data(format!("{} is out of integer range: {}", path, value))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_complete_event() {
        let event = json!({
            "occurrences": 10,
            "check": {"name": "disk", "occurrences": 3, "retry_occurrences": 5}
        });
        let extracted = extract(&event).unwrap();
        assert_eq!(extracted.occurrences, Occurrences::new(10, 3, 5));
        assert!(extracted.missing.is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let extracted = extract(&json!({"check": {"occurrences": 2}})).unwrap();
        assert_eq!(extracted.occurrences, Occurrences::new(0, 2, 0));
        assert_eq!(
            extracted.missing,
            vec![EVENT_OCCURRENCES, CHECK_RETRY_OCCURRENCES]
        );
    }

    #[test]
    fn test_missing_check_defaults_to_zero() {
        let extracted = extract(&json!({"occurrences": 4})).unwrap();
        assert_eq!(extracted.occurrences, Occurrences::new(4, 0, 0));
        assert_eq!(
            extracted.missing,
            vec![CHECK_OCCURRENCES, CHECK_RETRY_OCCURRENCES]
        );

        let extracted = extract(&json!({"occurrences": 4, "check": null})).unwrap();
        assert_eq!(extracted.occurrences, Occurrences::new(4, 0, 0));
    }

    #[test]
    fn test_null_is_missing() {
        let extracted = extract(&json!({
            "occurrences": null,
            "check": {"occurrences": 1, "retry_occurrences": null}
        }))
        .unwrap();
        assert_eq!(extracted.occurrences, Occurrences::new(0, 1, 0));
        assert_eq!(extracted.missing.len(), 2);
    }

    #[test]
    fn test_string_coercion() {
        let v = |s: &str| coerce_integer("f", &json!(s));
        assert_eq!(v("12"), Ok(12));
        assert_eq!(v("  7 times"), Ok(7));
        assert_eq!(v("-3"), Ok(-3));
        assert_eq!(v("+8"), Ok(8));
        assert_eq!(v("1_000"), Ok(1000));
        assert_eq!(v("abc"), Ok(0));
        assert_eq!(v(""), Ok(0));
        assert_eq!(v("0x1f"), Ok(0));
        assert!(v("99999999999999999999").is_err());
    }

    #[test]
    fn test_float_coercion_truncates() {
        assert_eq!(coerce_integer("f", &json!(3.9)), Ok(3));
        assert_eq!(coerce_integer("f", &json!(-3.9)), Ok(-3));
        assert!(coerce_integer("f", &json!(1e300)).is_err());
    }

    #[test]
    fn test_large_unsigned_rejected() {
        assert!(coerce_integer("f", &json!(u64::MAX)).is_err());
    }

    #[test]
    fn test_uncoercible_values_rejected() {
        for value in [json!(true), json!([1]), json!({"n": 1})] {
            let err = coerce_integer("occurrences", &value).unwrap_err();
            assert!(matches!(err, FilterError::Data(_)));
        }
    }

    #[test]
    fn test_non_object_event_rejected() {
        let err = extract(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            FilterError::Data("event must be an object, got array".to_string())
        );
    }

    #[test]
    fn test_non_object_check_rejected() {
        let err = extract(&json!({"occurrences": 1, "check": "disk"})).unwrap_err();
        assert!(err.to_string().contains("check must be an object"));
    }
}
