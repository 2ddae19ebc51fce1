//! Field-level validation of request bodies.
//!
//! Inputs arrive as JSON. A field is accepted if it is a number or a string
//! that parses as one, is finite, and is not negative. Each check has a
//! fixed message that is returned to the caller verbatim.

use serde_json::Value;
use thiserror::Error;

/// Why a request body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid JSON format")]
    InvalidBody,

    #[error("Missing input: {0} is required")]
    Missing(&'static str),

    #[error("Invalid input: {0} must be a number")]
    NotANumber(&'static str),

    #[error("Invalid input: {0} must be non-negative")]
    Negative(&'static str),
}

/// Validated emission levels from a request body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionInputs {
    pub co: f64,
    pub ch4: f64,
}

impl EmissionInputs {
    /// Extracts and validates the `co` and `ch4` fields.
    ///
    /// Messages name the fields `CO` and `CH4`. `co` is checked first, so
    /// when both are bad the `CO` error wins.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBody`] if the body is not a
    /// non-empty object, otherwise the first field error.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let fields = match body {
            Value::Object(fields) if !fields.is_empty() => fields,
            _ => return Err(ValidationError::InvalidBody),
        };

        Ok(Self {
            co: validate_input(fields.get("co"), "CO")?,
            ch4: validate_input(fields.get("ch4"), "CH4")?,
        })
    }
}

/// Validates one input field.
///
/// `None` and JSON `null` are both treated as missing.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming `name` if the value is missing, not
/// a finite number, or negative.
pub fn validate_input(value: Option<&Value>, name: &'static str) -> Result<f64, ValidationError> {
    let number = match value {
        None | Some(Value::Null) => return Err(ValidationError::Missing(name)),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match number {
        Some(v) if !v.is_finite() => Err(ValidationError::NotANumber(name)),
        Some(v) if v < 0.0 => Err(ValidationError::Negative(name)),
        Some(v) => Ok(v),
        None => Err(ValidationError::NotANumber(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn check(value: Value) -> Result<f64, ValidationError> {
        validate_input(Some(&value), "CO")
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(check(json!(20)), Ok(20.0));
        assert_eq!(check(json!(12.5)), Ok(12.5));
        assert_eq!(check(json!(0)), Ok(0.0));
        assert_eq!(check(json!("7.25")), Ok(7.25));
        assert_eq!(check(json!(" 3 ")), Ok(3.0));
    }

    #[test]
    fn rejects_missing_values() {
        assert_eq!(validate_input(None, "CH4"), Err(ValidationError::Missing("CH4")));
        assert_eq!(check(Value::Null), Err(ValidationError::Missing("CO")));
        assert_eq!(
            ValidationError::Missing("CH4").to_string(),
            "Missing input: CH4 is required"
        );
    }

    #[test]
    fn rejects_non_numbers() {
        for value in [
            json!("abc"),
            json!(""),
            json!("NaN"),
            json!("inf"),
            json!(true),
            json!([1.0]),
            json!({ "value": 1.0 }),
        ] {
            assert_eq!(check(value.clone()), Err(ValidationError::NotANumber("CO")), "{value}");
        }
        assert_eq!(
            ValidationError::NotANumber("CO").to_string(),
            "Invalid input: CO must be a number"
        );
    }

    #[test]
    fn rejects_negative_values() {
        assert_eq!(check(json!(-5)), Err(ValidationError::Negative("CO")));
        assert_eq!(check(json!("-0.1")), Err(ValidationError::Negative("CO")));
        assert_eq!(
            ValidationError::Negative("CO").to_string(),
            "Invalid input: CO must be non-negative"
        );
    }

    #[test]
    fn body_must_be_a_non_empty_object() {
        for body in [json!({}), json!([]), json!("CO"), Value::Null] {
            assert_eq!(EmissionInputs::from_json(&body), Err(ValidationError::InvalidBody));
        }
    }

    #[test]
    fn co_is_checked_before_ch4() {
        let body = json!({ "co": -1, "ch4": "abc" });
        assert_eq!(EmissionInputs::from_json(&body), Err(ValidationError::Negative("CO")));

        let body = json!({ "co": 20, "ch4": "10" });
        assert_eq!(
            EmissionInputs::from_json(&body),
            Ok(EmissionInputs { co: 20.0, ch4: 10.0 })
        );
    }

    #[test]
    fn fields_are_read_from_lowercase_keys() {
        let body = json!({ "co": 20 });
        assert_eq!(EmissionInputs::from_json(&body), Err(ValidationError::Missing("CH4")));

        let body = json!({ "CO": 20, "CH4": 10 });
        assert_eq!(EmissionInputs::from_json(&body), Err(ValidationError::Missing("CO")));
    }
}
