//! Field error constructors for risk API payloads.
//!
//! Problems are collected as `mp_error::FieldError`s located under `body`
//! and surface as `422 Unprocessable Entity`.

use mp_error::FieldError;
use serde_json::Value;

pub const BODY: &str = "body";

pub trait RiskErrorExt {
    fn missing_field(field: &str) -> FieldError {
        FieldError::new([BODY, field], "missing", "Field required")
    }

    fn wrong_type(field: &str, expected: ExpectedType, input: &Value) -> FieldError {
        FieldError::new([BODY, field], expected.code(), expected.message())
            .with_input(input.clone())
    }

    /// Translates a `validator` failure on `field`.
    ///
    /// `range` failures become `greater_than_equal` or `less_than_equal`
    /// depending on which bound the value crossed.
    fn violation(field: &str, error: &validator::ValidationError) -> FieldError {
        let param = |name: &str| error.params.get(name).cloned();
        let input = param("value");

        if error.code != "range" {
            let msg = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            let err = FieldError::new([BODY, field], error.code.to_string(), msg);
            return match input {
                Some(value) => err.with_input(value),
                None => err,
            };
        }

        let value = input.as_ref().and_then(Value::as_f64);
        let min = param("min");
        let below_min = match (value, min.as_ref().and_then(Value::as_f64)) {
            (Some(value), Some(min)) => value < min,
            _ => false,
        };

        let (kind, msg) = match (below_min, min, param("max")) {
            (true, Some(min), _) => (
                "greater_than_equal",
                format!("Input should be greater than or equal to {min}"),
            ),
            (_, _, Some(max)) => (
                "less_than_equal",
                format!("Input should be less than or equal to {max}"),
            ),
            _ => ("range", "Input is out of range".to_string()),
        };

        let err = FieldError::new([BODY, field], kind, msg);
        match input {
            Some(value) => err.with_input(value),
            None => err,
        }
    }

    fn not_finite(field: &str) -> FieldError {
        FieldError::new([BODY, field], "finite_number", "Input should be a finite number")
    }

    fn not_an_object(input: &Value) -> FieldError {
        FieldError::new(
            [BODY],
            "model_type",
            "Input should be a valid dictionary or object",
        )
        .with_input(input.clone())
    }

    fn json_invalid(reason: impl Into<String>) -> FieldError {
        FieldError::new(
            [BODY],
            "json_invalid",
            format!("JSON decode error: {}", reason.into()),
        )
    }
}

impl RiskErrorExt for FieldError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
    Integer,
    Number,
    Boolean,
}

impl ExpectedType {
    fn code(self) -> &'static str {
        match self {
            ExpectedType::Integer => "int_type",
            ExpectedType::Number => "float_type",
            ExpectedType::Boolean => "bool_type",
        }
    }

    fn message(self) -> &'static str {
        match self {
            ExpectedType::Integer => "Input should be a valid integer",
            ExpectedType::Number => "Input should be a valid number",
            ExpectedType::Boolean => "Input should be a valid boolean",
        }
    }
}
