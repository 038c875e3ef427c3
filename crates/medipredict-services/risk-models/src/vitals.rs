use crate::error::{ExpectedType, RiskErrorExt};
use mp_error::{FieldError, ValidationErrors};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

/// Request fields in declaration order; errors are reported in this order.
const FIELDS: [&str; 4] = ["age", "bmi", "systolic_bp", "is_smoker"];

/// Validated patient vitals.
///
/// Fields are private so a value can only exist once its bounds have been
/// checked by [`PatientVitals::new`] or [`PatientVitals::from_json`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({"age": 45, "bmi": 24.5, "systolic_bp": 120, "is_smoker": false}))]
pub struct PatientVitals {
    /// Patient age in years
    #[schema(minimum = 1, maximum = 120)]
    age: u8,
    /// Body Mass Index
    #[schema(minimum = 10.0, maximum = 60.0)]
    bmi: f64,
    /// Systolic blood pressure
    #[schema(minimum = 70, maximum = 200)]
    systolic_bp: u16,
    /// Smoking status
    is_smoker: bool,
}

/// Bounds of the numeric fields. A `None` field already failed its type
/// check and is skipped.
#[derive(Debug, Validate)]
struct VitalsBounds {
    #[validate(range(min = 1, max = 120))]
    age: Option<i64>,
    #[validate(range(min = 10.0, max = 60.0))]
    bmi: Option<f64>,
    #[validate(range(min = 70, max = 200))]
    systolic_bp: Option<i64>,
}

impl PatientVitals {
    /// Builds vitals from typed values, reporting every out-of-range field.
    pub fn new(
        age: i64,
        bmi: f64,
        systolic_bp: i64,
        is_smoker: bool,
    ) -> Result<Self, ValidationErrors> {
        let bounds = VitalsBounds {
            age: Some(age),
            bmi: Some(bmi),
            systolic_bp: Some(systolic_bp),
        };
        Self::build(bounds, Some(is_smoker), Vec::new())
    }

    /// Builds vitals from an untyped JSON request body.
    ///
    /// Every field is checked, so a single call reports all missing, mistyped
    /// and out-of-range fields together. Unknown keys are ignored.
    ///
    /// Values are coerced the lax way: numeric strings are accepted for
    /// numbers, integral floats and booleans for integers, and `0`/`1` or
    /// words such as `"yes"`/`"off"` for booleans.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let Some(object) = body.as_object() else {
            return Err(FieldError::not_an_object(body).into());
        };

        let mut problems = Vec::new();

        let bounds = VitalsBounds {
            age: field(object, "age", ExpectedType::Integer, as_integer, &mut problems),
            bmi: field(object, "bmi", ExpectedType::Number, as_number, &mut problems),
            systolic_bp: field(
                object,
                "systolic_bp",
                ExpectedType::Integer,
                as_integer,
                &mut problems,
            ),
        };
        let is_smoker = field(
            object,
            "is_smoker",
            ExpectedType::Boolean,
            as_boolean,
            &mut problems,
        );

        Self::build(bounds, is_smoker, problems)
    }

    fn build(
        bounds: VitalsBounds,
        is_smoker: Option<bool>,
        mut problems: Vec<FieldError>,
    ) -> Result<Self, ValidationErrors> {
        if let Err(violations) = bounds.validate() {
            let by_field = violations.field_errors();
            for name in FIELDS {
                if let Some(errors) = by_field.get(name) {
                    problems.extend(errors.iter().map(|e| FieldError::violation(name, e)));
                }
            }
        }

        // NaN passes every range comparison.
        if bounds.bmi.is_some_and(|bmi| !bmi.is_finite()) {
            problems.push(FieldError::not_finite("bmi"));
        }

        problems.sort_by_key(|e| {
            e.field()
                .and_then(|f| FIELDS.iter().position(|name| *name == f))
                .unwrap_or(0)
        });

        match (bounds.age, bounds.bmi, bounds.systolic_bp, is_smoker) {
            (Some(age), Some(bmi), Some(systolic_bp), Some(is_smoker)) if problems.is_empty() => {
                Ok(Self {
                    // Both narrowings are covered by the range checks above.
                    age: age as u8,
                    bmi,
                    systolic_bp: systolic_bp as u16,
                    is_smoker,
                })
            }
            _ => Err(problems.into_iter().collect()),
        }
    }

    #[must_use]
    pub fn age(&self) -> u8 {
        self.age
    }

    #[must_use]
    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    #[must_use]
    pub fn systolic_bp(&self) -> u16 {
        self.systolic_bp
    }

    #[must_use]
    pub fn is_smoker(&self) -> bool {
        self.is_smoker
    }
}

fn field<T>(
    object: &Map<String, Value>,
    name: &str,
    expected: ExpectedType,
    coerce: fn(&Value) -> Option<T>,
    problems: &mut Vec<FieldError>,
) -> Option<T> {
    let value = match object.get(name) {
        Some(Value::Null) | None => {
            problems.push(FieldError::missing_field(name));
            return None;
        }
        Some(value) => value,
    };

    let parsed = coerce(value);
    if parsed.is_none() {
        problems.push(FieldError::wrong_type(name, expected, value));
    }
    parsed
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            // 45.0 is an integer; 45.5 is not.
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => Some(false),
            Some(f) if f == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "0" | "off" | "f" | "false" | "n" | "no" => Some(false),
            "1" | "on" | "t" | "true" | "y" | "yes" => Some(true),
            _ => None,
        },
        _ => None,
    }
}
