//! The default retry predicate and the shape inspection it relies on.
//!
//! The default predicate does not know the concrete type of a response. It asks
//! the outcome for its [`Shape`] through the [`Inspect`] capability and runs a
//! fixed, ordered list of checks against it.

use super::Outcome;
use crate::error::ClassificationError;

/// HTTP status codes the default predicate treats as transient.
pub const RETRYABLE_STATUS_CODES: [u16; 7] = [408, 413, 429, 500, 502, 503, 504];

/// What the default predicate can see of an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// An absent value.
    Null,
    /// A scalar value; carries its type name for error reporting.
    Primitive(&'static str),
    /// A structured value.
    Record {
        /// Value of an `ok` flag, if the record has a boolean one.
        ok: Option<bool>,
        /// The record's own numeric field values, in field order.
        numbers: Vec<f64>,
    },
}

impl Shape {
    /// A record with an `ok` flag and a status code.
    pub fn response(ok: bool, status: u16) -> Self {
        Shape::Record {
            ok: Some(ok),
            numbers: vec![f64::from(status)],
        }
    }
}

/// Capability to expose a [`Shape`] to the default predicate.
///
/// Implement this for response types that should work without an explicit
/// retry predicate.
///
/// ```rust
/// use fetch_retry_core::retry::{Inspect, Shape};
///
/// struct Reply {
///     code: u16,
/// }
///
/// impl Inspect for Reply {
///     fn shape(&self) -> Shape {
///         Shape::Record { ok: None, numbers: vec![f64::from(self.code)] }
///     }
/// }
/// ```
pub trait Inspect {
    /// Describe this value.
    fn shape(&self) -> Shape;
}

impl Inspect for serde_json::Value {
    fn shape(&self) -> Shape {
        use serde_json::Value;

        match self {
            Value::Null => Shape::Null,
            Value::Bool(_) => Shape::Primitive("boolean"),
            Value::Number(_) => Shape::Primitive("number"),
            Value::String(_) => Shape::Primitive("string"),
            Value::Array(items) => Shape::Record {
                ok: None,
                numbers: items.iter().filter_map(Value::as_f64).collect(),
            },
            Value::Object(fields) => Shape::Record {
                ok: fields.get("ok").and_then(Value::as_bool),
                numbers: fields.values().filter_map(Value::as_f64).collect(),
            },
        }
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn shape(&self) -> Shape {
        match self {
            Some(value) => value.shape(),
            None => Shape::Null,
        }
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

macro_rules! impl_primitive_inspect {
    ($name:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl Inspect for $ty {
                fn shape(&self) -> Shape {
                    Shape::Primitive($name)
                }
            }
        )+
    };
}

impl_primitive_inspect!("number" => u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
impl_primitive_inspect!("boolean" => bool);
impl_primitive_inspect!("string" => String, str);
impl_primitive_inspect!("undefined" => ());

/// The default retry predicate.
///
/// Checks, in order:
///
/// 1. no retries left: do not retry
/// 2. the request failed: retry
/// 3. a primitive value: [`ClassificationError::UnexpectedType`]
/// 4. a null value: retry
/// 5. a record with a boolean `ok` flag: retry iff `ok` is false
/// 6. a record whose first numeric field lies in `100..=599`: retry iff it is
///    one of [`RETRYABLE_STATUS_CODES`]
/// 7. anything else: [`ClassificationError::Unclassifiable`]
///
/// # Examples
///
/// ```rust
/// use fetch_retry_core::retry::default_retry_on;
/// use serde_json::json;
///
/// let outcome: Result<_, std::io::Error> = Ok(json!({ "status": 503 }));
/// assert_eq!(default_retry_on(&outcome, 3), Ok(true));
///
/// let outcome: Result<_, std::io::Error> = Ok(json!({ "ok": true, "status": 200 }));
/// assert_eq!(default_retry_on(&outcome, 3), Ok(false));
/// ```
pub fn default_retry_on<T, E>(
    outcome: &Outcome<T, E>,
    remaining: u32,
) -> Result<bool, ClassificationError>
where
    T: Inspect,
{
    if remaining == 0 {
        return Ok(false);
    }

    let value = match outcome {
        Ok(value) => value,
        Err(_) => return Ok(true),
    };

    match value.shape() {
        Shape::Primitive(type_name) => Err(ClassificationError::UnexpectedType(type_name)),
        Shape::Null => Ok(true),
        Shape::Record { ok: Some(ok), .. } => Ok(!ok),
        Shape::Record { ok: None, numbers } => numbers
            .into_iter()
            .find(|n| *n > 99.0 && *n < 600.0)
            .map(is_retryable_status)
            .ok_or(ClassificationError::Unclassifiable),
    }
}

fn is_retryable_status(code: f64) -> bool {
    RETRYABLE_STATUS_CODES
        .iter()
        .any(|status| f64::from(*status) == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    type JsonOutcome = Outcome<Value, String>;

    #[rstest]
    #[case(json!({ "status": 408 }), true)]
    #[case(json!({ "status": 413 }), true)]
    #[case(json!({ "status": 429 }), true)]
    #[case(json!({ "status": 500 }), true)]
    #[case(json!({ "status": 502 }), true)]
    #[case(json!({ "status": 503 }), true)]
    #[case(json!({ "status": 504 }), true)]
    #[case(json!({ "status": 200 }), false)]
    #[case(json!({ "status": 404 }), false)]
    #[case(json!({ "status": 501 }), false)]
    fn test_status_codes(#[case] value: Value, #[case] expected: bool) {
        let outcome: JsonOutcome = Ok(value);
        assert_eq!(default_retry_on(&outcome, 3), Ok(expected));
    }

    #[test]
    fn test_ok_flag_wins_over_status() {
        let outcome: JsonOutcome = Ok(json!({ "status": 408, "ok": false }));
        assert_eq!(default_retry_on(&outcome, 3), Ok(true));

        let outcome: JsonOutcome = Ok(json!({ "status": 503, "ok": true }));
        assert_eq!(default_retry_on(&outcome, 3), Ok(false));

        let outcome: JsonOutcome = Ok(json!({ "ok": false }));
        assert_eq!(default_retry_on(&outcome, 3), Ok(true));
    }

    #[test]
    fn test_no_retries_left_never_retries() {
        let outcome: JsonOutcome = Ok(json!({ "status": 503 }));
        assert_eq!(default_retry_on(&outcome, 0), Ok(false));

        // Even shapes that would otherwise fail classification
        let outcome: JsonOutcome = Ok(json!(42));
        assert_eq!(default_retry_on(&outcome, 0), Ok(false));
    }

    #[test]
    fn test_failures_are_retried() {
        let outcome: JsonOutcome = Err("connection reset".to_string());
        assert_eq!(default_retry_on(&outcome, 1), Ok(true));
    }

    #[test]
    fn test_null_is_retried() {
        let outcome: JsonOutcome = Ok(Value::Null);
        assert_eq!(default_retry_on(&outcome, 2), Ok(true));

        let outcome: Outcome<Option<Value>, String> = Ok(None);
        assert_eq!(default_retry_on(&outcome, 2), Ok(true));
    }

    #[rstest]
    #[case(json!(42), "number")]
    #[case(json!("oops"), "string")]
    #[case(json!(true), "boolean")]
    fn test_primitive_cannot_be_classified(
        #[case] value: Value,
        #[case] type_name: &'static str,
    ) {
        let outcome: JsonOutcome = Ok(value);
        assert_eq!(
            default_retry_on(&outcome, 3),
            Err(ClassificationError::UnexpectedType(type_name))
        );
    }

    #[test]
    fn test_rust_primitives_cannot_be_classified() {
        let outcome: Outcome<u16, String> = Ok(42);
        assert_eq!(
            default_retry_on(&outcome, 3),
            Err(ClassificationError::UnexpectedType("number"))
        );

        let outcome: Outcome<String, String> = Ok("done".to_string());
        assert_eq!(
            default_retry_on(&outcome, 3),
            Err(ClassificationError::UnexpectedType("string"))
        );
    }

    #[test]
    fn test_first_status_like_field_is_used() {
        // 42 is outside the status range and skipped; 429 is the first candidate
        let outcome: JsonOutcome = Ok(json!({ "attempt": 42, "code": 429, "other": 200 }));
        assert_eq!(default_retry_on(&outcome, 3), Ok(true));

        let outcome: JsonOutcome = Ok(json!({ "code": 200, "other": 503 }));
        assert_eq!(default_retry_on(&outcome, 3), Ok(false));
    }

    #[test]
    fn test_range_is_exclusive() {
        let outcome: JsonOutcome = Ok(json!({ "a": 99, "b": 600 }));
        assert_eq!(
            default_retry_on(&outcome, 3),
            Err(ClassificationError::Unclassifiable)
        );

        let outcome: JsonOutcome = Ok(json!({ "a": 100 }));
        assert_eq!(default_retry_on(&outcome, 3), Ok(false));
    }

    #[test]
    fn test_fractional_status_is_not_retryable() {
        let outcome: JsonOutcome = Ok(json!({ "latency": 408.5 }));
        assert_eq!(default_retry_on(&outcome, 3), Ok(false));
    }

    #[test]
    fn test_unrecognized_record() {
        let outcome: JsonOutcome = Ok(json!({ "message": "hello" }));
        assert_eq!(
            default_retry_on(&outcome, 3),
            Err(ClassificationError::Unclassifiable)
        );

        let outcome: JsonOutcome = Ok(json!({}));
        assert_eq!(
            default_retry_on(&outcome, 3),
            Err(ClassificationError::Unclassifiable)
        );
    }

    #[test]
    fn test_non_boolean_ok_is_ignored() {
        let outcome: JsonOutcome = Ok(json!({ "ok": "yes", "status": 502 }));
        assert_eq!(default_retry_on(&outcome, 3), Ok(true));
    }

    #[test]
    fn test_array_values_are_scanned() {
        let outcome: JsonOutcome = Ok(json!([1, 504]));
        assert_eq!(default_retry_on(&outcome, 3), Ok(true));
    }

    #[test]
    fn test_custom_inspect_impl() {
        struct Reply {
            code: u16,
        }

        impl Inspect for Reply {
            fn shape(&self) -> Shape {
                Shape::response((200..300).contains(&self.code), self.code)
            }
        }

        let outcome: Outcome<Reply, String> = Ok(Reply { code: 500 });
        assert_eq!(default_retry_on(&outcome, 1), Ok(true));

        let outcome: Outcome<Reply, String> = Ok(Reply { code: 204 });
        assert_eq!(default_retry_on(&outcome, 1), Ok(false));
    }
}
