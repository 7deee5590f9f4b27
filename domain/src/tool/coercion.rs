//! Argument coercion
//!
//! Converts JSON arguments produced by a model into the shape a tool
//! declared. Models routinely send `"72"` where an integer is expected or a
//! float where an integer fits, so conversion is best-effort. How mismatches
//! are handled is decided per parameter by [`CoercionMode`]:
//!
//! | Target | Lenient mismatch | Strict mismatch |
//! |--------|------------------|-----------------|
//! | primitive, enum, record | raw value passed through | error |
//! | list, set, map, tuple (wrong shape) | error | error |
//! | union (no member fits) | error | error |
//!
//! Union members are always tried strictly, in declaration order, so that a
//! lenient passthrough of the first member cannot shadow a better match.
//!
//! Coercion is idempotent: feeding a coerced value back in returns it
//! unchanged.

use super::types::{ParamType, PrimitiveType, RecordType, json_kind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// How a parameter reacts to values it cannot convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Pass unconvertible scalars and records through unchanged; the tool
    /// decides what to do with them.
    Lenient,
    /// Every mismatch is an error.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("expected {expected} items, got {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("missing required field '{field}' for {record}")]
    MissingField { record: String, field: String },

    #[error("{value} is not one of {allowed}")]
    NotInEnum { value: String, allowed: String },

    #[error("no compatible type in union {0}")]
    NoCompatibleUnionMember(String),

    #[error("{path}: {source}")]
    At {
        path: String,
        source: Box<CoercionError>,
    },
}

impl CoercionError {
    fn mismatch(expected: &ParamType, value: &Value) -> Self {
        CoercionError::TypeMismatch {
            expected: expected.describe(),
            found: json_kind(value),
        }
    }

    fn at(path: impl Into<String>, source: CoercionError) -> Self {
        CoercionError::At {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Coerce `value` into the shape described by `ty`.
///
/// # Examples
///
/// ```
/// use relay_domain::tool::coercion::{coerce, CoercionMode};
/// use relay_domain::tool::types::ParamType;
/// use serde_json::json;
///
/// let ty = ParamType::list_of(ParamType::integer());
/// assert_eq!(coerce(&json!(["1", 2.0, 3]), &ty, CoercionMode::Strict).unwrap(), json!([1, 2, 3]));
///
/// // Lenient scalars fall back to the raw value.
/// assert_eq!(coerce(&json!("abc"), &ParamType::integer(), CoercionMode::Lenient).unwrap(), json!("abc"));
/// assert!(coerce(&json!("abc"), &ParamType::integer(), CoercionMode::Strict).is_err());
/// ```
pub fn coerce(value: &Value, ty: &ParamType, mode: CoercionMode) -> Result<Value, CoercionError> {
    match ty {
        ParamType::Any | ParamType::Unsupported(_) => Ok(value.clone()),
        ParamType::Primitive(primitive) => tolerate(
            coerce_primitive(value, *primitive).ok_or_else(|| CoercionError::mismatch(ty, value)),
            value,
            mode,
        ),
        ParamType::Optional(inner) => {
            if value.is_null() {
                Ok(Value::Null)
            } else {
                coerce(value, inner, mode)
            }
        }
        ParamType::List(item) => {
            let items = value
                .as_array()
                .ok_or_else(|| CoercionError::mismatch(ty, value))?;
            match item {
                None => Ok(value.clone()),
                Some(item) => coerce_items(items, item, mode).map(Value::Array),
            }
        }
        ParamType::Set(item) => {
            let items = value
                .as_array()
                .ok_or_else(|| CoercionError::mismatch(ty, value))?;
            let coerced = coerce_items(items, item, mode)?;
            let mut unique: Vec<Value> = Vec::with_capacity(coerced.len());
            for v in coerced {
                if !unique.contains(&v) {
                    unique.push(v);
                }
            }
            Ok(Value::Array(unique))
        }
        ParamType::Tuple(members) => {
            let items = value
                .as_array()
                .ok_or_else(|| CoercionError::mismatch(ty, value))?;
            if items.len() != members.len() {
                return Err(CoercionError::LengthMismatch {
                    expected: members.len(),
                    found: items.len(),
                });
            }
            members
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (member, v))| {
                    coerce(v, member, mode).map_err(|e| CoercionError::at(format!("[{}]", i), e))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        ParamType::Map(value_type) => {
            let map = value
                .as_object()
                .ok_or_else(|| CoercionError::mismatch(ty, value))?;
            let Some(value_type) = value_type else {
                return Ok(value.clone());
            };
            let mut out = Map::with_capacity(map.len());
            for (key, v) in map {
                let coerced =
                    coerce(v, value_type, mode).map_err(|e| CoercionError::at(key.clone(), e))?;
                out.insert(key.clone(), coerced);
            }
            Ok(Value::Object(out))
        }
        ParamType::Union(members) => members
            .iter()
            .find_map(|member| coerce(value, member, CoercionMode::Strict).ok())
            .ok_or_else(|| CoercionError::NoCompatibleUnionMember(ty.describe())),
        ParamType::Enum(allowed) => tolerate(coerce_enum(value, allowed), value, mode),
        ParamType::Record(record) => tolerate(coerce_record(value, record, mode), value, mode),
    }
}

fn tolerate(
    result: Result<Value, CoercionError>,
    raw: &Value,
    mode: CoercionMode,
) -> Result<Value, CoercionError> {
    match (result, mode) {
        (Ok(v), _) => Ok(v),
        (Err(_), CoercionMode::Lenient) => Ok(raw.clone()),
        (Err(e), CoercionMode::Strict) => Err(e),
    }
}

fn coerce_items(
    items: &[Value],
    item: &ParamType,
    mode: CoercionMode,
) -> Result<Vec<Value>, CoercionError> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| coerce(v, item, mode).map_err(|e| CoercionError::at(format!("[{}]", i), e)))
        .collect()
}

/// Best-effort scalar conversion; `None` when no sensible conversion exists.
fn coerce_primitive(value: &Value, target: PrimitiveType) -> Option<Value> {
    if target.accepts(value) {
        return Some(value.clone());
    }
    match target {
        PrimitiveType::String => match value {
            Value::Number(n) => Some(Value::String(n.to_string())),
            Value::Bool(b) => Some(Value::String(b.to_string())),
            _ => None,
        },
        PrimitiveType::Integer => match value {
            Value::Number(n) => n.as_f64().and_then(integral).map(Value::from),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
                    .map(Value::from)
            }
            _ => None,
        },
        PrimitiveType::Number => match value {
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            _ => None,
        },
        PrimitiveType::Boolean => match value {
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        PrimitiveType::Null => None,
    }
}

/// 2^63, the first float above the `i64` range.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Whole floats convert to integers; fractional ones are rejected rather
/// than truncated.
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < I64_UPPER_BOUND {
        Some(f as i64)
    } else {
        None
    }
}

fn coerce_enum(value: &Value, allowed: &[Value]) -> Result<Value, CoercionError> {
    if allowed.contains(value) {
        return Ok(value.clone());
    }
    allowed
        .iter()
        .find(|literal| {
            PrimitiveType::of(literal)
                .and_then(|kind| coerce_primitive(value, kind))
                .is_some_and(|converted| &converted == *literal)
        })
        .cloned()
        .ok_or_else(|| CoercionError::NotInEnum {
            value: value.to_string(),
            allowed: Value::Array(allowed.to_vec()).to_string(),
        })
}

fn coerce_record(
    value: &Value,
    record: &RecordType,
    mode: CoercionMode,
) -> Result<Value, CoercionError> {
    let obj = value
        .as_object()
        .ok_or_else(|| CoercionError::TypeMismatch {
            expected: record.name.clone(),
            found: json_kind(value),
        })?;

    // Unknown keys are dropped.
    let mut out = Map::new();
    for field in &record.fields {
        match obj.get(&field.name) {
            None | Some(Value::Null) if field.required => {
                return Err(CoercionError::MissingField {
                    record: record.name.clone(),
                    field: field.name.clone(),
                });
            }
            None => {}
            Some(Value::Null) => {
                out.insert(field.name.clone(), Value::Null);
            }
            Some(v) => {
                let coerced = coerce(v, &field.param_type, mode)
                    .map_err(|e| CoercionError::at(field.name.clone(), e))?;
                out.insert(field.name.clone(), coerced);
            }
        }
    }
    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::types::FieldSpec;
    use serde_json::json;

    use CoercionMode::{Lenient, Strict};

    fn address() -> RecordType {
        RecordType::new("Address")
            .with_field(FieldSpec::new("city", ParamType::string()).required())
            .with_field(FieldSpec::new("zip", ParamType::integer()))
    }

    fn shapes() -> Vec<ParamType> {
        vec![
            ParamType::Any,
            ParamType::string(),
            ParamType::integer(),
            ParamType::number(),
            ParamType::boolean(),
            ParamType::optional(ParamType::integer()),
            ParamType::list_of(ParamType::integer()),
            ParamType::List(None),
            ParamType::set_of(ParamType::string()),
            ParamType::tuple([ParamType::string(), ParamType::number()]),
            ParamType::map_of(ParamType::boolean()),
            ParamType::union([ParamType::integer(), ParamType::string()]),
            ParamType::union([ParamType::boolean(), ParamType::number(), ParamType::null()]),
            ParamType::enumeration([json!("celsius"), json!("fahrenheit")]),
            ParamType::enumeration([json!(1), json!(2), json!("auto")]),
            ParamType::record(address()),
            ParamType::list_of(ParamType::record(address())),
        ]
    }

    fn samples() -> Vec<Value> {
        vec![
            json!(null),
            json!(true),
            json!("false"),
            json!(72),
            json!(72.0),
            json!(2.5),
            json!("72"),
            json!("1"),
            json!("1.0"),
            json!("celsius"),
            json!("weather"),
            json!([]),
            json!(["a", "a", "b"]),
            json!(["1", 2, 3.0]),
            json!(["x", "4.5"]),
            json!({"flag": "yes", "other": false}),
            json!({"city": "Paris", "zip": "75001", "extra": 1}),
            json!({"zip": 1}),
            json!([{"city": "Oslo"}, {"city": 5}]),
        ]
    }

    #[test]
    fn test_coercion_is_idempotent() {
        for ty in shapes() {
            for mode in [Lenient, Strict] {
                for v in samples() {
                    if let Ok(once) = coerce(&v, &ty, mode) {
                        let twice = coerce(&once, &ty, mode);
                        assert_eq!(
                            twice.as_ref(),
                            Ok(&once),
                            "not idempotent for {} / {:?} / {}",
                            ty.describe(),
                            mode,
                            v
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_primitive_conversions() {
        assert_eq!(coerce(&json!("72"), &ParamType::integer(), Strict), Ok(json!(72)));
        assert_eq!(coerce(&json!(3.0), &ParamType::integer(), Strict), Ok(json!(3)));
        assert_eq!(coerce(&json!(72), &ParamType::string(), Strict), Ok(json!("72")));
        assert_eq!(coerce(&json!("2.5"), &ParamType::number(), Strict), Ok(json!(2.5)));
        assert_eq!(coerce(&json!("Yes"), &ParamType::boolean(), Strict), Ok(json!(true)));
        assert_eq!(coerce(&json!(7), &ParamType::number(), Strict), Ok(json!(7)));
    }

    #[test]
    fn test_fractional_float_is_not_truncated() {
        assert!(coerce(&json!(3.7), &ParamType::integer(), Strict).is_err());
        assert_eq!(coerce(&json!(3.7), &ParamType::integer(), Lenient), Ok(json!(3.7)));
    }

    #[test]
    fn test_float_outside_i64_range_is_rejected() {
        assert!(coerce(&json!(9.223372036854775808e18), &ParamType::integer(), Strict).is_err());
        assert_eq!(
            coerce(&json!(9.223372036854774784e18), &ParamType::integer(), Strict),
            Ok(json!(9_223_372_036_854_774_784i64))
        );
        assert_eq!(
            coerce(&json!(-9.223372036854775808e18), &ParamType::integer(), Strict),
            Ok(json!(i64::MIN))
        );
    }

    #[test]
    fn test_lenient_primitive_passthrough() {
        assert_eq!(
            coerce(&json!({"a": 1}), &ParamType::string(), Lenient),
            Ok(json!({"a": 1}))
        );
        assert!(matches!(
            coerce(&json!({"a": 1}), &ParamType::string(), Strict),
            Err(CoercionError::TypeMismatch { found: "object", .. })
        ));
    }

    #[test]
    fn test_list_rejects_non_array_in_both_modes() {
        let ty = ParamType::list_of(ParamType::string());
        assert!(coerce(&json!("a"), &ty, Lenient).is_err());
        assert!(coerce(&json!("a"), &ty, Strict).is_err());
    }

    #[test]
    fn test_list_error_reports_index() {
        let ty = ParamType::list_of(ParamType::integer());
        let err = coerce(&json!([1, "x"]), &ty, Strict).unwrap_err();
        assert_eq!(err.to_string(), "[1]: expected integer, got string");
    }

    #[test]
    fn test_map_coerces_values_only() {
        let ty = ParamType::map_of(ParamType::integer());
        assert_eq!(
            coerce(&json!({"a": "1", "b": 2}), &ty, Strict),
            Ok(json!({"a": 1, "b": 2}))
        );
        assert!(coerce(&json!([1]), &ty, Lenient).is_err());
    }

    #[test]
    fn test_union_first_success_wins() {
        let ty = ParamType::union([ParamType::integer(), ParamType::string()]);
        assert_eq!(coerce(&json!("007"), &ty, Lenient), Ok(json!(7)));
        assert_eq!(coerce(&json!("abc"), &ty, Lenient), Ok(json!("abc")));

        let ty = ParamType::union([ParamType::integer(), ParamType::boolean()]);
        assert_eq!(
            coerce(&json!([1]), &ty, Lenient),
            Err(CoercionError::NoCompatibleUnionMember("union<integer, boolean>".into()))
        );
    }

    #[test]
    fn test_tuple_length_and_positions() {
        let ty = ParamType::tuple([ParamType::string(), ParamType::integer()]);
        assert_eq!(coerce(&json!([1, "2"]), &ty, Strict), Ok(json!(["1", 2])));
        assert_eq!(
            coerce(&json!(["a"]), &ty, Lenient),
            Err(CoercionError::LengthMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_set_deduplicates_after_coercion() {
        let ty = ParamType::set_of(ParamType::integer());
        assert_eq!(coerce(&json!([1, "1", 2, 1.0]), &ty, Strict), Ok(json!([1, 2])));
    }

    #[test]
    fn test_enum_matches_literal_kind() {
        let ty = ParamType::enumeration([1, 2]);
        assert_eq!(coerce(&json!("2"), &ty, Strict), Ok(json!(2)));
        assert!(matches!(
            coerce(&json!(3), &ty, Strict),
            Err(CoercionError::NotInEnum { .. })
        ));
    }

    #[test]
    fn test_record_builds_and_drops_unknown_keys() {
        let ty = ParamType::record(address());
        assert_eq!(
            coerce(&json!({"city": "Paris", "zip": "75001", "extra": true}), &ty, Strict),
            Ok(json!({"city": "Paris", "zip": 75001}))
        );
    }

    #[test]
    fn test_record_mismatch_returns_raw_when_lenient() {
        let ty = ParamType::record(address());
        let raw = json!({"zip": 1});
        assert_eq!(coerce(&raw, &ty, Lenient), Ok(raw.clone()));
        assert_eq!(
            coerce(&raw, &ty, Strict),
            Err(CoercionError::MissingField {
                record: "Address".into(),
                field: "city".into()
            })
        );
    }

    #[test]
    fn test_optional_keeps_null() {
        let ty = ParamType::optional(ParamType::integer());
        assert_eq!(coerce(&Value::Null, &ty, Strict), Ok(Value::Null));
        assert_eq!(coerce(&json!("4"), &ty, Strict), Ok(json!(4)));
    }
}
