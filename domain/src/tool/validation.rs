//! Parameter validation for tools that opt into strict checking
//!
//! Tools whose capabilities set `strict_validation` get their arguments
//! checked before coercion: unknown names, missing or null required values,
//! declared types and the per-parameter [`Validator`] list.

use super::entities::ToolDescriptor;
use super::types::json_kind;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Validation failure for a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parameter '{parameter}': {message}")]
pub struct ValidationError {
    pub parameter: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A check applied to a parameter value after its declared type matched.
#[derive(Clone)]
pub enum Validator {
    /// Inclusive numeric bounds.
    Range { min: Option<f64>, max: Option<f64> },
    /// The string must match the pattern starting at its first character.
    Pattern(Regex),
    OneOf(Vec<Value>),
    Custom { message: String, predicate: Predicate },
}

impl Validator {
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Validator::Range { min, max }
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Validator::Pattern)
    }

    pub fn one_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Validator::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn custom(
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Validator::Custom {
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Run the check, returning the failure message.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Validator::Range { min, max } => {
                let Some(n) = value.as_f64() else {
                    return Err(format!("Expected a number, got {}", json_kind(value)));
                };
                if let Some(min) = min
                    && n < *min
                {
                    return Err(format!("Value must be >= {}", min));
                }
                if let Some(max) = max
                    && n > *max
                {
                    return Err(format!("Value must be <= {}", max));
                }
                Ok(())
            }
            Validator::Pattern(re) => {
                let Some(s) = value.as_str() else {
                    return Err(format!("Expected a string, got {}", json_kind(value)));
                };
                match re.find(s) {
                    Some(m) if m.start() == 0 => Ok(()),
                    _ => Err(format!("Value must match pattern {}", re.as_str())),
                }
            }
            Validator::OneOf(allowed) => {
                if allowed.contains(value) {
                    Ok(())
                } else {
                    Err(format!(
                        "Value must be one of {}",
                        Value::Array(allowed.clone())
                    ))
                }
            }
            Validator::Custom { message, predicate } => {
                if predicate(value) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
        }
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Validator::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Validator::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Validator::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Validator::Custom { message, .. } => {
                f.debug_struct("Custom").field("message", message).finish()
            }
        }
    }
}

/// Check raw arguments against a descriptor.
///
/// Returns the first failure found; arguments are visited in the order the
/// descriptor declares them, after unknown names are rejected.
pub fn validate_arguments(
    descriptor: &ToolDescriptor,
    args: &Map<String, Value>,
) -> Result<(), ValidationError> {
    if let Some(unknown) = args.keys().find(|k| descriptor.parameter(k).is_none()) {
        return Err(ValidationError::new(unknown.as_str(), "Unexpected argument"));
    }

    for param in &descriptor.parameters {
        let value = match args.get(&param.name) {
            None if param.required => {
                return Err(ValidationError::new(&param.name, "Required parameter is missing"));
            }
            Some(Value::Null) if param.required && !param.param_type.is_nullable() => {
                return Err(ValidationError::new(&param.name, "Value cannot be None"));
            }
            None | Some(Value::Null) => continue,
            Some(v) => v,
        };

        if !param.param_type.accepts(value) {
            return Err(ValidationError::new(
                &param.name,
                format!(
                    "Expected {}, got {}",
                    param.param_type.describe(),
                    json_kind(value)
                ),
            ));
        }

        for validator in &param.validators {
            validator
                .check(value)
                .map_err(|message| ValidationError::new(&param.name, message))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ParameterSpec;
    use crate::tool::types::ParamType;
    use serde_json::json;

    fn forecast_tool() -> ToolDescriptor {
        ToolDescriptor::new("forecast", "Weather forecast")
            .with_parameter(
                ParameterSpec::new("city", "City name", true)
                    .with_type(ParamType::string())
                    .with_validator(Validator::pattern("[A-Z]").unwrap()),
            )
            .with_parameter(
                ParameterSpec::new("days", "Number of days", false)
                    .with_type(ParamType::integer())
                    .with_validator(Validator::range(Some(1.0), Some(14.0))),
            )
            .with_parameter(
                ParameterSpec::new("units", "Unit system", false)
                    .with_type(ParamType::string())
                    .with_validator(Validator::one_of(["metric", "imperial"])),
            )
    }

    fn args(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_arguments_pass() {
        let tool = forecast_tool();
        assert!(validate_arguments(&tool, &args(json!({"city": "Oslo", "days": 3}))).is_ok());
    }

    #[test]
    fn test_missing_required() {
        let err = validate_arguments(&forecast_tool(), &args(json!({"days": 3}))).unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'city': Required parameter is missing");
    }

    #[test]
    fn test_null_required() {
        let err = validate_arguments(&forecast_tool(), &args(json!({"city": null}))).unwrap_err();
        assert_eq!(err.parameter, "city");
        assert_eq!(err.message, "Value cannot be None");
    }

    #[test]
    fn test_optional_null_skips_checks() {
        let tool = forecast_tool();
        assert!(validate_arguments(&tool, &args(json!({"city": "Oslo", "days": null}))).is_ok());
    }

    #[test]
    fn test_unexpected_argument() {
        let err = validate_arguments(&forecast_tool(), &args(json!({"city": "Oslo", "zoom": 2})))
            .unwrap_err();
        assert_eq!(err.parameter, "zoom");
    }

    #[test]
    fn test_type_mismatch_is_not_coerced() {
        let err = validate_arguments(&forecast_tool(), &args(json!({"city": "Oslo", "days": "3"})))
            .unwrap_err();
        assert_eq!(err.message, "Expected integer, got string");
    }

    #[test]
    fn test_range_validator() {
        let err = validate_arguments(&forecast_tool(), &args(json!({"city": "Oslo", "days": 30})))
            .unwrap_err();
        assert_eq!(err.message, "Value must be <= 14");
    }

    #[test]
    fn test_pattern_is_anchored_at_start() {
        let v = Validator::pattern("[A-Z]").unwrap();
        assert!(v.check(&json!("Oslo")).is_ok());
        assert!(v.check(&json!("oslo")).is_err());
    }

    #[test]
    fn test_one_of_validator() {
        let err = validate_arguments(
            &forecast_tool(),
            &args(json!({"city": "Oslo", "units": "kelvin"})),
        )
        .unwrap_err();
        assert_eq!(err.message, r#"Value must be one of ["metric","imperial"]"#);
    }

    #[test]
    fn test_custom_validator() {
        let v = Validator::custom("Must be even", |v| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert!(v.check(&json!(4)).is_ok());
        assert_eq!(v.check(&json!(3)), Err("Must be even".to_string()));
    }
}
