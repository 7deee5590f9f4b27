//! Parameter type tree
//!
//! Every tool declares the shape of its parameters as a [`ParamType`] tree.
//! The schema generator, the coercion layer and the strict validator are all
//! pure functions over this tree; nothing is inferred at runtime.
//!
//! # Examples
//!
//! ```
//! use relay_domain::tool::types::{ParamType, RecordType, FieldSpec};
//! use serde_json::json;
//!
//! let point = RecordType::new("Point")
//!     .with_field(FieldSpec::new("x", ParamType::number()).required())
//!     .with_field(FieldSpec::new("y", ParamType::number()).required());
//!
//! let ty = ParamType::list_of(ParamType::record(point));
//! assert!(ty.accepts(&json!([{"x": 1, "y": 2.5}])));
//! assert!(!ty.accepts(&json!([{"x": 1}])));
//! assert_eq!(ty.describe(), "list<Point>");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON primitive kinds a parameter can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
        }
    }

    /// Primitive kind of a literal value, `None` for arrays and objects.
    ///
    /// Whole numbers stored as integers report [`PrimitiveType::Integer`];
    /// everything else numeric reports [`PrimitiveType::Number`].
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(PrimitiveType::Null),
            Value::Bool(_) => Some(PrimitiveType::Boolean),
            Value::String(_) => Some(PrimitiveType::String),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(PrimitiveType::Integer),
            Value::Number(_) => Some(PrimitiveType::Number),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Strict type check (no conversion).
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            PrimitiveType::String => value.is_string(),
            PrimitiveType::Integer => value.is_i64() || value.is_u64(),
            PrimitiveType::Number => value.is_number(),
            PrimitiveType::Boolean => value.is_boolean(),
            PrimitiveType::Null => value.is_null(),
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One named field of a [`RecordType`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub param_type: ParamType,
    pub required: bool,
    pub description: Option<String>,
}

impl FieldSpec {
    /// Optional field with the given type.
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A structured record: a nested object with named, typed fields.
///
/// `name` is display metadata only. It shows up in error messages and
/// [`ParamType::describe`] but never in a generated schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParamType {
    /// No declared type; any JSON value is accepted.
    #[default]
    Any,
    Primitive(PrimitiveType),
    /// `T | null`
    Optional(Box<ParamType>),
    /// Homogeneous list; `None` means the element type is unknown.
    List(Option<Box<ParamType>>),
    /// List whose elements are deduplicated after coercion.
    Set(Box<ParamType>),
    /// Fixed-arity, position-typed list.
    Tuple(Vec<ParamType>),
    /// String-keyed map; `None` means the value type is unknown.
    Map(Option<Box<ParamType>>),
    /// Members are tried in declaration order.
    Union(Vec<ParamType>),
    /// One of a fixed set of literal values.
    Enum(Vec<Value>),
    Record(RecordType),
    /// A type the tool author could not express; treated as [`ParamType::Any`]
    /// with a warning when schemas are generated.
    Unsupported(String),
}

impl ParamType {
    pub fn string() -> Self {
        ParamType::Primitive(PrimitiveType::String)
    }

    pub fn integer() -> Self {
        ParamType::Primitive(PrimitiveType::Integer)
    }

    pub fn number() -> Self {
        ParamType::Primitive(PrimitiveType::Number)
    }

    pub fn boolean() -> Self {
        ParamType::Primitive(PrimitiveType::Boolean)
    }

    pub fn null() -> Self {
        ParamType::Primitive(PrimitiveType::Null)
    }

    pub fn optional(inner: ParamType) -> Self {
        ParamType::Optional(Box::new(inner))
    }

    pub fn list_of(item: ParamType) -> Self {
        ParamType::List(Some(Box::new(item)))
    }

    pub fn set_of(item: ParamType) -> Self {
        ParamType::Set(Box::new(item))
    }

    pub fn map_of(value: ParamType) -> Self {
        ParamType::Map(Some(Box::new(value)))
    }

    pub fn union(members: impl IntoIterator<Item = ParamType>) -> Self {
        ParamType::Union(members.into_iter().collect())
    }

    pub fn tuple(members: impl IntoIterator<Item = ParamType>) -> Self {
        ParamType::Tuple(members.into_iter().collect())
    }

    pub fn enumeration<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        ParamType::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn record(record: RecordType) -> Self {
        ParamType::Record(record)
    }

    /// Whether `null` is an acceptable value for this type.
    pub fn is_nullable(&self) -> bool {
        match self {
            ParamType::Any | ParamType::Unsupported(_) | ParamType::Optional(_) => true,
            ParamType::Primitive(PrimitiveType::Null) => true,
            ParamType::Union(members) => members.iter().any(|m| m.is_nullable()),
            ParamType::Enum(values) => values.iter().any(Value::is_null),
            _ => false,
        }
    }

    /// Strict structural check: does `value` already have this shape?
    ///
    /// No conversion is attempted, so `"72"` is not an integer here.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::Any | ParamType::Unsupported(_) => true,
            ParamType::Primitive(p) => p.accepts(value),
            ParamType::Optional(inner) => value.is_null() || inner.accepts(value),
            ParamType::List(item) => value.as_array().is_some_and(|items| {
                item.as_ref()
                    .is_none_or(|item| items.iter().all(|v| item.accepts(v)))
            }),
            ParamType::Map(item) => value.as_object().is_some_and(|map| {
                item.as_ref()
                    .is_none_or(|item| map.values().all(|v| item.accepts(v)))
            }),
            ParamType::Set(item) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| item.accepts(v))),
            ParamType::Tuple(members) => value.as_array().is_some_and(|items| {
                items.len() == members.len()
                    && members.iter().zip(items).all(|(m, v)| m.accepts(v))
            }),
            ParamType::Union(members) => members.iter().any(|m| m.accepts(value)),
            ParamType::Enum(values) => values.contains(value),
            ParamType::Record(record) => value.as_object().is_some_and(|obj| {
                record.fields.iter().all(|field| match obj.get(&field.name) {
                    None | Some(Value::Null) if field.required => false,
                    None | Some(Value::Null) => true,
                    Some(v) => field.param_type.accepts(v),
                })
            }),
        }
    }

    /// Short human-readable label, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            ParamType::Any => "any".to_string(),
            ParamType::Primitive(p) => p.as_str().to_string(),
            ParamType::Optional(inner) => format!("optional<{}>", inner.describe()),
            ParamType::List(None) => "list".to_string(),
            ParamType::List(Some(item)) => format!("list<{}>", item.describe()),
            ParamType::Set(item) => format!("set<{}>", item.describe()),
            ParamType::Tuple(members) => format!("tuple<{}>", join_described(members)),
            ParamType::Map(None) => "map".to_string(),
            ParamType::Map(Some(value)) => format!("map<string, {}>", value.describe()),
            ParamType::Union(members) => format!("union<{}>", join_described(members)),
            ParamType::Enum(values) => format!(
                "enum[{}]",
                values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            ParamType::Record(record) => record.name.clone(),
            ParamType::Unsupported(label) => format!("unsupported({})", label),
        }
    }
}

/// Kind name of a JSON value as reported in error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match PrimitiveType::of(value) {
        Some(p) => p.as_str(),
        None if value.is_array() => "array",
        None => "object",
    }
}

fn join_described(members: &[ParamType]) -> String {
    members
        .iter()
        .map(ParamType::describe)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_of_literal() {
        assert_eq!(PrimitiveType::of(&json!(3)), Some(PrimitiveType::Integer));
        assert_eq!(PrimitiveType::of(&json!(3.5)), Some(PrimitiveType::Number));
        assert_eq!(PrimitiveType::of(&json!("a")), Some(PrimitiveType::String));
        assert_eq!(PrimitiveType::of(&json!(null)), Some(PrimitiveType::Null));
        assert_eq!(PrimitiveType::of(&json!([1])), None);
    }

    #[test]
    fn test_accepts_is_strict() {
        assert!(ParamType::integer().accepts(&json!(72)));
        assert!(!ParamType::integer().accepts(&json!("72")));
        assert!(ParamType::number().accepts(&json!(72)));
        assert!(!ParamType::string().accepts(&json!(null)));
        assert!(ParamType::optional(ParamType::string()).accepts(&json!(null)));
    }

    #[test]
    fn test_accepts_collections() {
        let tuple = ParamType::tuple([ParamType::string(), ParamType::integer()]);
        assert!(tuple.accepts(&json!(["a", 1])));
        assert!(!tuple.accepts(&json!(["a"])));

        let map = ParamType::map_of(ParamType::boolean());
        assert!(map.accepts(&json!({"a": true})));
        assert!(!map.accepts(&json!({"a": 1})));

        assert!(ParamType::List(None).accepts(&json!([1, "mixed"])));
    }

    #[test]
    fn test_record_required_fields() {
        let rec = RecordType::new("Query")
            .with_field(FieldSpec::new("q", ParamType::string()).required())
            .with_field(FieldSpec::new("limit", ParamType::integer()));
        let ty = ParamType::record(rec);

        assert!(ty.accepts(&json!({"q": "weather"})));
        assert!(ty.accepts(&json!({"q": "weather", "limit": null})));
        assert!(!ty.accepts(&json!({"q": null})));
        assert!(!ty.accepts(&json!({"limit": 3})));
        assert!(!ty.accepts(&json!({"q": "x", "limit": "3"})));
    }

    #[test]
    fn test_is_nullable() {
        assert!(ParamType::optional(ParamType::integer()).is_nullable());
        assert!(ParamType::union([ParamType::integer(), ParamType::null()]).is_nullable());
        assert!(!ParamType::union([ParamType::integer(), ParamType::string()]).is_nullable());
        assert!(ParamType::Any.is_nullable());
    }

    #[test]
    fn test_describe() {
        let ty = ParamType::map_of(ParamType::union([ParamType::integer(), ParamType::string()]));
        assert_eq!(ty.describe(), "map<string, union<integer, string>>");
        assert_eq!(ParamType::enumeration(["a", "b"]).describe(), r#"enum["a", "b"]"#);
    }
}
