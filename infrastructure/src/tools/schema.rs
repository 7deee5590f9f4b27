//! JSON Schema tool converter.
//!
//! Implementation of [`ToolSchemaPort`] producing the function-calling
//! envelope used by chat-completion APIs:
//!
//! ```json
//! {"type": "function",
//!  "function": {"name": "...", "description": "...",
//!               "parameters": {"type": "object", "properties": {...}, "required": [...]},
//!               "returns": {"description": "..."}}}
//! ```
//!
//! [`ParamType`] mapping:
//! - primitives → `string` / `integer` / `number` / `boolean` / `null`
//! - `list<T>` → `array` with `items`; `set<T>` adds `uniqueItems`
//! - `tuple<..>` → `array` with `prefixItems`, `minItems`, `maxItems`
//! - `map<string, V>` → `object` with `additionalProperties`
//! - `optional<T>` → T plus `nullable: true`
//! - unions → `oneOf`; a null member becomes `nullable: true`
//! - enums → `{type, enum}`, or `oneOf` per literal kind
//! - records → nested `object` schemas
//! - untyped and unsupported → `object`
//!
//! Some providers reject object schemas without properties, so every nested
//! object schema that has none gets a placeholder `_any` property.

use relay_application::ports::tool_schema::ToolSchemaPort;
use relay_domain::tool::types::json_kind;
use relay_domain::{ParamType, RecordType, ToolDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::warn;

/// Keywords removed by [`SchemaProfile::Strict`].
const STRICT_UNSUPPORTED: [&str; 5] = [
    "additionalProperties",
    "uniqueItems",
    "prefixItems",
    "minItems",
    "maxItems",
];

/// Provider compatibility profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaProfile {
    /// Full schema, including array and map constraints
    #[default]
    Standard,
    /// For providers with a reduced schema dialect: drops constraint
    /// keywords and the `returns` block
    Strict,
}

impl SchemaProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaProfile::Standard => "standard",
            SchemaProfile::Strict => "strict",
        }
    }
}

impl std::str::FromStr for SchemaProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(SchemaProfile::Standard),
            "strict" => Ok(SchemaProfile::Strict),
            other => Err(format!("unknown schema profile: {}", other)),
        }
    }
}

/// Default [`ToolSchemaPort`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaToolConverter {
    profile: SchemaProfile,
}

impl JsonSchemaToolConverter {
    pub fn new(profile: SchemaProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> SchemaProfile {
        self.profile
    }

    /// Schema for a single type node, after post-processing.
    pub fn type_schema(&self, ty: &ParamType) -> Value {
        let mut schema = type_to_schema(ty);
        self.post_process(&mut schema);
        schema
    }

    fn post_process(&self, schema: &mut Value) {
        inject_placeholders(schema);
        if self.profile == SchemaProfile::Strict {
            strip_keywords(schema);
        }
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDescriptor) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let mut schema = type_to_schema(&param.param_type);
            if !param.description.is_empty()
                && let Some(obj) = schema.as_object_mut()
            {
                obj.insert("description".into(), json!(param.description));
            }
            properties.insert(param.name.clone(), schema);

            if param.required {
                required.push(json!(param.name));
            }
        }

        // The top-level object is post-processed too, so a tool without
        // parameters still gets a placeholder property
        let mut parameters = json!({
            "type": "object",
            "properties": properties,
            "required": required,
        });
        self.post_process(&mut parameters);

        let mut function = Map::new();
        function.insert("name".into(), json!(tool.name));
        function.insert("description".into(), json!(tool.description));
        function.insert("parameters".into(), parameters);
        if let Some(returns) = &tool.returns
            && self.profile == SchemaProfile::Standard
        {
            function.insert("returns".into(), json!({ "description": returns }));
        }

        json!({ "type": "function", "function": function })
    }
}

fn type_to_schema(ty: &ParamType) -> Value {
    match ty {
        ParamType::Any => json!({ "type": "object" }),
        ParamType::Primitive(p) => json!({ "type": p.as_str() }),
        ParamType::Optional(inner) => nullable(type_to_schema(inner)),
        ParamType::List(None) => json!({ "type": "array" }),
        ParamType::List(Some(item)) => json!({ "type": "array", "items": type_to_schema(item) }),
        ParamType::Set(item) => json!({
            "type": "array",
            "items": type_to_schema(item),
            "uniqueItems": true,
        }),
        ParamType::Tuple(members) => json!({
            "type": "array",
            "prefixItems": members.iter().map(type_to_schema).collect::<Vec<_>>(),
            "minItems": members.len(),
            "maxItems": members.len(),
        }),
        ParamType::Map(value) => {
            let mut schema = json!({
                "type": "object",
                "properties": {
                    "_any": { "type": "string", "description": "Any dictionary property" }
                },
            });
            if let Some(value) = value {
                schema["additionalProperties"] = type_to_schema(value);
            }
            schema
        }
        ParamType::Union(members) => union_schema(members),
        ParamType::Enum(values) => enum_schema(values),
        ParamType::Record(record) => record_schema(record),
        ParamType::Unsupported(label) => {
            warn!(type_label = %label, "Unsupported parameter type, using an open object schema");
            json!({ "type": "object" })
        }
    }
}

fn nullable(mut schema: Value) -> Value {
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("nullable".into(), Value::Bool(true));
    }
    schema
}

fn is_null_type(ty: &ParamType) -> bool {
    matches!(ty, ParamType::Primitive(relay_domain::PrimitiveType::Null))
}

fn union_schema(members: &[ParamType]) -> Value {
    let non_null: Vec<&ParamType> = members.iter().filter(|m| !is_null_type(m)).collect();
    let has_null = non_null.len() < members.len();

    let schema = match non_null.as_slice() {
        [] => json!({ "type": "null" }),
        [single] => type_to_schema(single),
        many => json!({ "oneOf": many.iter().map(|m| type_to_schema(m)).collect::<Vec<_>>() }),
    };

    if has_null && !non_null.is_empty() {
        nullable(schema)
    } else {
        schema
    }
}

fn enum_schema(values: &[Value]) -> Value {
    // Group literals by kind, keeping first-appearance order
    let mut groups: Vec<(&'static str, Vec<Value>)> = Vec::new();
    let mut has_null = false;
    for value in values {
        if value.is_null() {
            has_null = true;
            continue;
        }
        let kind = json_kind(value);
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, vals)) => vals.push(value.clone()),
            None => groups.push((kind, vec![value.clone()])),
        }
    }

    let schema = match groups.as_slice() {
        [] => json!({ "type": "null" }),
        [(kind, vals)] => json!({ "type": kind, "enum": vals }),
        many => json!({
            "oneOf": many
                .iter()
                .map(|(kind, vals)| json!({ "type": kind, "enum": vals }))
                .collect::<Vec<_>>()
        }),
    };

    if has_null && !groups.is_empty() {
        nullable(schema)
    } else {
        schema
    }
}

fn record_schema(record: &RecordType) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &record.fields {
        let mut schema = type_to_schema(&field.param_type);
        if let Some(desc) = &field.description
            && let Some(obj) = schema.as_object_mut()
        {
            obj.insert("description".into(), json!(desc));
        }
        properties.insert(field.name.clone(), schema);
        if field.required {
            required.push(json!(field.name));
        }
    }

    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    if let Some(desc) = &record.description {
        schema["description"] = json!(desc);
    }
    schema
}

/// Give every object schema without properties a placeholder property.
fn inject_placeholders(schema: &mut Value) {
    match schema {
        Value::Object(obj) => {
            let is_object = obj.get("type").and_then(Value::as_str) == Some("object");
            let lacks_properties = obj
                .get("properties")
                .and_then(Value::as_object)
                .is_none_or(Map::is_empty);
            if is_object && lacks_properties {
                obj.insert(
                    "properties".into(),
                    json!({ "_any": { "type": "string", "description": "Any property" } }),
                );
            }
            for (key, child) in obj.iter_mut() {
                // Property maps hold names, not schemas; recurse into their values
                if key == "properties" {
                    if let Some(props) = child.as_object_mut() {
                        props.values_mut().for_each(inject_placeholders);
                    }
                } else {
                    inject_placeholders(child);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(inject_placeholders),
        _ => {}
    }
}

/// Remove keywords unsupported by strict providers, recursively.
fn strip_keywords(schema: &mut Value) {
    match schema {
        Value::Object(obj) => {
            for key in STRICT_UNSUPPORTED {
                obj.remove(key);
            }
            obj.values_mut().for_each(strip_keywords);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_keywords),
        _ => {}
    }
}
