#![deny(missing_docs)]

//! # Schema Normalization
//!
//! Read-only views that smooth over compatibility gaps between document
//! dialects before classification:
//!
//! - Swagger 2.0 `type: file` / `format: file` -> `string` + `binary`.
//! - OAS 3.1 type arrays (`[string, "null"]`) -> a single type plus nullability.
//! - OAS 3.0 `nullable` and Swagger `x-nullable`.
//!
//! The fragment itself is never rewritten.

use serde_json::Value;

/// The effective `type`/`format` of a schema fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeInfo {
    /// Effective type keyword, if any.
    pub ty: Option<String>,
    /// Effective format keyword, if any.
    pub format: Option<String>,
    /// Null is an accepted value.
    pub nullable: bool,
    /// The legacy `file` spelling was rewritten.
    pub legacy_file: bool,
}

/// Computes the effective type information of a schema fragment.
pub fn normalize_type(schema: &Value) -> TypeInfo {
    let mut info = TypeInfo {
        format: schema
            .get("format")
            .and_then(Value::as_str)
            .map(str::to_string),
        nullable: is_flag_set(schema, "nullable") || is_flag_set(schema, "x-nullable"),
        ..TypeInfo::default()
    };

    match schema.get("type") {
        Some(Value::String(ty)) => info.ty = Some(ty.clone()),
        Some(Value::Array(types)) => {
            let mut concrete = Vec::new();
            for ty in types.iter().filter_map(Value::as_str) {
                if ty == "null" {
                    info.nullable = true;
                } else {
                    concrete.push(ty);
                }
            }
            info.ty = match concrete.as_slice() {
                [] => None,
                [single] => Some(single.to_string()),
                many => Some(many.join("|")),
            };
        }
        _ => {}
    }

    if info.ty.as_deref() == Some("file") || info.format.as_deref() == Some("file") {
        info.ty = Some("string".to_string());
        info.format = Some("binary".to_string());
        info.legacy_file = true;
    }

    info
}

/// Infers the JSON type keyword of a literal value (used for `enum` members).
pub fn infer_schema_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) => Some("string"),
        Value::Bool(_) => Some("boolean"),
        Value::Number(num) => {
            if num.is_i64() || num.is_u64() {
                Some("integer")
            } else {
                Some("number")
            }
        }
        Value::Array(_) => Some("array"),
        Value::Object(_) => Some("object"),
        Value::Null => None,
    }
}

/// True if `key` holds boolean `true`.
pub fn is_flag_set(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// True if `key` holds a mapping with at least one entry.
pub fn has_entries(value: &Value, key: &str) -> bool {
    value
        .get(key)
        .and_then(Value::as_object)
        .is_some_and(|map| !map.is_empty())
}

/// True if `key` holds a non-empty sequence.
pub fn has_items(value: &Value, key: &str) -> bool {
    value
        .get(key)
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

/// `additionalProperties` as the modeler sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionalProperties {
    /// Absent or `false`.
    Closed,
    /// `true` or `{}`: values of any type.
    Any,
    /// A schema (inline or reference) for the values.
    Schema,
}

/// Reads the `additionalProperties` keyword.
pub fn additional_properties(schema: &Value) -> AdditionalProperties {
    match schema.get("additionalProperties") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => AdditionalProperties::Closed,
        Some(Value::Bool(true)) => AdditionalProperties::Any,
        Some(Value::Object(map)) if map.is_empty() => AdditionalProperties::Any,
        Some(_) => AdditionalProperties::Schema,
    }
}
