#![deny(missing_docs)]

//! # Interpretations
//!
//! Cross-cutting metadata read off document nodes: operation identity, path
//! overrides, description fallbacks, extensions, and the canonical server list.

use crate::codemodel::{
    ChoiceValue, HttpMethod, HttpModel, HttpServer, ImplementationLocation, Schema, SchemaKind,
    SchemaStore, ServerId, ServerVariable, StringConstraints,
};
use crate::diagnostics::{codes, Diagnostics};
use indexmap::IndexMap;
use serde_json::Value;
use utoipa::openapi::external_docs::ExternalDocs;
use utoipa::openapi::info::{Contact, License};
use utoipa::openapi::xml::Xml;
use utoipa::openapi::Info;

/// Member name used when an operation has neither an id nor tags.
pub const UNKNOWN_MEMBER: &str = "unknown-method";

/// Group and member name of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationIdentity {
    /// Group name, `""` when ungrouped.
    pub group: String,
    /// Member name.
    pub member: String,
}

/// Splits an operation id at the first `separator`.
///
/// `Widgets_List` -> (`Widgets`, `List`); `List` -> (``, `List`).
pub fn split_operation_id(operation_id: &str, separator: char) -> OperationIdentity {
    match operation_id.split_once(separator) {
        Some((group, member)) => OperationIdentity {
            group: group.to_string(),
            member: member.to_string(),
        },
        None => OperationIdentity {
            group: String::new(),
            member: operation_id.to_string(),
        },
    }
}

/// Reads (or synthesizes from tags) the identity of an operation.
pub fn operation_identity(
    method: HttpMethod,
    path: &str,
    operation: &Value,
    source: &str,
    separator: char,
    diag: &mut impl Diagnostics,
) -> OperationIdentity {
    if let Some(id) = operation
        .get("operationId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
    {
        return split_operation_id(id, separator);
    }

    let tags = string_list(operation, "tags");
    let synthesized = match tags.as_slice() {
        [] => None,
        [only] => Some(only.clone()),
        [first, second, ..] => Some(format!("{}{}{}", first, separator, second)),
    };

    match synthesized {
        Some(id) => {
            diag.warning(
                codes::INTERPRETATIONS,
                format!(
                    "Generating 'operationId' for '{}' operation on path '{}'",
                    method, path
                ),
                source,
            );
            split_operation_id(&id, separator)
        }
        None => {
            diag.error(
                codes::INTERPRETATIONS,
                format!(
                    "NEED 'operationId' for '{}' operation on path '{}'",
                    method, path
                ),
                source,
            );
            split_operation_id(UNKNOWN_MEMBER, separator)
        }
    }
}

/// First non-empty of `description`, `title`, `summary`, else `default`.
pub fn description(default: &str, source: &Value) -> String {
    ["description", "title", "summary"]
        .iter()
        .filter_map(|key| source.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// The path an operation is served on.
///
/// `x-ms-metadata.path` on the operation wins over the one on the path item,
/// which wins over the literal document key.
pub fn effective_path(path_item: &Value, operation: &Value, key: &str) -> String {
    metadata_path(operation)
        .or_else(|| metadata_path(path_item))
        .unwrap_or(key)
        .to_string()
}

fn metadata_path(node: &Value) -> Option<&str> {
    node.get("x-ms-metadata")
        .and_then(|meta| meta.get("path"))
        .and_then(Value::as_str)
}

/// `deprecated: true`.
pub fn deprecated(source: &Value) -> bool {
    source
        .get("deprecated")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// `example`, else the first of `examples`.
pub fn example(source: &Value) -> Option<Value> {
    if let Some(example) = source.get("example") {
        return Some(example.clone());
    }
    match source.get("examples")? {
        Value::Array(items) => items.first().cloned(),
        Value::Object(map) => map
            .values()
            .next()
            .map(|entry| entry.get("value").unwrap_or(entry).clone()),
        _ => None,
    }
}

/// The `x-` properties of a node.
pub fn extensions(source: &Value) -> IndexMap<String, Value> {
    match source {
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| key.starts_with("x-"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => IndexMap::new(),
    }
}

/// The `externalDocs` object.
pub fn external_docs(source: &Value) -> Option<ExternalDocs> {
    source
        .get("externalDocs")
        .and_then(|docs| serde_json::from_value(docs.clone()).ok())
}

/// The `xml` serialization hints.
pub fn xml(source: &Value) -> Option<Xml> {
    source
        .get("xml")
        .and_then(|xml| serde_json::from_value(xml.clone()).ok())
}

/// `x-ms-parameter-location`, defaulting to method level.
pub fn implementation_location(parameter: &Value) -> ImplementationLocation {
    match parameter
        .get("x-ms-parameter-location")
        .and_then(Value::as_str)
    {
        Some("client") => ImplementationLocation::Client,
        _ => ImplementationLocation::Method,
    }
}

/// The sequence of strings at `key`.
pub fn string_list(source: &Value, key: &str) -> Vec<String> {
    source
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Reads the document `info` block.
pub fn info(root: &Value) -> Info {
    let source = root.get("info").unwrap_or(&Value::Null);
    let title = source
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("MISSING-TITLE");
    let version = match source.get("version") {
        Some(Value::String(version)) => version.clone(),
        Some(Value::Number(version)) => version.to_string(),
        _ => String::new(),
    };

    let mut info = Info::new(title.to_string(), version);
    info.description = source
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    info.terms_of_service = source
        .get("termsOfService")
        .and_then(Value::as_str)
        .map(str::to_string);
    info.contact = source
        .get("contact")
        .and_then(|contact| serde_json::from_value::<Contact>(contact.clone()).ok());
    info.license = source
        .get("license")
        .and_then(|license| serde_json::from_value::<License>(license.clone()).ok());
    info
}

/// Builds (or reuses) the servers of an operation.
///
/// The operation's own `servers` win over the path item's, which win over the
/// document's. Every URL is registered once in `http`; later declarations of the
/// same URL reuse the first registration.
pub fn canonical_servers(
    operation: &Value,
    path_item: &Value,
    root: &Value,
    http: &mut HttpModel,
    schemas: &mut SchemaStore,
) -> Vec<ServerId> {
    let declared = [operation, path_item, root]
        .into_iter()
        .filter_map(|node| node.get("servers").and_then(Value::as_array))
        .find(|servers| !servers.is_empty());

    let Some(declared) = declared else {
        return Vec::new();
    };

    let mut ids = Vec::new();
    for server in declared {
        let Some(url) = server.get("url").and_then(Value::as_str) else {
            continue;
        };
        let id = match http.find(url) {
            Some(existing) => existing,
            None => {
                let built = build_server(url, server, schemas);
                http.add(built)
            }
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

fn build_server(url: &str, server: &Value, schemas: &mut SchemaStore) -> HttpServer {
    let mut variables = IndexMap::new();
    if let Some(Value::Object(declared)) = server.get("variables") {
        for (name, variable) in declared {
            let description = description("MISSING-SERVER_VARIABLE-DESCRIPTION", variable);
            let schema = match variable.get("enum").and_then(Value::as_array) {
                Some(values) => server_variable_choice(name, &description, values, schemas),
                None => schemas.add(server_variable_string(name, &description)),
            };
            let default_value = match variable.get("default") {
                Some(Value::String(default)) => Some(default.clone()),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            };
            variables.insert(
                name.clone(),
                ServerVariable {
                    name: name.clone(),
                    description,
                    schema,
                    default_value,
                },
            );
        }
    }

    HttpServer {
        url: url.to_string(),
        description: description("MISSING-SERVER-DESCRIPTION", server),
        variables,
    }
}

fn server_variable_string(name: &str, description: &str) -> Schema {
    Schema::new(
        format!("ServerVariable/{}", name),
        description,
        SchemaKind::String {
            constraints: StringConstraints::default(),
        },
    )
}

fn server_variable_choice(
    name: &str,
    description: &str,
    values: &[Value],
    schemas: &mut SchemaStore,
) -> crate::codemodel::SchemaId {
    let choice_type = schemas.add(server_variable_string(name, description));
    let choices = values
        .iter()
        .map(|value| ChoiceValue {
            name: value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            value: value.clone(),
            description: None,
        })
        .collect();
    schemas.add(Schema::new(
        name,
        description,
        SchemaKind::Choice {
            choices,
            choice_type,
            sealed: true,
        },
    ))
}
