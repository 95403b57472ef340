#![deny(missing_docs)]

//! # Code Model
//!
//! The normalized, reference-free output of a modeling run.
//!
//! - **schema**: schema kinds and the `SchemaStore` arena.
//! - **operation**: operations, parameters, requests and groups.
//! - **http**: the deduplicated server list.

pub mod http;
pub mod operation;
pub mod schema;

pub use http::{HttpModel, HttpServer, Protocols, ServerId, ServerVariable};
pub use operation::{
    HttpMethod, HttpOperation, ImplementationLocation, Operation, OperationGroup, Parameter,
    ParameterLocation, Request, RequestBody, SerializationStyle,
};
pub use schema::{
    ByteArrayFormat, ChoiceValue, DateTimeFormat, NumericConstraints, Property, Schema,
    SchemaId, SchemaKind, SchemaStore, StringConstraints,
};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use utoipa::openapi::Info;

/// The code model handed to source generators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeModel {
    /// Document metadata.
    pub info: Info,
    /// Document-level `x-` extensions.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
    /// Every classified schema.
    pub schemas: SchemaStore,
    /// Protocol data.
    pub protocol: Protocols,
    /// Operation groups by name, in first-seen order.
    pub operation_groups: IndexMap<String, OperationGroup>,
}

impl CodeModel {
    /// Creates an empty model.
    pub fn new(info: Info) -> Self {
        Self {
            info,
            extensions: IndexMap::new(),
            schemas: SchemaStore::new(),
            protocol: Protocols::default(),
            operation_groups: IndexMap::new(),
        }
    }

    /// Looks a group up, creating it on first use.
    pub fn operation_group(&mut self, name: &str) -> &mut OperationGroup {
        self.operation_groups
            .entry(name.to_string())
            .or_insert_with(|| OperationGroup::new(name))
    }

    /// The operation `member` of `group`.
    pub fn operation(&self, group: &str, member: &str) -> Option<&Operation> {
        self.operation_groups.get(group)?.get(member)
    }

    /// Every operation, group by group.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operation_groups
            .values()
            .flat_map(|group| group.operations.iter())
    }

    /// Shorthand for `self.schemas.get(id)`.
    pub fn schema(&self, id: SchemaId) -> Option<&Schema> {
        self.schemas.get(id)
    }

    /// The servers of an operation, resolved.
    pub fn servers_of<'a>(
        &'a self,
        operation: &'a Operation,
    ) -> impl Iterator<Item = &'a HttpServer> + 'a {
        operation
            .http
            .servers
            .iter()
            .filter_map(|id| self.protocol.http.get(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codemodel::operation::HttpOperation;

    fn operation(name: &str) -> Operation {
        Operation {
            name: name.to_string(),
            description: String::new(),
            summary: None,
            deprecated: false,
            tags: Vec::new(),
            http: HttpOperation {
                method: HttpMethod::Get,
                path: "/".to_string(),
                servers: Vec::new(),
            },
            parameters: Vec::new(),
            request: None,
            extensions: IndexMap::new(),
        }
    }

    #[test]
    fn test_operation_group_lookup_or_create() {
        let mut model = CodeModel::new(Info::new("T", "1"));
        model
            .operation_group("Widgets")
            .add_operation(operation("List"))
            .unwrap();
        model
            .operation_group("Widgets")
            .add_operation(operation("Get"))
            .unwrap();

        assert_eq!(model.operation_groups.len(), 1);
        assert_eq!(model.operations().count(), 2);
        assert!(model.operation("Widgets", "Get").is_some());
    }

    #[test]
    fn test_duplicate_member_is_rejected() {
        let mut group = OperationGroup::new("Widgets");
        group.add_operation(operation("List")).unwrap();
        let rejected = group.add_operation(operation("List")).unwrap_err();
        assert_eq!(rejected.name, "List");
        assert_eq!(group.operations.len(), 1);
    }
}
