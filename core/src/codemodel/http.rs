#![deny(missing_docs)]

//! # HTTP Protocol Model
//!
//! Servers are registered once per code model and referenced from operations by
//! `ServerId`.

use crate::codemodel::schema::SchemaId;
use indexmap::IndexMap;
use serde::Serialize;

/// Index into `HttpModel::servers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServerId(usize);

impl ServerId {
    /// Index into the server list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A templated server variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerVariable {
    /// Variable name as used in the URL template.
    pub name: String,
    /// Documentation.
    pub description: String,
    /// `String`, or `Choice` for enumerated variables.
    pub schema: SchemaId,
    /// Default substitution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A server entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpServer {
    /// URL template.
    pub url: String,
    /// Documentation.
    pub description: String,
    /// Variables in declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

/// Model-wide HTTP protocol data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpModel {
    /// Append-only, deduplicated by URL.
    pub servers: Vec<HttpServer>,
}

impl HttpModel {
    /// The id of the server registered for `url`.
    pub fn find(&self, url: &str) -> Option<ServerId> {
        self.servers
            .iter()
            .position(|server| server.url == url)
            .map(ServerId)
    }

    /// Appends a server. Callers check `find` first.
    pub fn add(&mut self, server: HttpServer) -> ServerId {
        self.servers.push(server);
        ServerId(self.servers.len() - 1)
    }

    /// Looks a server up.
    pub fn get(&self, id: ServerId) -> Option<&HttpServer> {
        self.servers.get(id.0)
    }
}

/// Protocol blocks of the code model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Protocols {
    /// HTTP data.
    pub http: HttpModel,
}
