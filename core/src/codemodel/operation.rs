#![deny(missing_docs)]

//! # Code Model Operations
//!
//! Operations, their parameters and request descriptions, grouped by the
//! group part of their identity.

use crate::codemodel::http::ServerId;
use crate::codemodel::schema::SchemaId;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The HTTP verbs a path item can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// DELETE
    Delete,
    /// GET
    Get,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
    /// PATCH
    Patch,
    /// POST
    Post,
    /// PUT
    Put,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Every verb, in walk order.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Delete,
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Patch,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Trace,
    ];

    /// The path-item key (`get`, `post`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Delete => "delete",
            HttpMethod::Get => "get",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Patch => "patch",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// URL path segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// Request body.
    Body,
}

impl ParameterLocation {
    /// Parses the `in` keyword.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            "body" | "formData" => Some(Self::Body),
            _ => None,
        }
    }
}

/// How a parameter value is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SerializationStyle {
    /// `simple`
    Simple,
    /// `form`
    Form,
    /// `label`
    Label,
    /// `matrix`
    Matrix,
    /// `spaceDelimited`
    SpaceDelimited,
    /// `pipeDelimited`
    PipeDelimited,
    /// `deepObject`
    DeepObject,
    /// Structured body encoding.
    Json,
}

/// Who supplies a parameter value in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplementationLocation {
    /// Set once on the client.
    Client,
    /// Passed to each method call.
    Method,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Wire name.
    pub name: String,
    /// Documentation.
    pub description: String,
    /// Value schema.
    pub schema: SchemaId,
    /// Where it travels.
    pub location: ParameterLocation,
    /// Serialization style.
    pub style: SerializationStyle,
    /// Arrays/objects are spread into separate values.
    pub explode: bool,
    /// Must be supplied.
    pub required: bool,
    /// Client or method level.
    pub implementation: ImplementationLocation,
    /// `x-` extension properties.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
}

/// The payload of a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestBody {
    /// A typed body, passed as a parameter.
    Parameter(Parameter),
    /// An opaque byte stream.
    Stream(SchemaId),
}

/// Request description of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// The single media type declared by the body.
    pub media_type: String,
    /// Typed or streaming payload.
    pub body: RequestBody,
}

impl Request {
    /// True for streaming bodies.
    pub fn is_stream(&self) -> bool {
        matches!(self.body, RequestBody::Stream(_))
    }

    /// The body parameter of a typed request.
    pub fn parameter(&self) -> Option<&Parameter> {
        match &self.body {
            RequestBody::Parameter(parameter) => Some(parameter),
            RequestBody::Stream(_) => None,
        }
    }
}

/// HTTP metadata of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpOperation {
    /// Verb.
    pub method: HttpMethod,
    /// Effective path template.
    pub path: String,
    /// Servers, as indices into `CodeModel::protocol.http.servers`.
    pub servers: Vec<ServerId>,
}

/// A modeled operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Member name inside the group.
    pub name: String,
    /// Documentation.
    pub description: String,
    /// Short summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Marked deprecated.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    /// Declared tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// HTTP metadata.
    pub http: HttpOperation,
    /// Non-body parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Request payload, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,
    /// `x-` extension properties.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
}

impl Operation {
    /// The parameter named `name` (body parameter included).
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.all_parameters().find(|p| p.name == name)
    }

    /// Declared parameters followed by the body parameter.
    pub fn all_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .chain(self.request.as_ref().and_then(Request::parameter))
    }
}

/// Operations sharing a group name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationGroup {
    /// Group name (`""` for ungrouped operations).
    pub name: String,
    /// Operations in walk order.
    pub operations: Vec<Operation>,
}

impl OperationGroup {
    /// Creates an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// The operation named `member`.
    pub fn get(&self, member: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == member)
    }

    /// Adds an operation unless its name is already taken; the rejected
    /// operation is handed back.
    pub fn add_operation(&mut self, operation: Operation) -> Result<(), Operation> {
        if self.get(&operation.name).is_some() {
            return Err(operation);
        }
        self.operations.push(operation);
        Ok(())
    }
}
