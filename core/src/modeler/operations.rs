//! # Document Walker
//!
//! Turns `paths` into operation groups: one operation per (path item, verb),
//! each path item and operation visited once per identity.

use super::schemas::part;
use super::Modeler;
use crate::codemodel::{
    HttpMethod, HttpOperation, ImplementationLocation, Operation, Parameter, ParameterLocation,
    Property, Request, RequestBody, SchemaId, SchemaKind, SerializationStyle,
};
use crate::diagnostics::{codes, Diagnostics};
use crate::error::{AppError, AppResult, ModelError, ModelResult};
use crate::modeler::interpret::{self, OperationIdentity};
use crate::oas::ref_utils::join_pointer;
use crate::oas::Resolved;
use indexmap::IndexMap;
use serde_json::Value;

/// Explicit `style`, else Swagger `collectionFormat`, else the location default.
fn serialization_style(parameter: &Value, location: ParameterLocation) -> SerializationStyle {
    let declared = parameter.get("style").and_then(Value::as_str);
    let legacy = parameter.get("collectionFormat").and_then(Value::as_str);
    match (declared, legacy) {
        (Some("simple"), _) => SerializationStyle::Simple,
        (Some("form"), _) => SerializationStyle::Form,
        (Some("label"), _) => SerializationStyle::Label,
        (Some("matrix"), _) => SerializationStyle::Matrix,
        (Some("spaceDelimited"), _) => SerializationStyle::SpaceDelimited,
        (Some("pipeDelimited"), _) => SerializationStyle::PipeDelimited,
        (Some("deepObject"), _) => SerializationStyle::DeepObject,
        (_, Some("ssv")) => SerializationStyle::SpaceDelimited,
        (_, Some("pipes")) => SerializationStyle::PipeDelimited,
        (_, Some("multi")) => SerializationStyle::Form,
        (_, Some("csv")) if location == ParameterLocation::Query => SerializationStyle::Form,
        _ => match location {
            ParameterLocation::Query | ParameterLocation::Cookie => SerializationStyle::Form,
            ParameterLocation::Path | ParameterLocation::Header => SerializationStyle::Simple,
            ParameterLocation::Body => SerializationStyle::Json,
        },
    }
}

/// Explicit `explode`, else `true` for form style or `collectionFormat: multi`.
fn explode(parameter: &Value, style: SerializationStyle) -> bool {
    match parameter.get("explode").and_then(Value::as_bool) {
        Some(explode) => explode,
        None => match parameter.get("collectionFormat").and_then(Value::as_str) {
            Some("multi") => true,
            Some(_) => false,
            None => style == SerializationStyle::Form,
        },
    }
}

impl<'a, D: Diagnostics> Modeler<'a, D> {
    pub(crate) fn process_paths(&mut self) -> AppResult<()> {
        let document = self.document;
        match document.get("#/paths") {
            None => return Ok(()),
            Some(Value::Object(_)) => {}
            Some(_) => return Err(AppError::Structure("'paths' is not a mapping".to_string())),
        }

        for (key, slot) in document.entries("#/paths") {
            let item = match document.resolve(&slot) {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(err) => {
                    self.reject(codes::UNRESOLVED_REFERENCE, err, &slot);
                    continue;
                }
            };
            if self.path_items.contains(item.id) {
                continue;
            }
            self.path_items.complete(item.id, ());

            for method in HttpMethod::ALL {
                let operation = match document.resolve_child(item.pointer, method.as_str()) {
                    Ok(Some(operation)) => operation,
                    Ok(None) => continue,
                    Err(err) => {
                        self.reject(codes::UNRESOLVED_REFERENCE, err, item.pointer);
                        continue;
                    }
                };
                self.process_operation(method, &key, item, operation);
            }
        }
        Ok(())
    }

    fn process_operation(
        &mut self,
        method: HttpMethod,
        key: &str,
        item: Resolved<'a>,
        operation: Resolved<'a>,
    ) {
        let mut seen = std::mem::take(&mut self.operations);
        let outcome = seen.memoize(Some(operation.id), || {
            self.build_operation(method, key, item, operation)
        });
        self.operations = seen;

        if let Some(Err(Some(err))) = outcome {
            tracing::debug!(%method, path = key, %err, "operation skipped");
        }
    }

    fn build_operation(
        &mut self,
        method: HttpMethod,
        key: &str,
        item: Resolved<'a>,
        operation: Resolved<'a>,
    ) -> ModelResult<()> {
        let value = operation.value;
        let identity = interpret::operation_identity(
            method,
            key,
            value,
            operation.pointer,
            self.options.operation_id_separator,
            &mut *self.diag,
        );
        if self
            .code_model
            .operation(&identity.group, &identity.member)
            .is_some()
        {
            return Err(self.duplicate(identity, operation.pointer));
        }
        let path = interpret::effective_path(item.value, value, key);
        tracing::debug!(%method, %path, group = %identity.group, member = %identity.member, "modeling operation");

        let (parameters, legacy_body) = self.build_parameters(item, operation);
        let request = match self.build_request(&identity, operation)? {
            Some(request) => Some(request),
            None => self.build_legacy_request(&identity, operation, legacy_body)?,
        };
        // Only operations that make it into a group register their servers.
        let servers = interpret::canonical_servers(
            value,
            item.value,
            self.document.root(),
            &mut self.code_model.protocol.http,
            &mut self.code_model.schemas,
        );

        let built = Operation {
            name: identity.member.clone(),
            description: interpret::description("MISSING-OPERATION-DESCRIPTION", value),
            summary: value
                .get("summary")
                .and_then(Value::as_str)
                .map(str::to_string),
            deprecated: interpret::deprecated(value),
            tags: interpret::string_list(value, "tags"),
            http: HttpOperation {
                method,
                path,
                servers,
            },
            parameters,
            request,
            extensions: interpret::extensions(value),
        };

        let group = self.code_model.operation_group(&identity.group);
        if group.add_operation(built).is_err() {
            return Err(self.duplicate(identity, operation.pointer));
        }
        Ok(())
    }

    fn duplicate(&mut self, identity: OperationIdentity, source: &str) -> ModelError {
        let err = ModelError::DuplicateOperation {
            group: identity.group,
            member: identity.member,
        };
        self.reject(codes::DUPLICATE_OPERATION, err, source)
    }

    /// Path-item parameters merged with the operation's own; the operation wins
    /// on the same `(name, in)`.
    ///
    /// Swagger 2.0 `body` and `formData` parameters are handed back unbuilt;
    /// they describe the request payload.
    fn build_parameters(
        &mut self,
        item: Resolved<'a>,
        operation: Resolved<'a>,
    ) -> (Vec<Parameter>, Vec<Resolved<'a>>) {
        let document = self.document;
        let mut merged: IndexMap<(String, String), Resolved<'a>> = IndexMap::new();

        for owner in [item, operation] {
            for slot in document.items(&join_pointer(owner.pointer, "parameters")) {
                let parameter = match document.resolve(&slot) {
                    Ok(Some(parameter)) => parameter,
                    Ok(None) => continue,
                    Err(err) => {
                        self.reject(codes::UNRESOLVED_REFERENCE, err, &slot);
                        continue;
                    }
                };
                let field = |key: &str| {
                    parameter
                        .value
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                merged.insert((field("name"), field("in")), parameter);
            }
        }

        let (legacy_body, regular): (Vec<_>, Vec<_>) =
            merged.into_values().partition(|parameter| {
                matches!(
                    parameter.value.get("in").and_then(Value::as_str),
                    Some("body" | "formData")
                )
            });
        let parameters = regular
            .into_iter()
            .filter_map(|parameter| self.build_parameter(parameter).ok())
            .collect();
        (parameters, legacy_body)
    }

    pub(crate) fn build_parameter(&mut self, parameter: Resolved<'a>) -> ModelResult<Parameter> {
        let value = parameter.value;
        let name = value.get("name").and_then(Value::as_str);
        let location = value
            .get("in")
            .and_then(Value::as_str)
            .and_then(ParameterLocation::parse);
        let (name, location) = match (name, location) {
            (Some(name), Some(location)) if !name.is_empty() => (name.to_string(), location),
            _ => {
                let err = ModelError::InvalidParameter(parameter.pointer.to_string());
                return Err(self.reject(codes::INVALID_PARAMETER, err, parameter.pointer));
            }
        };

        let schema = match self.parameter_schema_slot(parameter) {
            Some(slot) => self.classify_slot(&slot, &name)?,
            None => None,
        };
        let schema = match schema {
            Some(schema) => schema,
            None => {
                let err = ModelError::MissingSchema(name);
                return Err(self.reject(codes::MISSING_SCHEMA, err, parameter.pointer));
            }
        };

        let style = serialization_style(value, location);
        Ok(Parameter {
            description: interpret::description("MISSING-PARAMETER-DESCRIPTION", value),
            schema,
            location,
            style,
            explode: explode(value, style),
            required: location == ParameterLocation::Path
                || value
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            implementation: interpret::implementation_location(value),
            extensions: interpret::extensions(value),
            name,
        })
    }

    /// Where the schema of a parameter lives: `schema`, the single `content`
    /// entry, or (Swagger 2.0) the parameter itself when it carries a `type`.
    fn parameter_schema_slot(&self, parameter: Resolved<'a>) -> Option<String> {
        let value = parameter.value;
        if value.get("schema").is_some() {
            return Some(join_pointer(parameter.pointer, "schema"));
        }
        let content = self
            .document
            .entries(&join_pointer(parameter.pointer, "content"));
        if let Some((_, media)) = content.first() {
            return Some(join_pointer(media, "schema"));
        }
        if value.get("type").is_some() {
            return Some(parameter.pointer.to_string());
        }
        None
    }

    fn build_request(
        &mut self,
        identity: &OperationIdentity,
        operation: Resolved<'a>,
    ) -> ModelResult<Option<Request>> {
        let document = self.document;
        let body = match document.resolve_child(operation.pointer, "requestBody") {
            Ok(Some(body)) => body,
            Ok(None) => return Ok(None),
            Err(err) => {
                return Err(self.reject(codes::UNRESOLVED_REFERENCE, err, operation.pointer))
            }
        };

        let content = document.entries(&join_pointer(body.pointer, "content"));
        let (media_type, media) = match content.as_slice() {
            [] => return Ok(None),
            [single] => single.clone(),
            _ => {
                let err = ModelError::UnsupportedMultipleContent(format!(
                    "{}{}",
                    identity.group, identity.member
                ));
                return Err(self.reject(codes::MULTIPLE_CONTENT_TYPES, err, body.pointer));
            }
        };

        let fallback = format!("{}{}Body", identity.group, identity.member);
        let schema = match self.classify_slot(&join_pointer(&media, "schema"), &fallback)? {
            Some(schema) => schema,
            None => {
                let err = ModelError::MissingSchema(fallback);
                return Err(self.reject(codes::MISSING_SCHEMA, err, &media));
            }
        };

        if self.is_stream(schema) {
            return Ok(Some(Request {
                media_type,
                body: RequestBody::Stream(schema),
            }));
        }

        let value = body.value;
        let name = operation
            .value
            .get("x-ms-requestBody-name")
            .or_else(|| value.get("x-ms-requestBody-name"))
            .and_then(Value::as_str)
            .unwrap_or("body")
            .to_string();
        Ok(Some(Request {
            media_type,
            body: RequestBody::Parameter(Parameter {
                name,
                description: interpret::description("MISSING-BODY-DESCRIPTION", value),
                schema,
                location: ParameterLocation::Body,
                style: SerializationStyle::Json,
                explode: false,
                required: value
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                implementation: ImplementationLocation::Client,
                extensions: interpret::extensions(value),
            }),
        }))
    }

    /// The request of a Swagger 2.0 operation: its `body` parameter, else its
    /// `formData` fields. A single streamed field is a streaming request;
    /// other fields are gathered into a synthesized object.
    fn build_legacy_request(
        &mut self,
        identity: &OperationIdentity,
        operation: Resolved<'a>,
        legacy_body: Vec<Resolved<'a>>,
    ) -> ModelResult<Option<Request>> {
        if legacy_body.is_empty() {
            return Ok(None);
        }
        let consumes = interpret::string_list(operation.value, "consumes")
            .into_iter()
            .chain(interpret::string_list(self.document.root(), "consumes"))
            .next();

        let body = legacy_body
            .iter()
            .find(|parameter| parameter.value.get("in").and_then(Value::as_str) == Some("body"));
        if let Some(body) = body {
            let parameter = self.build_parameter(*body)?;
            let media_type = consumes.unwrap_or_else(|| "application/json".to_string());
            if self.is_stream(parameter.schema) {
                return Ok(Some(Request {
                    media_type,
                    body: RequestBody::Stream(parameter.schema),
                }));
            }
            return Ok(Some(Request {
                media_type,
                body: RequestBody::Parameter(parameter),
            }));
        }

        let fields = legacy_body
            .into_iter()
            .map(|parameter| self.build_parameter(parameter))
            .collect::<ModelResult<Vec<_>>>()?;
        let streamed = fields.iter().any(|field| self.is_stream(field.schema));
        let media_type = consumes.unwrap_or_else(|| {
            if streamed {
                "multipart/form-data".to_string()
            } else {
                "application/x-www-form-urlencoded".to_string()
            }
        });
        if let [field] = fields.as_slice() {
            if streamed {
                return Ok(Some(Request {
                    media_type,
                    body: RequestBody::Stream(field.schema),
                }));
            }
        }

        let required = fields.iter().any(|field| field.required);
        let properties = fields
            .into_iter()
            .map(|field| Property {
                serialized_name: field.name.clone(),
                name: field.name,
                description: field.description,
                schema: field.schema,
                required: field.required,
                read_only: false,
                nullable: false,
            })
            .collect();
        let form = part(
            format!("{}{}Body", identity.group, identity.member),
            SchemaKind::Object {
                properties,
                min_properties: None,
                max_properties: None,
            },
        );
        let schema = self.code_model.schemas.add(form);

        Ok(Some(Request {
            media_type,
            body: RequestBody::Parameter(Parameter {
                name: operation
                    .value
                    .get("x-ms-requestBody-name")
                    .and_then(Value::as_str)
                    .unwrap_or("body")
                    .to_string(),
                description: "MISSING-BODY-DESCRIPTION".to_string(),
                schema,
                location: ParameterLocation::Body,
                style: SerializationStyle::Form,
                explode: false,
                required,
                implementation: ImplementationLocation::Client,
                extensions: IndexMap::new(),
            }),
        }))
    }

    fn is_stream(&self, schema: SchemaId) -> bool {
        self.code_model
            .schemas
            .get(schema)
            .is_some_and(|schema| schema.is_stream())
    }
}
