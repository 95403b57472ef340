//! # Schema Classifier
//!
//! Maps a schema fragment to exactly one code-model schema.
//!
//! Classification is memoized per fragment identity: the fragment's `SchemaId` is
//! reserved before any child is visited, so a cycle back to the fragment gets the
//! reserved id instead of recursing. A fragment that fails is remembered as failed,
//! and its reserved slot is never filled.

use super::Modeler;
use crate::codemodel::{
    ByteArrayFormat, ChoiceValue, DateTimeFormat, NumericConstraints, Property, Schema, SchemaId,
    SchemaKind, StringConstraints,
};
use crate::diagnostics::{codes, Code, Diagnostics};
use crate::error::{ModelError, ModelResult};
use crate::modeler::cache::Entry;
use crate::modeler::interpret;
use crate::oas::normalization::{
    additional_properties, has_entries, has_items, infer_schema_type, is_flag_set,
    normalize_type, AdditionalProperties,
};
use crate::oas::ref_utils::join_pointer;
use crate::oas::{Format, JsonType, Resolved};
use serde_json::Value;

/// What a `(type, format)` pair turns into.
enum Shape {
    Primitive(SchemaKind),
    Array,
    Object,
    Unsupported,
}

/// The exhaustive `(type, format)` table.
fn shape(ty: JsonType, format: &Format, value: &Value) -> Shape {
    let string = || string_constraints(value);
    let numeric = || numeric_constraints(value);
    match (ty, format) {
        (JsonType::Array, Format::None) => Shape::Array,
        (JsonType::Array, _) => Shape::Unsupported,

        (JsonType::Boolean, Format::None) => Shape::Primitive(SchemaKind::Boolean),
        (JsonType::Boolean, _) => Shape::Unsupported,

        (JsonType::Integer, Format::None | Format::Int32) => Shape::Primitive(SchemaKind::Integer {
            precision: 32,
            constraints: numeric(),
        }),
        (JsonType::Integer, Format::Int64) => Shape::Primitive(SchemaKind::Integer {
            precision: 64,
            constraints: numeric(),
        }),
        (JsonType::Integer, Format::UnixTime) => Shape::Primitive(SchemaKind::UnixTime),
        (JsonType::Integer, _) => Shape::Unsupported,

        (JsonType::Number, Format::None | Format::Float) => Shape::Primitive(SchemaKind::Number {
            precision: 32,
            constraints: numeric(),
        }),
        (JsonType::Number, Format::Double) => Shape::Primitive(SchemaKind::Number {
            precision: 64,
            constraints: numeric(),
        }),
        (JsonType::Number, Format::Decimal) => Shape::Primitive(SchemaKind::Number {
            precision: 128,
            constraints: numeric(),
        }),
        (JsonType::Number, _) => Shape::Unsupported,

        (JsonType::String, Format::None) => Shape::Primitive(SchemaKind::String {
            constraints: string(),
        }),
        (JsonType::String, Format::Byte | Format::Certificate) => {
            Shape::Primitive(SchemaKind::ByteArray {
                format: ByteArrayFormat::Byte,
            })
        }
        (JsonType::String, Format::Base64Url) => Shape::Primitive(SchemaKind::ByteArray {
            format: ByteArrayFormat::Base64Url,
        }),
        (JsonType::String, Format::Binary) => Shape::Primitive(SchemaKind::Stream),
        (JsonType::String, Format::Char) => Shape::Primitive(SchemaKind::Char),
        (JsonType::String, Format::Date) => Shape::Primitive(SchemaKind::Date),
        (JsonType::String, Format::DateTime) => Shape::Primitive(SchemaKind::DateTime {
            format: DateTimeFormat::DateTime,
        }),
        (JsonType::String, Format::DateTimeRfc1123) => Shape::Primitive(SchemaKind::DateTime {
            format: DateTimeFormat::Rfc1123,
        }),
        (JsonType::String, Format::Duration) => Shape::Primitive(SchemaKind::Duration),
        (JsonType::String, Format::Uuid) => Shape::Primitive(SchemaKind::Uuid),
        (JsonType::String, Format::Uri) => Shape::Primitive(SchemaKind::Uri {
            constraints: string(),
        }),
        (JsonType::String, Format::Password) => Shape::Primitive(SchemaKind::Credential {
            constraints: string(),
        }),
        (JsonType::String, Format::OData) => Shape::Primitive(SchemaKind::OData),
        (JsonType::String, _) => Shape::Unsupported,

        (JsonType::Object, _) => Shape::Object,
    }
}

fn unsigned(value: &Value, key: &str) -> Option<u64> {
    value.get(key).and_then(Value::as_u64)
}

fn string_constraints(value: &Value) -> StringConstraints {
    StringConstraints {
        min_length: unsigned(value, "minLength"),
        max_length: unsigned(value, "maxLength"),
        pattern: value
            .get("pattern")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Reads range constraints. OAS 3.1 numeric `exclusiveMinimum`/`exclusiveMaximum`
/// replace the bound and set the flag.
fn numeric_constraints(value: &Value) -> NumericConstraints {
    let mut constraints = NumericConstraints {
        minimum: value.get("minimum").and_then(Value::as_f64),
        maximum: value.get("maximum").and_then(Value::as_f64),
        multiple_of: value.get("multipleOf").and_then(Value::as_f64),
        ..NumericConstraints::default()
    };
    match value.get("exclusiveMinimum") {
        Some(Value::Bool(flag)) => constraints.exclusive_minimum = *flag,
        Some(Value::Number(bound)) => {
            constraints.minimum = bound.as_f64();
            constraints.exclusive_minimum = true;
        }
        _ => {}
    }
    match value.get("exclusiveMaximum") {
        Some(Value::Bool(flag)) => constraints.exclusive_maximum = *flag,
        Some(Value::Number(bound)) => {
            constraints.maximum = bound.as_f64();
            constraints.exclusive_maximum = true;
        }
        _ => {}
    }
    constraints
}

/// `MISSING-SCHEMA-DESCRIPTION-<KIND>`
fn missing_description(kind: &SchemaKind) -> String {
    let label = match kind {
        SchemaKind::Any => "ANY",
        SchemaKind::Boolean => "BOOLEAN",
        SchemaKind::Integer { .. } => "INTEGER",
        SchemaKind::Number { .. } => "NUMBER",
        SchemaKind::String { .. } => "STRING",
        SchemaKind::Credential { .. } => "CREDENTIAL",
        SchemaKind::Uri { .. } => "URI",
        SchemaKind::Uuid => "UUID",
        SchemaKind::Duration => "DURATION",
        SchemaKind::DateTime { .. } => "DATETIME",
        SchemaKind::Date => "DATE",
        SchemaKind::Char => "CHAR",
        SchemaKind::ByteArray { .. } => "BYTEARRAY",
        SchemaKind::UnixTime => "UNIXTIME",
        SchemaKind::Array { .. } => "ARRAYSCHEMA",
        SchemaKind::Object { .. } => "OBJECTSCHEMA",
        SchemaKind::Dictionary { .. } => "DICTIONARYSCHEMA",
        SchemaKind::And { .. } => "ANDSCHEMA",
        SchemaKind::Or { .. } => "ORSCHEMA",
        SchemaKind::Xor { .. } => "XORSCHEMA",
        SchemaKind::Choice { .. } => "CHOICE",
        SchemaKind::OData => "ODATAQUERY",
        SchemaKind::Stream => "STREAM",
    };
    format!("MISSING-SCHEMA-DESCRIPTION-{}", label)
}

/// Builds a schema carrying the fragment's metadata.
fn decorate(name: &str, value: &Value, kind: SchemaKind) -> Schema {
    let description = interpret::description(&missing_description(&kind), value);
    let mut schema = Schema::new(name, description, kind);
    schema.summary = value
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);
    schema.deprecated = interpret::deprecated(value);
    schema.example = interpret::example(value);
    schema.default_value = value.get("default").cloned();
    schema.external_docs = interpret::external_docs(value);
    schema.xml = interpret::xml(value);
    schema.extensions = interpret::extensions(value);
    schema
}

/// A synthesized part of a decomposed object, stored separately when the
/// object needs an `And` wrapper.
pub(super) fn part(name: String, kind: SchemaKind) -> Schema {
    let description = missing_description(&kind);
    Schema::new(name, description, kind)
}

impl<'a, D: Diagnostics> Modeler<'a, D> {
    /// Reports `err` as an error at `source` and hands it back.
    pub(crate) fn reject(&mut self, code: Code, err: ModelError, source: &str) -> ModelError {
        self.diag.error(code, err.to_string(), source);
        err
    }

    /// Resolves the schema slot at `pointer` and classifies it.
    ///
    /// `Ok(None)` when nothing is declared there. The declared name of a
    /// reference target wins over `fallback`.
    pub(crate) fn classify_slot(
        &mut self,
        pointer: &str,
        fallback: &str,
    ) -> ModelResult<Option<SchemaId>> {
        let document = self.document;
        match document.resolve(pointer) {
            Ok(Some(fragment)) => {
                let name = fragment.name.unwrap_or(fallback).to_string();
                self.classify(&name, fragment).map(Some)
            }
            Ok(None) => Ok(None),
            Err(err) => Err(self.reject(codes::UNRESOLVED_REFERENCE, err, pointer)),
        }
    }

    /// Classifies a resolved schema fragment, at most once per identity.
    pub fn classify(&mut self, name: &str, fragment: Resolved<'a>) -> ModelResult<SchemaId> {
        match self.schemas.get(fragment.id) {
            Some(Entry::Done(id)) | Some(Entry::InProgress(id)) => return Ok(id),
            Some(Entry::Failed) => return Err(ModelError::PreviouslyRejected(name.to_string())),
            None => {}
        }

        let slot = self.code_model.schemas.reserve();
        self.schemas.begin(fragment.id, slot);
        tracing::debug!(name, pointer = fragment.pointer, "classifying schema");

        match self.build_schema(name, fragment) {
            Ok(schema) => {
                self.code_model.schemas.fill(slot, schema);
                self.schemas.complete(fragment.id, slot);
                Ok(slot)
            }
            Err(err) => {
                self.schemas.fail(fragment.id);
                let discarded = self.code_model.schemas.discard_dependents(slot);
                if !discarded.is_empty() {
                    tracing::debug!(
                        name,
                        count = discarded.len(),
                        "discarding schemas that reach a failed one"
                    );
                    self.schemas.fail_values(&discarded);
                }
                Err(err)
            }
        }
    }

    /// The shared `Any` schema, created on first use.
    pub(crate) fn any_schema(&mut self) -> SchemaId {
        match self.any {
            Some(id) => id,
            None => {
                let id = self
                    .code_model
                    .schemas
                    .add(Schema::new("any", "Any value", SchemaKind::Any));
                self.any = Some(id);
                id
            }
        }
    }

    fn build_schema(&mut self, name: &str, fragment: Resolved<'a>) -> ModelResult<Schema> {
        let value = fragment.value;
        let source = fragment.pointer;

        if value.get("enum").is_some() || value.get("x-ms-enum").is_some() {
            return self.build_choice(name, fragment);
        }

        let info = normalize_type(value);
        if info.legacy_file {
            self.diag.warning(
                codes::TYPE_FILE_NOT_VALID,
                "The schema type 'file' is not a OAI standard type. This has been auto-corrected to 'type:string' and 'format:binary'".to_string(),
                source,
            );
        }

        let ty = match info.ty {
            Some(ty) => ty,
            None => self.infer_type(name, value, source)?,
        };
        let json_type = match JsonType::parse(&ty) {
            Some(json_type) => json_type,
            None => {
                let err = ModelError::UnknownType {
                    name: name.to_string(),
                    ty,
                };
                return Err(self.reject(codes::UNKNOWN_SCHEMA_TYPE, err, source));
            }
        };
        let format = Format::parse(info.format.as_deref());

        match shape(json_type, &format, value) {
            Shape::Primitive(kind) => Ok(decorate(name, value, kind)),
            Shape::Array => self.build_array(name, fragment),
            Shape::Object => self.build_object(name, fragment),
            Shape::Unsupported => {
                let err = ModelError::UnknownFormat {
                    name: name.to_string(),
                    ty: json_type.to_string(),
                    format: format.to_string(),
                };
                Err(self.reject(codes::UNKNOWN_FORMAT, err, source))
            }
        }
    }

    /// Guesses `object` for a type-less fragment, warning once.
    fn infer_type(&mut self, name: &str, value: &Value, source: &str) -> ModelResult<String> {
        let message = if value.get("properties").is_some() {
            format!("The schema '{}' with an undefined type and declared properties is a bit ambiguous. This has been auto-corrected to 'type:object'", name)
        } else if additional_properties(value) != AdditionalProperties::Closed {
            format!("The schema '{}' with an undefined type and additionalProperties is a bit ambiguous. This has been auto-corrected to 'type:object'", name)
        } else if ["allOf", "anyOf", "oneOf"]
            .iter()
            .any(|key| value.get(*key).is_some())
        {
            format!("The schema '{}' with an undefined type and 'allOf'/'anyOf'/'oneOf' is a bit ambiguous. This has been auto-corrected to 'type:object'", name)
        } else {
            let err = ModelError::UnclassifiableFragment(name.to_string());
            return Err(self.reject(codes::MISSING_TYPE, err, source));
        };
        self.diag.warning(codes::MISSING_TYPE, message, source);
        Ok(JsonType::Object.to_string())
    }

    fn build_array(&mut self, name: &str, fragment: Resolved<'a>) -> ModelResult<Schema> {
        let items = join_pointer(fragment.pointer, "items");
        let element = match self.classify_slot(&items, &format!("{}.items", name))? {
            Some(element) => element,
            None => {
                let err = ModelError::MissingArrayItems(name.to_string());
                return Err(self.reject(
                    codes::MISSING_ARRAY_ELEMENT_TYPE,
                    err,
                    fragment.pointer,
                ));
            }
        };
        let value = fragment.value;
        Ok(decorate(
            name,
            value,
            SchemaKind::Array {
                element,
                min_items: unsigned(value, "minItems"),
                max_items: unsigned(value, "maxItems"),
                unique_items: is_flag_set(value, "uniqueItems"),
            },
        ))
    }

    fn build_object(&mut self, name: &str, fragment: Resolved<'a>) -> ModelResult<Schema> {
        let value = fragment.value;
        let pointer = fragment.pointer;
        let has_properties = has_entries(value, "properties");

        if has_items(value, "oneOf") && has_properties {
            let err = ModelError::AmbiguousOneOf(name.to_string());
            return Err(self.reject(codes::AMBIGUOUS_ONE_OF, err, pointer));
        }

        let parents = self.classify_members(name, pointer, "allOf")?;
        let mut parts = Vec::new();

        if has_properties {
            let properties = self.build_properties(name, fragment)?;
            parts.push(part(
                format!("{}.properties", name),
                SchemaKind::Object {
                    properties,
                    min_properties: unsigned(value, "minProperties"),
                    max_properties: unsigned(value, "maxProperties"),
                },
            ));
        }

        let dictionary_value = match additional_properties(value) {
            AdditionalProperties::Closed => None,
            AdditionalProperties::Any => Some(self.any_schema()),
            AdditionalProperties::Schema => {
                let slot = join_pointer(pointer, "additionalProperties");
                self.classify_slot(&slot, &format!("{}.additionalProperties", name))?
            }
        };
        if let Some(dictionary_value) = dictionary_value {
            parts.push(part(
                format!("{}.additionalProperties", name),
                SchemaKind::Dictionary {
                    value: dictionary_value,
                },
            ));
        }

        if has_items(value, "anyOf") {
            let members = self.classify_members(name, pointer, "anyOf")?;
            parts.push(part(format!("{}.anyOf", name), SchemaKind::Or { members }));
        }
        if has_items(value, "oneOf") {
            let members = self.classify_members(name, pointer, "oneOf")?;
            parts.push(part(format!("{}.oneOf", name), SchemaKind::Xor { members }));
        }

        if parents.is_empty() && parts.len() <= 1 {
            let kind = match parts.pop() {
                Some(single) => single.kind,
                None => {
                    self.diag.warning(
                        codes::EMPTY_OBJECT,
                        format!("The schema '{}' declares no properties and no members", name),
                        pointer,
                    );
                    SchemaKind::Object {
                        properties: Vec::new(),
                        min_properties: None,
                        max_properties: None,
                    }
                }
            };
            return Ok(decorate(name, value, kind));
        }

        let mut members = parents;
        for schema in parts {
            members.push(self.code_model.schemas.add(schema));
        }
        Ok(decorate(name, value, SchemaKind::And { members }))
    }

    /// Classifies every entry of the `allOf`/`anyOf`/`oneOf` sequence at `key`.
    fn classify_members(
        &mut self,
        name: &str,
        pointer: &str,
        key: &str,
    ) -> ModelResult<Vec<SchemaId>> {
        let document = self.document;
        let mut members = Vec::new();
        for (i, item) in document
            .items(&join_pointer(pointer, key))
            .iter()
            .enumerate()
        {
            if let Some(member) = self.classify_slot(item, &format!("{}.{}.{}", name, key, i))? {
                members.push(member);
            }
        }
        Ok(members)
    }

    fn build_properties(&mut self, name: &str, fragment: Resolved<'a>) -> ModelResult<Vec<Property>> {
        let document = self.document;
        let required = interpret::string_list(fragment.value, "required");
        let mut properties = Vec::new();

        for (key, slot) in document.entries(&join_pointer(fragment.pointer, "properties")) {
            let target = match document.resolve(&slot) {
                Ok(Some(target)) => target,
                Ok(None) => continue,
                Err(err) => return Err(self.reject(codes::UNRESOLVED_REFERENCE, err, &slot)),
            };
            let property_name = target
                .name
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}.{}", name, key));
            let schema = self.classify(&property_name, target)?;

            // Siblings of `$ref` (OAS 3.1) apply to the property, not the target.
            let declared = document.get(&slot).unwrap_or(target.value);
            let flag =
                |keyword: &str| is_flag_set(declared, keyword) || is_flag_set(target.value, keyword);
            let description = match interpret::description("", declared) {
                own if own.is_empty() => interpret::description("", target.value),
                own => own,
            };

            properties.push(Property {
                serialized_name: key.clone(),
                name: key.clone(),
                description,
                schema,
                required: required.contains(&key),
                read_only: flag("readOnly"),
                nullable: flag("nullable")
                    || flag("x-nullable")
                    || normalize_type(target.value).nullable,
            });
        }
        Ok(properties)
    }

    fn build_choice(&mut self, name: &str, fragment: Resolved<'a>) -> ModelResult<Schema> {
        let value = fragment.value;
        let ms_enum = value.get("x-ms-enum");

        let choices: Vec<ChoiceValue> =
            match ms_enum.and_then(|e| e.get("values")).and_then(Value::as_array) {
                Some(values) => values
                    .iter()
                    .filter_map(|entry| {
                        let literal = entry.get("value")?.clone();
                        Some(ChoiceValue {
                            name: entry
                                .get("name")
                                .and_then(Value::as_str)
                                .map(str::to_string)
                                .unwrap_or_else(|| choice_label(&literal)),
                            value: literal,
                            description: entry
                                .get("description")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                        })
                    })
                    .collect(),
                None => value
                    .get("enum")
                    .and_then(Value::as_array)
                    .map(|values| {
                        values
                            .iter()
                            .filter(|literal| !literal.is_null())
                            .map(|literal| ChoiceValue {
                                name: choice_label(literal),
                                value: literal.clone(),
                                description: None,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            };

        let choice_name = ms_enum
            .and_then(|e| e.get("name"))
            .and_then(Value::as_str)
            .unwrap_or(name)
            .to_string();
        let sealed = !ms_enum
            .and_then(|e| e.get("modelAsString"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let choice_type = self.choice_type(&choice_name, value, &choices);
        Ok(decorate(
            &choice_name,
            value,
            SchemaKind::Choice {
                choices,
                choice_type,
                sealed,
            },
        ))
    }

    /// A fresh primitive for the value type of a choice. Not memoized: the
    /// fragment's identity already belongs to the choice itself.
    fn choice_type(&mut self, name: &str, value: &Value, choices: &[ChoiceValue]) -> SchemaId {
        let info = normalize_type(value);
        let ty = info.ty.or_else(|| {
            choices
                .iter()
                .find_map(|choice| infer_schema_type(&choice.value))
                .map(str::to_string)
        });
        let format = Format::parse(info.format.as_deref());
        let kind = ty
            .as_deref()
            .and_then(JsonType::parse)
            .map(|json_type| shape(json_type, &format, value));

        match kind {
            Some(Shape::Primitive(kind)) => {
                let description = missing_description(&kind);
                self.code_model
                    .schemas
                    .add(Schema::new(format!("{}.choiceType", name), description, kind))
            }
            _ => self.any_schema(),
        }
    }
}

fn choice_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::codemodel::{SchemaKind, SchemaStore};
    use crate::config::ModelerOptions;
    use crate::diagnostics::{codes, Collector};
    use crate::modeler::Modeler;
    use crate::oas::Document;

    fn classify_component(yaml: &str, name: &str) -> (SchemaStore, Collector, Option<usize>) {
        let doc = Document::parse(yaml).unwrap();
        let mut diag = Collector::new();
        let (store, id) = {
            let mut modeler = Modeler::new(&doc, ModelerOptions::default(), &mut diag);
            let pointer = format!("#/components/schemas/{}", name);
            let id = modeler.classify_slot(&pointer, name).ok().flatten();
            (modeler.into_code_model().schemas, id.map(|id| id.index()))
        };
        (store, diag, id)
    }

    fn kind_of(store: &SchemaStore, name: &str) -> SchemaKind {
        store.find(name).unwrap().1.kind.clone()
    }

    #[test]
    fn test_primitive_table() {
        let yaml = r#"
components:
  schemas:
    I: {type: integer}
    L: {type: integer, format: int64}
    N: {type: number}
    D: {type: number, format: double}
    M: {type: number, format: decimal}
    T: {type: string, format: date-time-rfc1123}
    P: {type: string, format: password, minLength: 8}
    U: {type: string, format: url}
"#;
        let doc = Document::parse(yaml).unwrap();
        let mut diag = Collector::new();
        let mut modeler = Modeler::new(&doc, ModelerOptions::default(), &mut diag);
        for name in ["I", "L", "N", "D", "M", "T", "P", "U"] {
            modeler
                .classify_slot(&format!("#/components/schemas/{}", name), name)
                .unwrap();
        }
        let store = modeler.into_code_model().schemas;

        assert!(matches!(kind_of(&store, "I"), SchemaKind::Integer { precision: 32, .. }));
        assert!(matches!(kind_of(&store, "L"), SchemaKind::Integer { precision: 64, .. }));
        assert!(matches!(kind_of(&store, "N"), SchemaKind::Number { precision: 32, .. }));
        assert!(matches!(kind_of(&store, "D"), SchemaKind::Number { precision: 64, .. }));
        assert!(matches!(kind_of(&store, "M"), SchemaKind::Number { precision: 128, .. }));
        assert!(matches!(kind_of(&store, "T"), SchemaKind::DateTime { .. }));
        match kind_of(&store, "P") {
            SchemaKind::Credential { constraints } => assert_eq!(constraints.min_length, Some(8)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(kind_of(&store, "U"), SchemaKind::Uri { .. }));
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let yaml = "components:\n  schemas:\n    Size: {type: integer, format: int128}\n";
        let (store, diag, id) = classify_component(yaml, "Size");
        assert!(id.is_none());
        assert!(store.is_empty());
        assert!(diag.diagnostics()[0].has_code(codes::UNKNOWN_FORMAT));
    }

    #[test]
    fn test_exclusive_bounds_from_numbers() {
        let yaml = "components:\n  schemas:\n    Pct: {type: number, exclusiveMinimum: 0, maximum: 100}\n";
        let (store, _, _) = classify_component(yaml, "Pct");
        match kind_of(&store, "Pct") {
            SchemaKind::Number { constraints, .. } => {
                assert_eq!(constraints.minimum, Some(0.0));
                assert!(constraints.exclusive_minimum);
                assert_eq!(constraints.maximum, Some(100.0));
                assert!(!constraints.exclusive_maximum);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_metadata_is_copied() {
        let yaml = r#"
components:
  schemas:
    Name:
      type: string
      title: The name
      default: rex
      example: fido
      deprecated: true
      x-ms-client-name: PetName
"#;
        let (store, _, _) = classify_component(yaml, "Name");
        let (_, schema) = store.find("Name").unwrap();
        assert_eq!(schema.description, "The name");
        assert_eq!(schema.summary.as_deref(), Some("The name"));
        assert_eq!(schema.default_value, Some("rex".into()));
        assert_eq!(schema.example, Some("fido".into()));
        assert!(schema.deprecated);
        assert!(schema.extensions.contains_key("x-ms-client-name"));
    }

    #[test]
    fn test_missing_description_default() {
        let yaml = "components:\n  schemas:\n    Flag: {type: boolean}\n";
        let (store, _, _) = classify_component(yaml, "Flag");
        assert_eq!(
            store.find("Flag").unwrap().1.description,
            "MISSING-SCHEMA-DESCRIPTION-BOOLEAN"
        );
    }

    #[test]
    fn test_x_ms_enum_overrides() {
        let yaml = r#"
components:
  schemas:
    Color:
      type: string
      enum: [red, green]
      x-ms-enum:
        name: PaintColor
        modelAsString: true
        values:
          - {value: red, name: Red, description: Warm}
          - {value: green, name: Green}
"#;
        let (store, _, _) = classify_component(yaml, "Color");
        let (_, schema) = store.find("PaintColor").unwrap();
        match &schema.kind {
            SchemaKind::Choice {
                choices,
                choice_type,
                sealed,
            } => {
                assert!(!sealed);
                assert_eq!(choices[0].name, "Red");
                assert_eq!(choices[0].description.as_deref(), Some("Warm"));
                assert!(matches!(
                    store.get(*choice_type).unwrap().kind,
                    SchemaKind::String { .. }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_enum_type_inferred_from_values() {
        let yaml = "components:\n  schemas:\n    Level:\n      enum: [1, 2, 3]\n";
        let (store, diag, _) = classify_component(yaml, "Level");
        assert_eq!(diag.diagnostics().len(), 0);
        match kind_of(&store, "Level") {
            SchemaKind::Choice {
                choice_type,
                sealed,
                ..
            } => {
                assert!(sealed);
                assert!(matches!(
                    store.get(choice_type).unwrap().kind,
                    SchemaKind::Integer { .. }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_one_of_with_properties_is_rejected() {
        let yaml = r#"
components:
  schemas:
    Shape:
      type: object
      properties:
        kind: {type: string}
      oneOf:
        - {type: object, properties: {r: {type: number}}}
"#;
        let (_, diag, id) = classify_component(yaml, "Shape");
        assert!(id.is_none());
        assert!(diag.diagnostics()[0].has_code(codes::AMBIGUOUS_ONE_OF));
    }

    #[test]
    fn test_all_of_builds_and_over_parents() {
        let yaml = r#"
components:
  schemas:
    Base:
      type: object
      properties:
        id: {type: string}
    Derived:
      allOf:
        - $ref: '#/components/schemas/Base'
      properties:
        extra: {type: integer}
"#;
        let (store, diag, _) = classify_component(yaml, "Derived");
        assert_eq!(diag.warnings().count(), 1);
        let (_, derived) = store.find("Derived").unwrap();
        let members = derived.members();
        assert_eq!(members.len(), 2);
        assert_eq!(store.get(members[0]).unwrap().name, "Base");
        assert_eq!(store.get(members[1]).unwrap().properties()[0].name, "extra");
    }

    #[test]
    fn test_any_of_alone_is_an_or() {
        let yaml = r#"
components:
  schemas:
    Id:
      type: object
      anyOf:
        - {type: string}
        - {type: integer}
"#;
        let (store, _, _) = classify_component(yaml, "Id");
        match kind_of(&store, "Id") {
            SchemaKind::Or { members } => assert_eq!(members.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_object_warns() {
        let yaml = "components:\n  schemas:\n    Blob: {type: object}\n";
        let (store, diag, _) = classify_component(yaml, "Blob");
        assert!(store.find("Blob").unwrap().1.properties().is_empty());
        assert!(diag.diagnostics()[0].has_code(codes::EMPTY_OBJECT));
    }

    #[test]
    fn test_untyped_fragment_is_unclassifiable() {
        let yaml = "components:\n  schemas:\n    Mystery: {description: nothing to go on}\n";
        let (_, diag, id) = classify_component(yaml, "Mystery");
        assert!(id.is_none());
        assert!(diag.has_errors());
    }

    #[test]
    fn test_property_flags() {
        let yaml = r#"
components:
  schemas:
    Pet:
      type: object
      required: [name]
      properties:
        name: {type: string}
        id: {type: integer, readOnly: true}
        tag: {type: [string, "null"]}
"#;
        let (store, _, _) = classify_component(yaml, "Pet");
        let (_, pet) = store.find("Pet").unwrap();
        let props = pet.properties();
        assert_eq!(props.len(), 3);
        assert!(props[0].required);
        assert!(!props[1].required);
        assert!(props[1].read_only);
        assert!(props[2].nullable);
        assert_eq!(store.get(props[0].schema).unwrap().name, "Pet.name");
    }
}
