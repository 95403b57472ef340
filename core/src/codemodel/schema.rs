#![deny(missing_docs)]

//! # Code Model Schemas
//!
//! The closed set of schema kinds a source generator has to handle, plus the
//! arena (`SchemaStore`) that owns them. Schemas refer to each other by
//! `SchemaId`, so self-referential models are plain index cycles.

use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;
use utoipa::openapi::external_docs::ExternalDocs;
use utoipa::openapi::xml::Xml;

/// Index of a schema in the `SchemaStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SchemaId(usize);

impl SchemaId {
    /// Arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Numeric range constraints shared by integers and numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericConstraints {
    /// Lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// The lower bound itself is excluded.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_minimum: bool,
    /// The upper bound itself is excluded.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_maximum: bool,
    /// Values must be a multiple of this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
}

/// Length and pattern constraints for string-like schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringConstraints {
    /// Minimum length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// ECMA regular expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Wire profile of a date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateTimeFormat {
    /// RFC 3339 `date-time`.
    #[serde(rename = "date-time")]
    DateTime,
    /// RFC 1123 `date-time-rfc1123`.
    #[serde(rename = "date-time-rfc1123")]
    Rfc1123,
}

/// Wire encoding of a byte array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteArrayFormat {
    /// Standard base64.
    Byte,
    /// URL-safe base64.
    Base64Url,
}

/// One allowed value of a `Choice`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceValue {
    /// Display name of the value.
    pub name: String,
    /// The literal value.
    pub value: Value,
    /// Optional documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A member of an `Object` schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// The wire name.
    pub serialized_name: String,
    /// Name for emitters (the wire name unless renamed).
    pub name: String,
    /// Documentation.
    pub description: String,
    /// Schema of the value.
    pub schema: SchemaId,
    /// Listed in the object's `required`.
    pub required: bool,
    /// Server-populated only.
    pub read_only: bool,
    /// `null` is an accepted value.
    pub nullable: bool,
}

/// The concrete kind of a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum SchemaKind {
    /// Any JSON value.
    Any,
    /// `true` / `false`.
    Boolean,
    /// Whole number.
    Integer {
        /// Bit width: 32 or 64.
        precision: u8,
        /// Range constraints.
        constraints: NumericConstraints,
    },
    /// Floating point or decimal number.
    Number {
        /// Bit width: 32, 64 or 128 (decimal).
        precision: u8,
        /// Range constraints.
        constraints: NumericConstraints,
    },
    /// Plain string.
    String {
        /// Length/pattern constraints.
        constraints: StringConstraints,
    },
    /// Secret string.
    Credential {
        /// Length/pattern constraints.
        constraints: StringConstraints,
    },
    /// URI string.
    Uri {
        /// Length/pattern constraints.
        constraints: StringConstraints,
    },
    /// UUID string.
    Uuid,
    /// ISO 8601 duration.
    Duration,
    /// Date and time.
    DateTime {
        /// Wire profile.
        format: DateTimeFormat,
    },
    /// Calendar date.
    Date,
    /// Single character.
    Char,
    /// Base64 encoded bytes.
    ByteArray {
        /// Wire encoding.
        format: ByteArrayFormat,
    },
    /// Seconds since the Unix epoch.
    UnixTime,
    /// Homogeneous list.
    Array {
        /// Element schema.
        element: SchemaId,
        /// Minimum number of items.
        #[serde(skip_serializing_if = "Option::is_none")]
        min_items: Option<u64>,
        /// Maximum number of items.
        #[serde(skip_serializing_if = "Option::is_none")]
        max_items: Option<u64>,
        /// Items must be distinct.
        unique_items: bool,
    },
    /// Record with named properties.
    Object {
        /// Properties in declaration order.
        properties: Vec<Property>,
        /// Minimum number of properties.
        #[serde(skip_serializing_if = "Option::is_none")]
        min_properties: Option<u64>,
        /// Maximum number of properties.
        #[serde(skip_serializing_if = "Option::is_none")]
        max_properties: Option<u64>,
    },
    /// String-keyed map.
    Dictionary {
        /// Value schema.
        value: SchemaId,
    },
    /// All members apply (`allOf`).
    And {
        /// Member schemas.
        members: Vec<SchemaId>,
    },
    /// At least one member applies (`anyOf`).
    Or {
        /// Member schemas.
        members: Vec<SchemaId>,
    },
    /// Exactly one member applies (`oneOf`).
    Xor {
        /// Member schemas.
        members: Vec<SchemaId>,
    },
    /// Enumeration.
    Choice {
        /// Allowed values.
        choices: Vec<ChoiceValue>,
        /// Type of the values.
        choice_type: SchemaId,
        /// Values outside `choices` are rejected.
        sealed: bool,
    },
    /// OData query string.
    #[serde(rename = "odata-query")]
    OData,
    /// Opaque byte stream (transport concern, not a value type).
    Stream,
}

/// A classified schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Advisory identifier for emitters.
    pub name: String,
    /// Documentation.
    pub description: String,
    /// The fragment's `title`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Marked deprecated in the document.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    /// Example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// External documentation link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// XML serialization hints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,
    /// `x-` extension properties.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
    /// The concrete kind.
    #[serde(flatten)]
    pub kind: SchemaKind,
}

impl Schema {
    /// Creates a schema with empty metadata.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            summary: None,
            deprecated: false,
            example: None,
            default_value: None,
            external_docs: None,
            xml: None,
            extensions: IndexMap::new(),
            kind,
        }
    }

    /// True for the stream marker.
    pub fn is_stream(&self) -> bool {
        matches!(self.kind, SchemaKind::Stream)
    }

    /// Member schemas of a compound (`And` / `Or` / `Xor`), empty otherwise.
    pub fn members(&self) -> &[SchemaId] {
        match &self.kind {
            SchemaKind::And { members }
            | SchemaKind::Or { members }
            | SchemaKind::Xor { members } => members,
            _ => &[],
        }
    }

    /// Properties of an `Object`, empty otherwise.
    pub fn properties(&self) -> &[Property] {
        match &self.kind {
            SchemaKind::Object { properties, .. } => properties,
            _ => &[],
        }
    }

    /// Every schema id this schema points at directly.
    pub fn references(&self) -> Vec<SchemaId> {
        match &self.kind {
            SchemaKind::Array { element, .. } => vec![*element],
            SchemaKind::Dictionary { value } => vec![*value],
            SchemaKind::Choice { choice_type, .. } => vec![*choice_type],
            SchemaKind::Object { properties, .. } => {
                properties.iter().map(|property| property.schema).collect()
            }
            SchemaKind::And { members }
            | SchemaKind::Or { members }
            | SchemaKind::Xor { members } => members.clone(),
            _ => Vec::new(),
        }
    }
}

/// Arena owning every schema of a code model.
///
/// Slots can be reserved before their schema exists, so a fragment that refers
/// to itself gets its own id back while it is still being built. A slot whose
/// classification failed stays empty and is never emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaStore {
    slots: Vec<Option<Schema>>,
}

impl SchemaStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves an empty slot.
    pub fn reserve(&mut self) -> SchemaId {
        self.slots.push(None);
        SchemaId(self.slots.len() - 1)
    }

    /// Stores `schema` in a reserved slot.
    pub fn fill(&mut self, id: SchemaId, schema: Schema) {
        self.slots[id.0] = Some(schema);
    }

    /// Adds a schema in a fresh slot.
    pub fn add(&mut self, schema: Schema) -> SchemaId {
        self.slots.push(Some(schema));
        SchemaId(self.slots.len() - 1)
    }

    /// Empties every slot created after `failed` that reaches an empty slot
    /// created at or after `failed`, directly or through other such slots.
    ///
    /// `failed` is a reserved slot whose schema could not be built; slots
    /// before it belong to schemas still being built and are left alone.
    /// Returns the ids that were emptied.
    pub fn discard_dependents(&mut self, failed: SchemaId) -> Vec<SchemaId> {
        let mut discarded = Vec::new();
        loop {
            let dangling = (failed.0 + 1..self.slots.len()).find(|&i| {
                self.slots[i].as_ref().is_some_and(|schema| {
                    schema
                        .references()
                        .iter()
                        .any(|id| id.0 >= failed.0 && self.get(*id).is_none())
                })
            });
            match dangling {
                Some(i) => {
                    self.slots[i] = None;
                    discarded.push(SchemaId(i));
                }
                None => return discarded,
            }
        }
    }

    /// Looks a schema up.
    pub fn get(&self, id: SchemaId) -> Option<&Schema> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Number of stored schemas (empty slots excluded).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True if no schema is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored schemas with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (SchemaId, &Schema)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|schema| (SchemaId(i), schema)))
    }

    /// First schema carrying `name`.
    pub fn find(&self, name: &str) -> Option<(SchemaId, &Schema)> {
        self.iter().find(|(_, schema)| schema.name == name)
    }
}

#[derive(Serialize)]
struct StoreEntry<'a> {
    id: SchemaId,
    #[serde(flatten)]
    schema: &'a Schema,
}

impl Serialize for SchemaStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for (id, schema) in self.iter() {
            seq.serialize_element(&StoreEntry { id, schema })?;
        }
        seq.end()
    }
}
