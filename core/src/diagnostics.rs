//! # Diagnostics
//!
//! The sink every modeling component reports through. Warnings never abort; errors
//! mark the enclosing construct as failed, but reporting one never fails itself.
//!
//! Codes are short paths such as `["Modeler", "MissingType"]`, and every diagnostic
//! points at the document location (a JSON pointer) that triggered it.

use serde::Serialize;
use std::fmt;

/// A diagnostic code path, e.g. `["Modeler", "MissingType"]`.
pub type Code = &'static [&'static str];

/// Codes reported by the modeler.
pub mod codes {
    use super::Code;

    /// Operation identity could not be read or had to be synthesized.
    pub const INTERPRETATIONS: Code = &["Interpretations"];
    /// `type` was missing and inferred.
    pub const MISSING_TYPE: Code = &["Modeler", "MissingType"];
    /// Legacy `file` type/format rewritten to `string`/`binary`.
    pub const TYPE_FILE_NOT_VALID: Code = &["Modeler", "TypeFileNotValid"];
    /// `type` is not one of the JSON types.
    pub const UNKNOWN_SCHEMA_TYPE: Code = &["Modeler", "UnknownSchemaType"];
    /// A `(type, format)` pair that is not supported.
    pub const UNKNOWN_FORMAT: Code = &["Modeler", "UnknownFormat"];
    /// Array without `items`.
    pub const MISSING_ARRAY_ELEMENT_TYPE: Code = &["Modeler", "MissingArrayElementType"];
    /// `oneOf` combined with own properties.
    pub const AMBIGUOUS_ONE_OF: Code = &["Modeler", "AmbiguousOneOf"];
    /// Object schema without any members.
    pub const EMPTY_OBJECT: Code = &["Modeler", "EmptyObject"];
    /// A `$ref` that resolves to nothing.
    pub const UNRESOLVED_REFERENCE: Code = &["Modeler", "UnresolvedReference"];
    /// Parameter or media type without a schema.
    pub const MISSING_SCHEMA: Code = &["Modeler", "MissingSchema"];
    /// Parameter without a usable name or location.
    pub const INVALID_PARAMETER: Code = &["Modeler", "InvalidParameter"];
    /// Request body with several content types.
    pub const MULTIPLE_CONTENT_TYPES: Code = &["Modeler", "MultipleContentTypes"];
    /// Two operations share a member name in the same group.
    pub const DUPLICATE_OPERATION: Code = &["Modeler", "DuplicateOperation"];
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Auto-corrected or suspicious input.
    Warning,
    /// A construct was dropped from the model.
    Error,
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity.
    pub level: Level,
    /// Code path.
    pub code: Vec<String>,
    /// Human readable message.
    pub message: String,
    /// JSON pointer of the offending fragment.
    pub source: String,
}

impl Diagnostic {
    /// Returns true if the diagnostic carries the given code path.
    pub fn has_code(&self, code: Code) -> bool {
        self.code.iter().map(String::as_str).eq(code.iter().copied())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            Level::Warning => "warning",
            Level::Error => "error",
        };
        write!(
            f,
            "{} [{}] {} (at {})",
            level,
            self.code.join("/"),
            self.message,
            self.source
        )
    }
}

/// Receives warnings and errors from the modeler.
pub trait Diagnostics {
    /// Reports an auto-corrected or suspicious construct.
    fn warning(&mut self, code: Code, message: String, source: &str);

    /// Reports a construct that is dropped from the model.
    fn error(&mut self, code: Code, message: String, source: &str);
}

/// Records every diagnostic and forwards it to `tracing`.
#[derive(Debug, Default, Clone)]
pub struct Collector {
    diagnostics: Vec<Diagnostic>,
}

impl Collector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Only the warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == Level::Warning)
    }

    /// Only the errors.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.level == Level::Error)
    }

    /// True if at least one error was reported.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Consumes the collector.
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn push(&mut self, level: Level, code: Code, message: String, source: &str) {
        self.diagnostics.push(Diagnostic {
            level,
            code: code.iter().map(|c| c.to_string()).collect(),
            message,
            source: source.to_string(),
        });
    }
}

impl Diagnostics for Collector {
    fn warning(&mut self, code: Code, message: String, source: &str) {
        tracing::warn!(code = %code.join("/"), source, "{}", message);
        self.push(Level::Warning, code, message, source);
    }

    fn error(&mut self, code: Code, message: String, source: &str) {
        tracing::error!(code = %code.join("/"), source, "{}", message);
        self.push(Level::Error, code, message, source);
    }
}
