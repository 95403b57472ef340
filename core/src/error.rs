//! # Error Handling
//!
//! Provides the run-level `AppError` enum and the per-construct `ModelError`.
//!
//! An `AppError` aborts the whole modeling pass. A `ModelError` only rejects the
//! construct being built (a schema, a parameter, an operation); the walker records
//! it and moves on to the next sibling.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The input text is neither valid YAML nor JSON.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// The document cannot even be walked (no paths, no components, wrong shapes).
    #[from(ignore)]
    #[display("Structure Error: {_0}")]
    Structure(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Reason a single construct could not be modeled.
///
/// The matching diagnostic has already been reported by the time one of these is
/// returned, so callers only decide what to drop.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ModelError {
    /// A `$ref` (or a required slot) did not resolve to anything.
    #[display("unresolved reference '{_0}'")]
    UnresolvedReference(String),

    /// No `type` and nothing to infer one from.
    #[display("schema '{_0}' has no type and none can be inferred")]
    UnclassifiableFragment(String),

    /// The `type` keyword names something outside the JSON types.
    #[display("schema '{name}' has unrecognized type '{ty}'")]
    UnknownType {
        /// Schema name.
        name: String,
        /// Offending type.
        ty: String,
    },

    /// A known type paired with a format it does not support.
    #[display("{ty} schema '{name}' with unknown format '{format}' is not valid")]
    UnknownFormat {
        /// Schema name.
        name: String,
        /// The JSON type.
        ty: String,
        /// Offending format.
        format: String,
    },

    /// `type: array` without `items`.
    #[display("array schema '{_0}' is missing schema for items")]
    MissingArrayItems(String),

    /// `oneOf` next to the fragment's own `properties`.
    #[display("schema '{_0}' combines 'oneOf' with 'properties'")]
    AmbiguousOneOf(String),

    /// Parameter or media type without a schema.
    #[display("'{_0}' is missing its schema")]
    MissingSchema(String),

    /// Parameter without a usable `name` or `in`.
    #[display("parameter at '{_0}' has no valid 'name' or 'in'")]
    InvalidParameter(String),

    /// Request body declaring several media types.
    #[display("request body for '{_0}' declares multiple content types")]
    UnsupportedMultipleContent(String),

    /// Two operations mapped to the same member of a group.
    #[display("operation '{member}' already exists in group '{group}'")]
    DuplicateOperation {
        /// Group name.
        group: String,
        /// Member name.
        member: String,
    },

    /// The fragment failed earlier in this run; it is not classified again.
    #[display("schema '{_0}' was rejected earlier")]
    PreviouslyRejected(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for ModelError {}

/// Result type for single-construct modeling steps.
pub type ModelResult<T> = Result<T, ModelError>;
