#![deny(missing_docs)]

//! # Modeler Core
//!
//! Turns a resolved OpenAPI document (YAML or JSON) into a language-neutral
//! code model: deduplicated schemas, grouped operations and canonical servers.
//!
//! ```
//! use modeler_core::{model_document, Collector, ModelerOptions};
//!
//! let text = "openapi: 3.0.0\ninfo: {title: T, version: '1'}\ncomponents:\n  schemas:\n    Name: {type: string}\n";
//! let mut diag = Collector::new();
//! let model = model_document(text, &ModelerOptions::default(), &mut diag).unwrap();
//! assert!(model.schemas.find("Name").is_some());
//! ```

/// Shared error types.
pub mod error;

/// Diagnostics sink and codes.
pub mod diagnostics;

/// Run options.
pub mod config;

/// OpenAPI document access (arena, references, type normalization).
pub mod oas;

/// The code model produced by a run.
pub mod codemodel;

/// The modeling pass.
pub mod modeler;

pub use codemodel::{CodeModel, Schema, SchemaId, SchemaKind};
pub use config::ModelerOptions;
pub use diagnostics::{Collector, Diagnostic, Diagnostics, Level};
pub use error::{AppError, AppResult, ModelError, ModelResult};
pub use modeler::{Modeler, ModelerOutput};
pub use oas::Document;

/// Parses `text` and models it in one go.
///
/// Construct-level problems end up in `diag`; only unreadable or unwalkable
/// documents return an error.
pub fn model_document<D: Diagnostics>(
    text: &str,
    options: &ModelerOptions,
    diag: &mut D,
) -> AppResult<CodeModel> {
    let document = Document::parse(text)?;
    let output = Modeler::new(&document, options.clone(), diag).process()?;
    Ok(output.code_model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_fatal() {
        let mut diag = Collector::new();
        let result = model_document("{ not: [valid", &ModelerOptions::default(), &mut diag);
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_json_input() {
        let text = r#"{"openapi": "3.0.0", "info": {"title": "J", "version": "1"},
            "components": {"schemas": {"Flag": {"type": "boolean"}}}}"#;
        let mut diag = Collector::new();
        let model = model_document(text, &ModelerOptions::default(), &mut diag).unwrap();
        assert_eq!(model.info.title, "J");
        assert!(matches!(
            model.schemas.find("Flag").unwrap().1.kind,
            SchemaKind::Boolean
        ));
    }
}
