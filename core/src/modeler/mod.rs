#![deny(missing_docs)]

//! # Modeler
//!
//! Single-pass transformation of a resolved OpenAPI document into a `CodeModel`.
//!
//! - **cache**: per-run identity memoization.
//! - **interpret**: metadata helpers (operation ids, descriptions, servers).
//! - **schemas**: the schema classifier.
//! - **operations**: the paths walker.
//!
//! A `Modeler` owns all per-run state. Nothing survives between runs.

pub mod cache;
pub mod interpret;
pub mod operations;
pub mod schemas;

use crate::codemodel::{CodeModel, SchemaId};
use crate::config::ModelerOptions;
use crate::diagnostics::{codes, Diagnostics};
use crate::error::{AppError, AppResult, ModelError};
use crate::oas::ref_utils::join_pointer;
use crate::oas::Document;
use cache::IdentityCache;
use serde_json::Value;

/// Component sections whose entries carry a `schema` or `content` map.
const SCHEMA_CARRIERS: [&str; 4] = ["headers", "parameters", "requestBodies", "responses"];

/// Result of a modeling run.
#[derive(Debug, Clone)]
pub struct ModelerOutput {
    /// The populated code model.
    pub code_model: CodeModel,
}

/// Context of one modeling run.
pub struct Modeler<'a, D: Diagnostics> {
    document: &'a Document,
    options: ModelerOptions,
    diag: &'a mut D,
    code_model: CodeModel,
    schemas: IdentityCache<SchemaId>,
    operations: IdentityCache<()>,
    path_items: IdentityCache<()>,
    any: Option<SchemaId>,
}

impl<'a, D: Diagnostics> Modeler<'a, D> {
    /// Prepares a run over `document`, reporting into `diag`.
    pub fn new(document: &'a Document, options: ModelerOptions, diag: &'a mut D) -> Self {
        let mut code_model = CodeModel::new(interpret::info(document.root()));
        code_model.extensions = interpret::extensions(document.root());
        Self {
            document,
            options,
            diag,
            code_model,
            schemas: IdentityCache::new(),
            operations: IdentityCache::new(),
            path_items: IdentityCache::new(),
            any: None,
        }
    }

    /// Walks paths, then (optionally) components, and returns the code model.
    pub fn process(mut self) -> AppResult<ModelerOutput> {
        self.check_structure()?;
        self.process_paths()?;
        if self.options.model_components {
            self.process_components()?;
        }

        tracing::info!(
            schemas = self.code_model.schemas.len(),
            groups = self.code_model.operation_groups.len(),
            operations = self.code_model.operations().count(),
            "code model complete"
        );
        Ok(ModelerOutput {
            code_model: self.code_model,
        })
    }

    /// Consumes the run and returns whatever was built so far.
    pub fn into_code_model(self) -> CodeModel {
        self.code_model
    }

    fn check_structure(&self) -> AppResult<()> {
        let root = self.document.root();
        if !root.is_object() {
            return Err(AppError::Structure(
                "document root is not a mapping".to_string(),
            ));
        }
        let walkable = ["paths", "components", "definitions"]
            .iter()
            .any(|key| root.get(*key).is_some());
        if !walkable {
            return Err(AppError::Structure(
                "document declares neither 'paths' nor 'components'".to_string(),
            ));
        }
        Ok(())
    }

    fn process_components(&mut self) -> AppResult<()> {
        let document = self.document;
        match document.get("#/components") {
            None | Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(AppError::Structure(
                    "'components' is not a mapping".to_string(),
                ))
            }
        }

        for section in SCHEMA_CARRIERS {
            let pointer = join_pointer("#/components", section);
            for (key, slot) in document.entries(&pointer) {
                self.model_carrier(&key, &slot);
            }
        }

        for pointer in ["#/components/schemas", "#/definitions"] {
            for (key, slot) in document.entries(pointer) {
                self.classify_component(&slot, &key);
            }
        }
        Ok(())
    }

    /// Classifies the schemas a header/parameter/body/response component carries.
    fn model_carrier(&mut self, key: &str, slot: &str) {
        let document = self.document;
        let carrier = match document.resolve(slot) {
            Ok(Some(carrier)) => carrier,
            Ok(None) => return,
            Err(err) => {
                self.reject(codes::UNRESOLVED_REFERENCE, err, slot);
                return;
            }
        };

        let mut schema_slots = Vec::new();
        if carrier.value.get("schema").is_some() {
            schema_slots.push(join_pointer(carrier.pointer, "schema"));
        }
        for (_, media) in document.entries(&join_pointer(carrier.pointer, "content")) {
            schema_slots.push(join_pointer(&media, "schema"));
        }
        for schema_slot in schema_slots {
            self.classify_component(&schema_slot, key);
        }
    }

    /// Classifies one component schema. A failure leaves the entry absent; its
    /// diagnostic was recorded where the error was raised.
    fn classify_component(&mut self, slot: &str, key: &str) {
        match self.classify_slot(slot, key) {
            Ok(_) => {}
            Err(ModelError::PreviouslyRejected(name)) => {
                tracing::debug!(%name, slot, "component already rejected")
            }
            Err(err) => tracing::debug!(%err, slot, "component dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Collector;

    fn run(yaml: &str) -> (AppResult<ModelerOutput>, Collector) {
        let doc = Document::parse(yaml).unwrap();
        let mut diag = Collector::new();
        let output = Modeler::new(&doc, ModelerOptions::default(), &mut diag).process();
        (output, diag)
    }

    #[test]
    fn test_rejected_component_reported_once() {
        let yaml = r#"
openapi: 3.0.0
info: {title: T, version: '1'}
components:
  parameters:
    Size:
      name: size
      in: query
      schema: {$ref: '#/components/schemas/Size'}
  schemas:
    Size: {type: integer, format: int128}
    Ok: {type: boolean}
"#;
        let (output, diag) = run(yaml);
        let model = output.unwrap().code_model;
        assert!(model.schemas.find("Size").is_none());
        assert!(model.schemas.find("Ok").is_some());
        assert_eq!(diag.errors().count(), 1);
    }

    #[test]
    fn test_root_must_be_a_mapping() {
        let (output, _) = run("- just\n- a list\n");
        assert!(matches!(output, Err(AppError::Structure(_))));
    }

    #[test]
    fn test_nothing_to_walk_is_fatal() {
        let (output, _) = run("openapi: 3.0.0\ninfo: {title: T, version: '1'}\n");
        assert!(matches!(output, Err(AppError::Structure(_))));
    }

    #[test]
    fn test_paths_must_be_a_mapping() {
        let (output, _) = run("openapi: 3.0.0\npaths: [1, 2]\n");
        assert!(matches!(output, Err(AppError::Structure(_))));
    }

    #[test]
    fn test_info_and_extensions() {
        let yaml = r#"
openapi: 3.0.0
info: {title: Pets, version: '2.1', description: A pet store}
x-generator: hand
paths: {}
"#;
        let (output, diag) = run(yaml);
        let model = output.unwrap().code_model;
        assert_eq!(model.info.title, "Pets");
        assert_eq!(model.info.version, "2.1");
        assert_eq!(model.info.description.as_deref(), Some("A pet store"));
        assert!(model.extensions.contains_key("x-generator"));
        assert!(diag.diagnostics().is_empty());
    }

    #[test]
    fn test_component_carriers_are_classified() {
        let yaml = r#"
openapi: 3.0.0
info: {title: T, version: '1'}
components:
  parameters:
    Top:
      name: top
      in: query
      schema: {type: integer, format: int32}
  requestBodies:
    Upload:
      content:
        application/octet-stream:
          schema: {type: string, format: binary}
  responses:
    Error:
      description: failure
      content:
        application/json:
          schema:
            type: object
            properties:
              code: {type: string}
"#;
        let (output, _) = run(yaml);
        let model = output.unwrap().code_model;
        assert!(model.schemas.find("Top").is_some());
        assert!(model.schemas.find("Upload").unwrap().1.is_stream());
        assert_eq!(model.schemas.find("Error").unwrap().1.properties().len(), 1);
    }

    #[test]
    fn test_components_walk_can_be_disabled() {
        let yaml = r#"
openapi: 3.0.0
info: {title: T, version: '1'}
components:
  schemas:
    Unused: {type: string}
"#;
        let doc = Document::parse(yaml).unwrap();
        let mut diag = Collector::new();
        let options = ModelerOptions::default().with_components(false);
        let model = Modeler::new(&doc, options, &mut diag)
            .process()
            .unwrap()
            .code_model;
        assert!(model.schemas.is_empty());
    }
}
