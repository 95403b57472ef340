#![deny(missing_docs)]

//! # Model Command
//!
//! Reads an OpenAPI document, runs the modeler and writes the code model as YAML
//! or JSON.

use std::fs;
use std::path::PathBuf;

use modeler_core::{model_document, CodeModel, Collector, Diagnostic, ModelerOptions};
use serde::Serialize;

use crate::error::{CliError, CliResult};

/// Output encoding of the code model.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML document.
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Arguments for the model command.
#[derive(clap::Args, Debug, Clone)]
pub struct ModelArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    pub input: PathBuf,

    /// Output encoding.
    #[clap(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Write the model here instead of stdout.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Separator between group and member in operation ids.
    #[clap(long, env = "MODELER_OPERATION_SEPARATOR", default_value_t = '_')]
    pub separator: char,

    /// Only model schemas reachable from operations.
    #[clap(long)]
    pub skip_components: bool,

    /// Fail when the run reports any error diagnostic.
    #[clap(long)]
    pub deny_errors: bool,

    /// Include the diagnostics in the written output.
    #[clap(long)]
    pub with_diagnostics: bool,
}

impl ModelArgs {
    fn options(&self) -> ModelerOptions {
        ModelerOptions::default()
            .with_separator(self.separator)
            .with_components(!self.skip_components)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    code_model: &'a CodeModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a [Diagnostic]>,
}

/// Executes the model command and returns the diagnostics it produced.
pub fn execute(args: &ModelArgs) -> CliResult<Vec<Diagnostic>> {
    if !args.input.exists() {
        return Err(CliError::General(format!(
            "OpenAPI file not found: {:?}",
            args.input
        )));
    }
    let text = fs::read_to_string(&args.input)?;

    let mut diag = Collector::new();
    let code_model = model_document(&text, &args.options(), &mut diag)?;

    let report = Report {
        code_model: &code_model,
        diagnostics: args.with_diagnostics.then(|| diag.diagnostics()),
    };
    let rendered = render(&report, args.format)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            tracing::info!(path = %path.display(), "code model written");
        }
        None => println!("{}", rendered),
    }

    let errors = diag.errors().count();
    eprintln!(
        "Modeled {} schema(s), {} operation(s): {} warning(s), {} error(s)",
        code_model.schemas.len(),
        code_model.operations().count(),
        diag.warnings().count(),
        errors
    );
    if args.deny_errors && errors > 0 {
        return Err(CliError::Diagnostics(errors));
    }
    Ok(diag.into_inner())
}

fn render(report: &Report<'_>, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| CliError::Serialize(e.to_string()))
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).map_err(|e| CliError::Serialize(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SPEC: &str = r#"
openapi: 3.0.0
info: {title: Pets, version: '1'}
paths:
  /pets:
    get:
      operationId: Pets.List
      responses: {}
  /broken:
    get:
      operationId: Broken_Get
      parameters:
        - name: ids
          in: query
          schema: {type: array}
      responses: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        name: {type: string}
"#;

    fn args(input: PathBuf, output: PathBuf) -> ModelArgs {
        ModelArgs {
            input,
            format: OutputFormat::Json,
            output: Some(output),
            separator: '.',
            skip_components: false,
            deny_errors: false,
            with_diagnostics: true,
        }
    }

    #[test]
    fn test_writes_json_model() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        let output = dir.path().join("out/model.json");
        fs::write(&input, SPEC).unwrap();

        let diagnostics = execute(&args(input, output.clone())).unwrap();
        assert_eq!(diagnostics.len(), 1);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["codeModel"]["info"]["title"], "Pets");
        assert!(written["codeModel"]["operationGroups"]["Pets"].is_object());
        assert_eq!(written["diagnostics"][0]["level"], "error");
    }

    #[test]
    fn test_deny_errors() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, SPEC).unwrap();

        let mut strict = args(input, dir.path().join("model.json"));
        strict.deny_errors = true;
        assert!(matches!(execute(&strict), Err(CliError::Diagnostics(1))));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let missing = args(dir.path().join("nope.yaml"), dir.path().join("m.json"));
        assert!(matches!(execute(&missing), Err(CliError::General(_))));
    }

    #[test]
    fn test_yaml_rendering() {
        let mut diag = Collector::new();
        let model = model_document(SPEC, &ModelerOptions::default(), &mut diag).unwrap();
        let report = Report {
            code_model: &model,
            diagnostics: None,
        };
        let yaml = render(&report, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("codeModel:"));
        assert!(!yaml.contains("diagnostics:"));
    }
}
