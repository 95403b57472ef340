#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use modeler_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// The modeling pass itself failed.
    #[display("{}", _0)]
    Model(AppError),

    /// The code model could not be written out.
    #[from(ignore)]
    #[display("Serialization Error: {}", _0)]
    Serialize(String),

    /// `--deny-errors` was set and the run reported errors.
    #[from(ignore)]
    #[display("Modeling reported {} error(s)", _0)]
    Diagnostics(usize),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `General(String)`
/// variant contains a `String`, which does not implement `std::error::Error`, causing
/// auto-derived `source()` implementations to fail compilation.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let err: CliError = AppError::Structure("no paths".into()).into();
        assert_eq!(err.to_string(), "Structure Error: no paths");
    }

    #[test]
    fn test_diagnostics_display() {
        assert_eq!(
            CliError::Diagnostics(2).to_string(),
            "Modeling reported 2 error(s)"
        );
    }
}
