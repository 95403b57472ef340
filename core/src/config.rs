//! # Modeler Options
//!
//! Knobs for a single modeling run.

/// Options for a modeling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelerOptions {
    /// Separator between group and member in an `operationId` (`Widgets_List`).
    pub operation_id_separator: char,
    /// Whether reusable `components` are classified even when nothing references them.
    pub model_components: bool,
}

impl Default for ModelerOptions {
    fn default() -> Self {
        Self {
            operation_id_separator: '_',
            model_components: true,
        }
    }
}

impl ModelerOptions {
    /// Overrides the operation id separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.operation_id_separator = separator;
        self
    }

    /// Enables or disables the components walk.
    pub fn with_components(mut self, enabled: bool) -> Self {
        self.model_components = enabled;
        self
    }
}
