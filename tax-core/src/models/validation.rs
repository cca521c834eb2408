use serde::{Deserialize, Serialize};

/// Outcome of running the extraction rules over a set of mappings.
///
/// Warnings never block; any error makes the mappings ineligible for
/// automatic acceptance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    pub fn new(
        warnings: Vec<String>,
        errors: Vec<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            is_valid: errors.is_empty(),
            warnings,
            errors,
            suggestions,
        }
    }
}
