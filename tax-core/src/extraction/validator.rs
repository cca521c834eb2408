//! Data-quality rules over mapped documents.
//!
//! Problems found here are reported in the returned [`ValidationResult`],
//! never as `Err`: a bad scan is expected input, not a failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schema::{EMPLOYER_NAME, WAGES};
use super::summary::{average_confidence, is_income_field};
use crate::calculations::common::{format_currency, format_percent};
use crate::{DocumentType, ExtractionMethod, FormField, TaxDocumentMapping, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Per-mapping confidence below which a warning is raised.
    pub low_confidence_threshold: f64,
    /// Average confidence below which a re-scan is suggested.
    pub rescan_average_threshold: f64,
    /// Income amounts above this are flagged for re-verification.
    pub income_sanity_ceiling: Decimal,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 0.7,
            rescan_average_threshold: 0.8,
            income_sanity_ceiling: Decimal::from(1_000_000),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionValidator {
    config: ValidationConfig,
}

impl ExtractionValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate(
        &self,
        mappings: &[TaxDocumentMapping],
    ) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        let mut suggestions = Vec::new();

        for mapping in mappings {
            let document_type = mapping.metadata.document_type;

            if mapping.metadata.confidence < self.config.low_confidence_threshold {
                warnings.push(format!(
                    "Low extraction confidence ({}) for {}. Please review the extracted values.",
                    format_percent(mapping.metadata.confidence),
                    document_type
                ));
            }

            if document_type == DocumentType::W2 {
                if mapping.field(WAGES).is_none() {
                    errors.push(
                        "W-2 is missing wages (Box 1). Enter the amount manually.".to_string(),
                    );
                } else if mapping.metadata.extraction_method != ExtractionMethod::Structured {
                    // Box 1 wages are the only field with a text fallback.
                    warnings.push(
                        "W-2 wages were read from the document text. Please confirm the amount."
                            .to_string(),
                    );
                }
                if mapping.field(EMPLOYER_NAME).is_none() {
                    warnings.push("W-2 is missing the employer name.".to_string());
                }
            }

            for field in mapping.fields.iter().filter(|f| is_income_field(&f.id)) {
                let Some(amount) = field.value.as_amount() else {
                    continue;
                };
                if amount < Decimal::ZERO {
                    errors.push(format!(
                        "{} on {} is negative ({}). The value was extracted incorrectly.",
                        field.label,
                        document_type,
                        format_currency(amount)
                    ));
                } else if amount > self.config.income_sanity_ceiling {
                    warnings.push(format!(
                        "{} of {} on {} exceeds {}. Please verify this amount.",
                        field.label,
                        format_currency(amount),
                        document_type,
                        format_currency(self.config.income_sanity_ceiling)
                    ));
                }
            }
        }

        if mappings.is_empty() {
            suggestions.push(
                "No tax information could be extracted. Try re-uploading a clearer scan of the document."
                    .to_string(),
            );
        } else if average_confidence(mappings) < self.config.rescan_average_threshold {
            suggestions.push(
                "Overall extraction confidence is low. A higher-quality scan may improve accuracy."
                    .to_string(),
            );
        }

        ValidationResult::new(warnings, errors, suggestions)
    }
}

/// Fields that may be copied into the return without user review.
///
/// Nothing is accepted automatically while the validation has blocking
/// errors; the user can still correct or enter every field by hand.
pub fn auto_accepted_fields<'m>(
    mappings: &'m [TaxDocumentMapping],
    validation: &ValidationResult,
) -> Vec<&'m FormField> {
    if !validation.is_valid {
        return Vec::new();
    }
    mappings
        .iter()
        .flat_map(|m| &m.fields)
        .filter(|f| f.is_auto_populated)
        .collect()
}
