//! Recognized tax documents to reviewed form fields.
//!
//! The external recognizer hands over an [`ExtractedDocumentPayload`]; the
//! [`FieldMapper`] turns it into [`TaxDocumentMapping`]s, the
//! [`ExtractionValidator`] checks them, and [`summarize`] totals them.

pub mod mapper;
pub mod money;
pub mod ocr;
pub mod schema;
pub mod summary;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_mappings;

use serde::{Deserialize, Serialize};

pub use mapper::{FieldMapper, MapperConfig};
pub use summary::{ExtractionSummary, INCOME_FIELD_IDS, is_income_field, summarize};
pub use validator::{ExtractionValidator, ValidationConfig, auto_accepted_fields};

use crate::{ExtractedDocumentPayload, TaxDocumentMapping, ValidationResult};

/// Everything the review screen needs for one uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReview {
    pub mappings: Vec<TaxDocumentMapping>,
    pub validation: ValidationResult,
    pub summary: ExtractionSummary,
}

pub fn review_document(
    payload: &ExtractedDocumentPayload,
    mapper: &FieldMapper,
    validator: &ExtractionValidator,
) -> DocumentReview {
    let mappings = mapper.map_to_fields(payload);
    let validation = validator.validate(&mappings);
    let summary = summarize(&mappings);

    DocumentReview {
        mappings,
        validation,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::DocumentType;

    #[test]
    fn review_of_w2_without_wages_blocks_acceptance() {
        let payload = ExtractedDocumentPayload {
            document_type: "W-2".to_string(),
            structured_fields: BTreeMap::from([(
                "EmployerName".to_string(),
                serde_json::json!("Acme Corp"),
            )]),
            raw_recognized_text: "Employer copy".to_string(),
            extraction_confidence: 0.9,
        };

        let review =
            review_document(&payload, &FieldMapper::default(), &ExtractionValidator::default());

        assert_eq!(review.mappings.len(), 1);
        assert!(!review.validation.is_valid);
        assert!(auto_accepted_fields(&review.mappings, &review.validation).is_empty());
        assert_eq!(review.summary.total_extracted_amount, dec!(0));
        assert_eq!(review.summary.distinct_document_types, vec![DocumentType::W2]);
    }

    #[test]
    fn review_of_unrecognized_document_suggests_reupload() {
        let payload = ExtractedDocumentPayload {
            document_type: "W-2".to_string(),
            structured_fields: BTreeMap::new(),
            raw_recognized_text: String::new(),
            extraction_confidence: 0.3,
        };

        let review =
            review_document(&payload, &FieldMapper::default(), &ExtractionValidator::default());

        assert!(review.mappings.is_empty());
        assert_eq!(review.validation.suggestions.len(), 1);
        assert_eq!(review.summary.total_field_count, 0);
    }
}
