use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::{DocumentType, TaxDocumentMapping};

/// Field ids that count toward extracted income.
///
/// Boxes that repeat or subdivide one of these (Social Security, Medicare
/// and state wages, qualified dividends) are left out so nothing is counted
/// twice.
pub const INCOME_FIELD_IDS: [&str; 8] = [
    "wages",
    "interest_income",
    "ordinary_dividends",
    "capital_gain_distributions",
    "rents",
    "royalties",
    "other_income",
    "nonemployee_compensation",
];

pub fn is_income_field(id: &str) -> bool {
    INCOME_FIELD_IDS.contains(&id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total_extracted_amount: Decimal,
    pub distinct_document_types: Vec<DocumentType>,
    pub total_field_count: usize,
    /// Mean of the per-mapping confidences; 0 when nothing was mapped.
    pub average_confidence: f64,
}

pub fn summarize(mappings: &[TaxDocumentMapping]) -> ExtractionSummary {
    let total_extracted_amount: Decimal = mappings
        .iter()
        .flat_map(|m| &m.fields)
        .filter(|f| is_income_field(&f.id))
        .filter_map(|f| f.value.as_amount())
        .sum();

    let distinct_document_types: BTreeSet<DocumentType> = mappings
        .iter()
        .map(|m| m.metadata.document_type)
        .collect();

    ExtractionSummary {
        total_extracted_amount: round_half_up(total_extracted_amount),
        distinct_document_types: distinct_document_types.into_iter().collect(),
        total_field_count: mappings.iter().map(|m| m.fields.len()).sum(),
        average_confidence: average_confidence(mappings),
    }
}

pub(crate) fn average_confidence(mappings: &[TaxDocumentMapping]) -> f64 {
    if mappings.is_empty() {
        return 0.0;
    }
    mappings.iter().map(|m| m.metadata.confidence).sum::<f64>() / mappings.len() as f64
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::extraction::test_mappings::{amount_field, mapping, text_field};

    #[test]
    fn totals_only_income_fields() {
        let w2 = mapping(
            DocumentType::W2,
            0.9,
            vec![
                amount_field("wages", dec!(52000.00)),
                amount_field("social_security_wages", dec!(52000.00)),
                amount_field("federal_income_tax_withheld", dec!(6100)),
                text_field("employer_name", "Acme Corp"),
            ],
        );
        let div = mapping(
            DocumentType::Form1099Div,
            0.7,
            vec![
                amount_field("ordinary_dividends", dec!(410.25)),
                amount_field("qualified_dividends", dec!(300)),
            ],
        );

        let summary = summarize(&[w2, div]);

        assert_eq!(summary.total_extracted_amount, dec!(52410.25));
        assert_eq!(summary.total_field_count, 6);
        assert_eq!(
            summary.distinct_document_types,
            vec![DocumentType::W2, DocumentType::Form1099Div]
        );
        assert!((summary.average_confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn document_types_are_deduplicated() {
        let first = mapping(DocumentType::W2, 0.9, vec![amount_field("wages", dec!(1000))]);
        let second = mapping(DocumentType::W2, 0.9, vec![amount_field("wages", dec!(2000))]);

        let summary = summarize(&[first, second]);

        assert_eq!(summary.distinct_document_types, vec![DocumentType::W2]);
        assert_eq!(summary.total_extracted_amount, dec!(3000));
    }

    #[test]
    fn empty_input_summarizes_to_zero() {
        let summary = summarize(&[]);

        assert_eq!(summary.total_extracted_amount, Decimal::ZERO);
        assert_eq!(summary.total_field_count, 0);
        assert!(summary.distinct_document_types.is_empty());
        assert_eq!(summary.average_confidence, 0.0);
    }
}
