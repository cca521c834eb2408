use rust_decimal::Decimal;

use crate::{
    DocumentType, ExtractionMethod, FieldValue, FormField, IncomeCategory, MappingMetadata,
    TaxDocumentMapping,
};

fn label_for(id: &str) -> String {
    let text = id.replace('_', " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn field(
    id: &str,
    value: FieldValue,
) -> FormField {
    FormField {
        id: id.to_string(),
        label: label_for(id),
        value,
        is_auto_populated: true,
        confidence: 0.9,
        source_document_type: DocumentType::W2,
        source_description: format!("test {id}"),
    }
}

pub(crate) fn amount_field(
    id: &str,
    amount: Decimal,
) -> FormField {
    field(id, FieldValue::Amount(amount))
}

pub(crate) fn text_field(
    id: &str,
    text: &str,
) -> FormField {
    field(id, FieldValue::Text(text.to_string()))
}

/// A structured mapping; field source types are rewritten to `document_type`.
pub(crate) fn mapping(
    document_type: DocumentType,
    confidence: f64,
    fields: Vec<FormField>,
) -> TaxDocumentMapping {
    let income_category = document_type
        .schema()
        .map_or(IncomeCategory::MiscellaneousIncome, |s| s.income_category);
    TaxDocumentMapping {
        income_category,
        fields: fields
            .into_iter()
            .map(|f| FormField {
                source_document_type: document_type,
                ..f
            })
            .collect(),
        metadata: MappingMetadata {
            document_type,
            confidence,
            extraction_method: ExtractionMethod::Structured,
        },
    }
}
