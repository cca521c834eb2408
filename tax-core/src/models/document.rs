use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax document kinds understood by the field mapper.
///
/// `Form1099` is a generic 1099 whose subtype has not been determined yet;
/// it is resolved to one of the concrete variants before mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "W-2")]
    W2,
    #[serde(rename = "1099-INT")]
    Form1099Int,
    #[serde(rename = "1099-DIV")]
    Form1099Div,
    #[serde(rename = "1099-MISC")]
    Form1099Misc,
    #[serde(rename = "1099-NEC")]
    Form1099Nec,
    #[serde(rename = "1099")]
    Form1099,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::W2 => "W-2",
            Self::Form1099Int => "1099-INT",
            Self::Form1099Div => "1099-DIV",
            Self::Form1099Misc => "1099-MISC",
            Self::Form1099Nec => "1099-NEC",
            Self::Form1099 => "1099",
        }
    }

    /// Parses the upstream recognizer's document tag.
    ///
    /// Case, whitespace, hyphens, underscores and a leading `FORM` or
    /// `TAX.US.` prefix are ignored, so `"w2"`, `"W-2"`, `"tax.us.w2"` and
    /// `"Form 1099-INT"` are all recognized.
    pub fn parse(s: &str) -> Option<Self> {
        let mut key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        for prefix in ["TAX.US.", "FORM"] {
            if let Some(rest) = key.strip_prefix(prefix) {
                key = rest.to_string();
            }
        }

        match key.as_str() {
            "W2" => Some(Self::W2),
            "1099INT" => Some(Self::Form1099Int),
            "1099DIV" => Some(Self::Form1099Div),
            "1099MISC" => Some(Self::Form1099Misc),
            "1099NEC" => Some(Self::Form1099Nec),
            "1099" => Some(Self::Form1099),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completed output of the external document-recognition service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocumentPayload {
    pub document_type: String,
    #[serde(default)]
    pub structured_fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub raw_recognized_text: String,
    #[serde(default)]
    pub extraction_confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    Wages,
    Interest,
    Dividends,
    MiscellaneousIncome,
    SelfEmployment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Structured,
    OcrFallback,
    /// Structured fields plus at least one OCR-recovered field.
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Amount(Decimal),
    Text(String),
}

impl FieldValue {
    pub fn as_amount(&self) -> Option<Decimal> {
        match self {
            Self::Amount(amount) => Some(*amount),
            Self::Text(_) => None,
        }
    }
}

/// One recognized value attached to a tax-form line, awaiting user review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    pub label: String,
    pub value: FieldValue,
    pub is_auto_populated: bool,
    pub confidence: f64,
    pub source_document_type: DocumentType,
    pub source_description: String,
}

impl FormField {
    /// The field as re-entered by the user.
    pub fn corrected(
        &self,
        value: FieldValue,
    ) -> Self {
        Self {
            value,
            is_auto_populated: false,
            confidence: 1.0,
            source_description: format!("{} (corrected manually)", self.source_description),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingMetadata {
    pub document_type: DocumentType,
    pub confidence: f64,
    pub extraction_method: ExtractionMethod,
}

/// Fields mapped from a single document in a single processing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxDocumentMapping {
    pub income_category: IncomeCategory,
    pub fields: Vec<FormField>,
    pub metadata: MappingMetadata,
}

impl TaxDocumentMapping {
    pub fn field(
        &self,
        id: &str,
    ) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_document_type_variants() {
        assert_eq!(DocumentType::parse("W-2"), Some(DocumentType::W2));
        assert_eq!(DocumentType::parse("w2"), Some(DocumentType::W2));
        assert_eq!(DocumentType::parse("tax.us.w2"), Some(DocumentType::W2));
        assert_eq!(DocumentType::parse("Form 1099-INT"), Some(DocumentType::Form1099Int));
        assert_eq!(DocumentType::parse("1099_div"), Some(DocumentType::Form1099Div));
        assert_eq!(DocumentType::parse("1099-misc"), Some(DocumentType::Form1099Misc));
        assert_eq!(DocumentType::parse("1099NEC"), Some(DocumentType::Form1099Nec));
        assert_eq!(DocumentType::parse("1099"), Some(DocumentType::Form1099));
        assert_eq!(DocumentType::parse("1098-T"), None);
    }

    #[test]
    fn field_value_serializes_tagged() {
        let json = serde_json::to_string(&FieldValue::Text("ACME".to_string())).unwrap();

        assert_eq!(json, r#"{"kind":"text","value":"ACME"}"#);
    }
}
