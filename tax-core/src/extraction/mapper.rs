//! Maps recognized document payloads onto tax-form fields.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::money::positive_amount;
use super::schema::{DocumentSchema, FieldKind, FieldSpec, normalize_key};
use crate::{
    DocumentType, ExtractedDocumentPayload, ExtractionMethod, FieldValue, FormField,
    MappingMetadata, TaxDocumentMapping,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Multiplier applied to the payload confidence for OCR-recovered fields.
    pub ocr_confidence_factor: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            ocr_confidence_factor: 0.75,
        }
    }
}

/// Structured-field name fragments that identify a generic 1099's subtype.
/// Checked in order.
const GENERIC_1099_KEY_HINTS: [(&str, DocumentType); 6] = [
    ("nonemployee", DocumentType::Form1099Nec),
    ("dividend", DocumentType::Form1099Div),
    ("interest", DocumentType::Form1099Int),
    ("rents", DocumentType::Form1099Misc),
    ("royalties", DocumentType::Form1099Misc),
    ("otherincome", DocumentType::Form1099Misc),
];

static FORM_1099_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b1099\s*-?\s*(INT|DIV|MISC|NEC)\b").expect("1099 title pattern must compile")
});

#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    config: MapperConfig,
}

impl FieldMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Maps one recognized document to form fields.
    ///
    /// Unknown document types and generic 1099s whose subtype cannot be
    /// determined yield no mappings. A mapping with no extracted fields is
    /// dropped rather than returned empty.
    pub fn map_to_fields(
        &self,
        payload: &ExtractedDocumentPayload,
    ) -> Vec<TaxDocumentMapping> {
        let Some(document_type) = DocumentType::parse(&payload.document_type) else {
            warn!(document_type = %payload.document_type, "unsupported document type");
            return Vec::new();
        };
        self.map_document(document_type, payload)
    }

    fn map_document(
        &self,
        document_type: DocumentType,
        payload: &ExtractedDocumentPayload,
    ) -> Vec<TaxDocumentMapping> {
        let Some(schema) = document_type.schema() else {
            return match resolve_generic_1099(payload) {
                Some(resolved) => {
                    debug!(%resolved, "resolved generic 1099");
                    self.map_document(resolved, payload)
                }
                None => {
                    warn!("could not determine the 1099 subtype; nothing mapped");
                    Vec::new()
                }
            };
        };

        self.map_schema(document_type, schema, payload)
            .into_iter()
            .collect()
    }

    fn map_schema(
        &self,
        document_type: DocumentType,
        schema: &DocumentSchema,
        payload: &ExtractedDocumentPayload,
    ) -> Option<TaxDocumentMapping> {
        let structured = normalized_fields(&payload.structured_fields);
        let confidence = payload.extraction_confidence.clamp(0.0, 1.0);

        let mut fields = Vec::new();
        let mut structured_count = 0;
        let mut ocr_count = 0;

        for spec in schema.fields {
            if let Some(value) = structured_value(spec, &structured) {
                structured_count += 1;
                fields.push(build_field(
                    spec,
                    document_type,
                    value,
                    confidence,
                    true,
                    spec.source_description.to_string(),
                ));
                continue;
            }

            let Some(fallback) = spec.ocr_fallback else {
                continue;
            };
            if let Some(found) = fallback.ladder().extract(&payload.raw_recognized_text) {
                warn!(
                    %document_type,
                    field = spec.id,
                    pattern = found.pattern,
                    "recovered field from recognized text"
                );
                ocr_count += 1;
                fields.push(build_field(
                    spec,
                    document_type,
                    FieldValue::Amount(found.amount),
                    confidence * self.config.ocr_confidence_factor,
                    false,
                    format!("{} (read from document text)", spec.source_description),
                ));
            }
        }

        if fields.is_empty() {
            debug!(%document_type, "no fields extracted; mapping dropped");
            return None;
        }

        let extraction_method = match (structured_count, ocr_count) {
            (_, 0) => ExtractionMethod::Structured,
            (0, _) => ExtractionMethod::OcrFallback,
            _ => ExtractionMethod::Mixed,
        };
        let mapping_confidence =
            fields.iter().map(|f| f.confidence).sum::<f64>() / fields.len() as f64;

        debug!(
            %document_type,
            fields = fields.len(),
            confidence = mapping_confidence,
            "mapped document"
        );

        Some(TaxDocumentMapping {
            income_category: schema.income_category,
            fields,
            metadata: MappingMetadata {
                document_type,
                confidence: mapping_confidence,
                extraction_method,
            },
        })
    }
}

fn build_field(
    spec: &FieldSpec,
    document_type: DocumentType,
    value: FieldValue,
    confidence: f64,
    is_auto_populated: bool,
    source_description: String,
) -> FormField {
    FormField {
        id: spec.id.to_string(),
        label: spec.label.to_string(),
        value,
        is_auto_populated,
        confidence,
        source_document_type: document_type,
        source_description,
    }
}

/// Structured fields keyed by normalized name; the first of any colliding
/// names wins.
fn normalized_fields(fields: &BTreeMap<String, Value>) -> BTreeMap<String, &Value> {
    let mut normalized = BTreeMap::new();
    for (key, value) in fields {
        normalized.entry(normalize_key(key)).or_insert(value);
    }
    normalized
}

fn structured_value(
    spec: &FieldSpec,
    structured: &BTreeMap<String, &Value>,
) -> Option<FieldValue> {
    spec.keys.iter().find_map(|key| {
        let value = structured.get(&normalize_key(key))?;
        match spec.kind {
            FieldKind::Amount => positive_amount(value).map(FieldValue::Amount),
            FieldKind::Text => text_value(value).map(FieldValue::Text),
        }
    })
}

fn text_value(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Determines the concrete form behind a generic 1099, first from the
/// structured-field names and then from the form title in the text.
fn resolve_generic_1099(payload: &ExtractedDocumentPayload) -> Option<DocumentType> {
    let keys: Vec<String> = payload
        .structured_fields
        .keys()
        .map(|k| normalize_key(k))
        .collect();

    GENERIC_1099_KEY_HINTS
        .iter()
        .find(|(fragment, _)| keys.iter().any(|k| k.contains(fragment)))
        .map(|(_, document_type)| *document_type)
        .or_else(|| {
            FORM_1099_TITLE
                .captures(&payload.raw_recognized_text)
                .and_then(|caps| DocumentType::parse(&format!("1099-{}", &caps[1])))
        })
}
