//! Typed view over the backend's fact-check payload.
//!
//! The payload travels as an opaque JSON value and is stored verbatim on
//! the assistant message. This view is built on demand for display and
//! tolerates missing or unexpected fields.

use serde::Deserialize;

/// Numbers and named entities compared between original and simplified text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FactChecks {
    pub original_numbers: Vec<String>,
    pub simplified_numbers: Vec<String>,
    pub missing_numbers: Vec<String>,
    pub original_entities: Vec<String>,
    pub simplified_entities: Vec<String>,
    pub missing_entities: Vec<String>,
    /// Whether the backend used a real NER model for entity extraction.
    pub used_spacy: bool,
}

impl FactChecks {
    /// Interpret a raw `checks` value. Returns `None` for non-object payloads.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// True when every number and entity of the original survived.
    #[must_use]
    pub fn is_faithful(&self) -> bool {
        self.missing_numbers.is_empty() && self.missing_entities.is_empty()
    }
}
