use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::extraction::ExtractedRecord;

/// Key under which the model's answers are nested in the JSON export.
pub const LLM_RESPONSE_FIELD: &str = "llm_response";

/// One processed input document: its identifying fields plus the extracted answers.
///
/// Serializes as a flat object, identifying fields first, e.g.
/// `{"job_id": "job-001", "job_filename": "...", "job_link": "...", "llm_response": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    fields: Vec<(&'static str, String)>,
    pub llm_response: ExtractedRecord,
}

impl RunRecord {
    pub fn new(llm_response: ExtractedRecord) -> Self {
        Self {
            fields: Vec::new(),
            llm_response,
        }
    }

    pub fn with_field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Serialize for RunRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(LLM_RESPONSE_FIELD, &self.llm_response)?;
        map.end()
    }
}
