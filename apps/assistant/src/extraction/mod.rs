//! Response extraction: recovers the JSON answer object embedded in free-text model output.
//!
//! Models are asked to answer a numbered question list as a JSON object, but they
//! routinely prefix it with commentary or break answers across lines. `ResponseExtractor`
//! normalizes the text, drops everything before the first `{`, and parses the rest
//! strictly. Anything it cannot parse is written to the diagnostic log and replaced by
//! the fallback record, so one bad answer never stops a batch.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod diagnostic_log;

pub use diagnostic_log::{DiagnosticLog, FileDiagnosticLog};
#[cfg(test)]
pub use diagnostic_log::MemoryDiagnosticLog;

/// Key and value of the single-entry record returned when extraction fails.
pub const FALLBACK_KEY: &str = "1";
pub const FALLBACK_VALUE: &str = "Error: check logs";

/// Only the diagnostic log write can fail; parse failures become the fallback record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to append to diagnostic log: {0}")]
    DiagnosticLog(#[from] std::io::Error),
}

/// Answers recovered from one model response, in the order the model gave them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedRecord(IndexMap<String, String>);

impl ExtractedRecord {
    pub fn fallback() -> Self {
        let mut answers = IndexMap::new();
        answers.insert(FALLBACK_KEY.to_string(), FALLBACK_VALUE.to_string());
        Self(answers)
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtractedRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Why a response was routed to the fallback record.
#[derive(Debug)]
enum Unparseable {
    NoOpeningBrace,
    Json(serde_json::Error),
}

impl fmt::Display for Unparseable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unparseable::NoOpeningBrace => write!(f, "no '{{' in response"),
            Unparseable::Json(e) => write!(f, "{e}"),
        }
    }
}

/// Turns raw model output into an `ExtractedRecord`, logging what it cannot parse.
#[derive(Clone)]
pub struct ResponseExtractor {
    log: Arc<dyn DiagnosticLog>,
}

impl ResponseExtractor {
    pub fn new(log: Arc<dyn DiagnosticLog>) -> Self {
        Self { log }
    }

    /// Extracts the answer object from `raw`.
    ///
    /// Parse failures return `ExtractedRecord::fallback()` after the normalized text is
    /// appended to the diagnostic log. The only error is a failed log write.
    pub fn extract(&self, raw: &str) -> Result<ExtractedRecord, ExtractError> {
        let normalized = normalize(raw);
        debug!("Normalized model output: {normalized}");

        match parse_answers(&normalized) {
            Ok(record) => Ok(record),
            Err(reason) => {
                warn!("Model output is not a JSON answer object ({reason}); see diagnostic log");
                self.log.append(&normalized)?;
                Ok(ExtractedRecord::fallback())
            }
        }
    }
}

/// Newlines become spaces so multi-line answers stay valid JSON strings;
/// pipes become hyphens so the pipe-delimited export keeps its columns.
pub fn normalize(raw: &str) -> String {
    raw.replace('\n', " ").replace('|', "-")
}

fn parse_answers(normalized: &str) -> Result<ExtractedRecord, Unparseable> {
    let start = normalized.find('{').ok_or(Unparseable::NoOpeningBrace)?;
    let object: serde_json::Map<String, Value> =
        serde_json::from_str(&normalized[start..]).map_err(Unparseable::Json)?;

    Ok(object
        .into_iter()
        .map(|(key, value)| (key, answer_text(value)))
        .collect())
}

/// Renders a JSON answer as text. Models sometimes answer scales with bare numbers.
fn answer_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}
