use thiserror::Error;

use crate::documents::DocumentError;
use crate::extraction::ExtractError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Every batch job and CLI command returns `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Diagnostic log error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short machine-readable code, logged alongside the message when a run aborts.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Document(_) => "DOCUMENT_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Extract(_) => "DIAGNOSTIC_LOG_ERROR",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Export(format!("JSON: {e}"))
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(format!("pipe-delimited: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_and_code() {
        let err = AppError::Validation("no CV found".to_string());
        assert_eq!(err.to_string(), "Validation error: no CV found");
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_llm_error_converts() {
        let err: AppError = LlmError::EmptyContent.into();
        assert_eq!(err.code(), "LLM_ERROR");
        assert!(err.to_string().contains("empty content"));
    }

    #[test]
    fn test_rate_limit_surfaces_as_llm_error() {
        let err: AppError = LlmError::RateLimited { retries: 3 }.into();
        assert_eq!(err.code(), "LLM_ERROR");
        assert_eq!(err.to_string(), "LLM error: Rate limited after 3 retries");
    }
}
