use async_trait::async_trait;

use crate::analysis::ResultSet;

/// User-facing line shown for any classification failure other than missing configuration.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to analyze sentiment. Please check the logs for more details.";

/// Failure modes of a classification call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("{0}")]
    NotConfigured(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("classification service error ({status}): {body}")]
    Service { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ClassificationError {
    /// One-line message safe to show to the end user.
    ///
    /// Configuration problems are surfaced verbatim since they carry the
    /// remediation steps; everything else collapses into a generic line.
    pub fn user_message(&self) -> String {
        match self {
            ClassificationError::NotConfigured(message) => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ClassificationError::NotConfigured(_))
    }
}

pub type ClassificationResult<T> = Result<T, ClassificationError>;

/// Rejections raised by session transitions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("input text is empty")]
    EmptyInput,
    #[error("an analysis is already in progress")]
    Busy,
    #[error("{0}")]
    ConfigurationRequired(String),
}

/// Rejections raised by the text-file input side-channel.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Unsupported file type. Please upload a .txt or .md file.")]
    UnsupportedFileType(String),
}

/// Remote (or local) service that splits text into sentences and labels each one.
///
/// Implementations perform exactly one round trip per call.
#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> ClassificationResult<ResultSet>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_keep_their_message() {
        let err = ClassificationError::NotConfigured("set API_KEY".into());
        assert!(err.is_configuration());
        assert_eq!(err.user_message(), "set API_KEY");
    }

    #[test]
    fn other_errors_collapse_to_generic_message() {
        let err = ClassificationError::Service {
            status: 500,
            body: "stack trace".into(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        assert!(!err.user_message().contains("stack trace"));
    }
}
