pub mod gemini;

use async_trait::async_trait;
use vibecore::analysis::ResultSet;
use vibecore::prelude::{ClassificationError, ClassificationResult, Classifier};

pub use gemini::GeminiClassifier;

/// Stand-in used when no credential is available; every call reports the
/// configuration problem.
pub struct UnconfiguredClassifier {
    message: String,
}

impl UnconfiguredClassifier {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Classifier for UnconfiguredClassifier {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn classify(&self, _text: &str) -> ClassificationResult<ResultSet> {
        Err(ClassificationError::NotConfigured(self.message.clone()))
    }
}
