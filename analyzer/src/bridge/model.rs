use serde::{Deserialize, Serialize};
use vibecore::analysis::Sentiment;
use vibecore::session::View;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// `sentiment: null` clears the filter; a value toggles it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRequest {
    pub view: View,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
