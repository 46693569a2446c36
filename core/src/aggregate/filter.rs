use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, ResultSet, Sentiment};

/// Either no filter, or a single selected sentiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(Option<Sentiment>);

impl FilterState {
    pub const NONE: FilterState = FilterState(None);

    pub fn only(sentiment: Sentiment) -> Self {
        Self(Some(sentiment))
    }

    pub fn selected(self) -> Option<Sentiment> {
        self.0
    }

    pub fn is_active(self) -> bool {
        self.0.is_some()
    }

    /// Selecting the sentiment that is already active clears the filter.
    pub fn toggled(self, sentiment: Sentiment) -> Self {
        if self.0 == Some(sentiment) {
            Self::NONE
        } else {
            Self::only(sentiment)
        }
    }

    pub fn cleared(self) -> Self {
        Self::NONE
    }

    pub fn matches(self, result: &AnalysisResult) -> bool {
        self.0.map_or(true, |sentiment| result.sentiment == sentiment)
    }
}

/// Narrows `results` to the active filter, preserving order. Never mutates its input.
pub fn visible_results(results: &[AnalysisResult], filter: FilterState) -> ResultSet {
    results
        .iter()
        .filter(|result| filter.matches(result))
        .cloned()
        .collect()
}
