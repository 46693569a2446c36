//! Derived dashboard figures.
//!
//! Everything here is recomputed from a `ResultSet` on demand and never stored,
//! so the summary cannot drift from the results it describes.

use serde::{Deserialize, Serialize};

use crate::aggregate::stats::StatsHelper;
use crate::analysis::{AnalysisResult, Sentiment};

/// One categorical slice of the sentiment distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub label: String,
    pub value: usize,
}

impl DistributionSlice {
    /// Share of `total` held by this slice, in percent.
    pub fn share(&self, total: usize) -> f64 {
        StatsHelper::percentage(self.value, total)
    }

    /// Sentiment this slice counts.
    pub fn sentiment(&self) -> Option<Sentiment> {
        Sentiment::parse(&self.label)
    }
}

/// Per-result confidence point for sequential charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub subject: &'static str,
    pub value: f64,
    pub full_mark: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
    pub avg_confidence: f64,
    pub sentiment_distribution: Vec<DistributionSlice>,
    pub recent_scores: Vec<ScorePoint>,
    pub total_analyzed: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
}

/// Aggregates a result list into dashboard figures. Total: never fails.
pub fn summarize(results: &[AnalysisResult]) -> DashboardSummary {
    if results.is_empty() {
        return DashboardSummary::default();
    }

    let total = results.len();
    let positive = results
        .iter()
        .filter(|r| r.sentiment == Sentiment::Positive)
        .count();
    let negative = results
        .iter()
        .filter(|r| r.sentiment == Sentiment::Negative)
        .count();
    // Whatever is neither positive nor negative is neutral, so the three
    // counts always add up to the total.
    let neutral = total - positive - negative;

    let confidences: Vec<f64> = results.iter().map(|r| r.clamped_confidence()).collect();

    DashboardSummary {
        positive_percentage: StatsHelper::percentage(positive, total),
        negative_percentage: StatsHelper::percentage(negative, total),
        neutral_percentage: StatsHelper::percentage(neutral, total),
        avg_confidence: StatsHelper::mean(&confidences) * 100.0,
        sentiment_distribution: vec![
            DistributionSlice {
                label: Sentiment::Positive.display_label().into(),
                value: positive,
            },
            DistributionSlice {
                label: Sentiment::Negative.display_label().into(),
                value: negative,
            },
            DistributionSlice {
                label: Sentiment::Neutral.display_label().into(),
                value: neutral,
            },
        ],
        recent_scores: results
            .iter()
            .enumerate()
            .map(|(idx, r)| ScorePoint {
                label: format!("Text {}", idx + 1),
                confidence: r.confidence_percent(),
            })
            .collect(),
        total_analyzed: total,
        positive_count: positive,
        negative_count: negative,
        neutral_count: neutral,
    }
}

/// Radar projection: three sentiment shares plus average confidence, all out of 100.
pub fn radar_axes(summary: &DashboardSummary) -> [RadarAxis; 4] {
    let axis = |subject, value| RadarAxis {
        subject,
        value,
        full_mark: 100.0,
    };
    [
        axis("Positive", summary.positive_percentage),
        axis("Negative", summary.negative_percentage),
        axis("Neutral", summary.neutral_percentage),
        axis("Avg Confidence", summary.avg_confidence),
    ]
}
