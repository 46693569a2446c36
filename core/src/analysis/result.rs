use std::fmt;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentiment label assigned to a single sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Upper-case literal used on the wire and in exports.
    pub fn wire_label(self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
        }
    }

    /// Title-case label used for charts and cards.
    pub fn display_label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Strict, case-insensitive parse. Returns `None` for unknown labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(Sentiment::Positive),
            "NEGATIVE" => Some(Sentiment::Negative),
            "NEUTRAL" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    /// Lenient parse used for service output: unknown labels count as neutral.
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_else(|| {
            warn!("unrecognized sentiment label {:?}, counting as neutral", label);
            Sentiment::Neutral
        })
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.wire_label())
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_label())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Sentiment::from_label(&label))
    }
}

/// One classified sentence as returned by the classification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

/// Ordered list of results from one analysis call.
pub type ResultSet = Vec<AnalysisResult>;

impl AnalysisResult {
    pub fn new(text: impl Into<String>, sentiment: Sentiment, confidence: f64) -> Self {
        Self {
            text: text.into(),
            sentiment,
            confidence,
        }
    }

    /// Confidence clamped into [0, 1]; non-finite values read as 0.
    pub fn clamped_confidence(&self) -> f64 {
        if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Display percentage in [0, 100].
    pub fn confidence_percent(&self) -> f64 {
        self.clamped_confidence() * 100.0
    }

    pub fn is_confidence_in_range(&self) -> bool {
        self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_parses_case_insensitively() {
        assert_eq!(Sentiment::parse(" positive "), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse("Negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse("mixed"), None);
        assert_eq!(Sentiment::from_label("mixed"), Sentiment::Neutral);
    }

    #[test]
    fn sentiment_serializes_as_wire_label() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"NEGATIVE\"");
        let back: Sentiment = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(back, Sentiment::Neutral);
    }

    #[test]
    fn confidence_percent_is_clamped() {
        assert_eq!(AnalysisResult::new("a", Sentiment::Positive, 1.4).confidence_percent(), 100.0);
        assert_eq!(AnalysisResult::new("a", Sentiment::Positive, -0.2).confidence_percent(), 0.0);
        let nan = AnalysisResult::new("a", Sentiment::Positive, f64::NAN);
        assert_eq!(nan.confidence_percent(), 0.0);
        assert!(!AnalysisResult::new("a", Sentiment::Positive, 1.4).is_confidence_in_range());
        assert!(AnalysisResult::new("a", Sentiment::Positive, 0.5).is_confidence_in_range());
    }
}
