use serde_json::Value;

use crate::analysis::result::{AnalysisResult, ResultSet};
use crate::prelude::{ClassificationError, ClassificationResult};
use crate::telemetry::LogManager;

/// Parses the service's JSON text payload into a `ResultSet`.
///
/// The outer shape must be an array; anything else is a malformed response.
pub fn parse_results(payload: &str) -> ClassificationResult<ResultSet> {
    let value: Value = serde_json::from_str(payload.trim())
        .map_err(|err| ClassificationError::MalformedResponse(err.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(ClassificationError::MalformedResponse(
                "API returned an invalid format".into(),
            ))
        }
    };

    let logger = LogManager::new();
    let mut results = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let result: AnalysisResult = serde_json::from_value(item).map_err(|err| {
            ClassificationError::MalformedResponse(format!("item {}: {}", idx, err))
        })?;
        if !result.is_confidence_in_range() {
            logger.warn(&format!(
                "confidence {} for item {} is outside [0, 1]",
                result.confidence, idx
            ));
        }
        results.push(result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::Sentiment;

    #[test]
    fn parses_array_payload_in_order() {
        let payload = r#"[
            {"text": "A", "sentiment": "POSITIVE", "confidence": 0.9},
            {"text": "B", "sentiment": "NEGATIVE", "confidence": 0.4}
        ]"#;
        let results = parse_results(payload).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "A");
        assert_eq!(results[1].sentiment, Sentiment::Negative);
    }

    #[test]
    fn rejects_non_array_payload() {
        let err = parse_results(r#"{"text": "A"}"#).unwrap_err();
        assert_eq!(
            err,
            ClassificationError::MalformedResponse("API returned an invalid format".into())
        );
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_results("not json"),
            Err(ClassificationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_items_missing_fields() {
        let err = parse_results(r#"[{"text": "A", "sentiment": "POSITIVE"}]"#).unwrap_err();
        assert!(matches!(
            err,
            ClassificationError::MalformedResponse(msg) if msg.starts_with("item 0")
        ));
    }

    #[test]
    fn keeps_out_of_range_confidence_verbatim() {
        let results =
            parse_results(r#"[{"text": "A", "sentiment": "mixed", "confidence": 1.7}]"#).unwrap();
        assert_eq!(results[0].confidence, 1.7);
        assert_eq!(results[0].sentiment, Sentiment::Neutral);
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_results("[]").unwrap().is_empty());
    }
}
