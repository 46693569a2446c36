use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use vibecore::analysis::{AnalysisResult, ResultSet, Sentiment};
use vibecore::prelude::{ClassificationResult, Classifier};

/// Offline classifier producing deterministic pseudo-random labels.
///
/// Used for demos and tests where no classification service is reachable.
pub struct SyntheticClassifier {
    seed: u64,
}

impl SyntheticClassifier {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn label(&self, text: &str) -> ResultSet {
        let sentences = split_sentences(text);
        let mut rng = StdRng::seed_from_u64(self.seed ^ sentences.len() as u64);
        sentences
            .into_iter()
            .map(|sentence| {
                let sentiment = Sentiment::ALL[rng.gen_range(0..Sentiment::ALL.len())];
                let confidence = (rng.gen_range(0.55..0.99) * 100.0_f64).round() / 100.0;
                AnalysisResult::new(sentence, sentiment, confidence)
            })
            .collect()
    }
}

#[async_trait]
impl Classifier for SyntheticClassifier {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn classify(&self, text: &str) -> ClassificationResult<ResultSet> {
        Ok(self.label(text))
    }
}

/// Splits on sentence-ending punctuation and line breaks, keeping the punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            push_sentence(&mut sentences, &mut current);
            continue;
        }
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            push_sentence(&mut sentences, &mut current);
        }
    }
    push_sentence(&mut sentences, &mut current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() && !trimmed.chars().all(|c| matches!(c, '.' | '!' | '?')) {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibecore::analysis::EXAMPLE_TEXT;

    #[test]
    fn splits_on_punctuation_and_newlines() {
        let sentences = split_sentences("Great day! Was it?\nMaybe... not\n\n");
        assert_eq!(sentences, vec!["Great day!", "Was it?", "Maybe.", "not"]);
    }

    #[test]
    fn example_text_yields_six_results() {
        let results = SyntheticClassifier::new(7).label(EXAMPLE_TEXT);
        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|r| r.is_confidence_in_range()));
    }

    #[test]
    fn same_seed_is_deterministic() {
        let a = SyntheticClassifier::new(42).label(EXAMPLE_TEXT);
        let b = SyntheticClassifier::new(42).label(EXAMPLE_TEXT);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn classify_wraps_label() {
        let classifier = SyntheticClassifier::new(1);
        let results = classifier.classify("One. Two.").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "One.");
    }
}
