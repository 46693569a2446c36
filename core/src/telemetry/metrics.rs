use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Counters for analysis requests handled by one session.
pub struct MetricsRecorder {
    inner: Mutex<AnalysisMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    pub submitted: usize,
    pub completed: usize,
    pub failed: usize,
    pub rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(AnalysisMetrics::default()),
        }
    }

    pub fn record_submitted(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.submitted += 1;
        }
    }

    pub fn record_completed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.completed += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> AnalysisMetrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_submitted();
        recorder.record_submitted();
        recorder.record_completed();
        recorder.record_failed();
        recorder.record_rejected();
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.submitted, 2);
        assert_eq!(snapshot.completed, 1);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.rejected, 1);
    }
}
