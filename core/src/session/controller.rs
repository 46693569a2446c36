use serde::{Deserialize, Serialize};

use crate::aggregate::{DashboardSummary, FilterState};
use crate::analysis::{ResultSet, Sentiment};
use crate::export::{encode, ExportFile, ExportFormat};
use crate::prelude::{ClassificationError, ClassificationResult, SessionError};
use crate::session::state::{SessionEvent, SessionState, SessionStatus, View};
use crate::telemetry::{AnalysisMetrics, LogManager, MetricsRecorder};

/// Wire view of a session as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub view: View,
    pub filter: FilterState,
    pub loading: bool,
    pub dashboard_visible: bool,
    pub summary: DashboardSummary,
    pub visible_results: ResultSet,
    pub total_results: usize,
    #[serde(default)]
    pub metrics: AnalysisMetrics,
}

/// Single owner of the session state. All mutations go through `SessionState::apply`.
pub struct SessionController {
    state: SessionState,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl SessionController {
    pub fn new() -> Self {
        Self::with_state(SessionState::default())
    }

    pub fn configuration_required(message: impl Into<String>) -> Self {
        Self::with_state(SessionState::configuration_required(message))
    }

    pub fn with_state(state: SessionState) -> Self {
        Self {
            state,
            logger: LogManager::with_target("vibecore::session"),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> Result<&SessionState, SessionError> {
        self.state = self.state.apply(event)?;
        Ok(&self.state)
    }

    /// Starts an analysis. Refused while another one is in flight.
    pub fn submit(&mut self, text: &str) -> Result<(), SessionError> {
        match self.state.apply(SessionEvent::Submit(text.to_string())) {
            Ok(next) => {
                self.state = next;
                self.metrics.record_submitted();
                self.logger
                    .record(&format!("analysis submitted ({} chars)", text.len()));
                Ok(())
            }
            Err(err) => {
                self.metrics.record_rejected();
                self.logger.warn(&format!("submission rejected: {}", err));
                Err(err)
            }
        }
    }

    /// Applies the outcome of the in-flight classification, whatever the state is now.
    pub fn complete(&mut self, outcome: ClassificationResult<ResultSet>) {
        let event = match outcome {
            Ok(results) => {
                self.metrics.record_completed();
                self.logger
                    .record(&format!("analysis completed with {} results", results.len()));
                SessionEvent::Classified(results)
            }
            Err(err) => {
                self.metrics.record_failed();
                self.logger
                    .error(&format!("error analyzing sentiment: {}", err));
                match err {
                    ClassificationError::NotConfigured(message) => {
                        SessionEvent::ConfigurationMissing(message)
                    }
                    other => SessionEvent::Failed(other.user_message()),
                }
            }
        };
        self.apply_infallible(event);
    }

    pub fn toggle_filter(&mut self, sentiment: Sentiment) {
        self.apply_infallible(SessionEvent::ToggleFilter(sentiment));
    }

    pub fn clear_filter(&mut self) {
        self.apply_infallible(SessionEvent::ClearFilter);
    }

    pub fn show(&mut self, view: View) {
        self.apply_infallible(match view {
            View::Analyzer => SessionEvent::ShowAnalyzer,
            View::Dashboard => SessionEvent::ShowDashboard,
        });
    }

    // Only `Submit` can be refused; every other event always yields a state.
    fn apply_infallible(&mut self, event: SessionEvent) {
        if let Ok(next) = self.state.apply(event) {
            self.state = next;
        }
    }

    /// Encodes every result of the session, regardless of the active filter.
    pub fn export(&self, format: ExportFormat) -> ExportFile {
        encode(&self.state.results, format)
    }

    pub fn metrics(&self) -> AnalysisMetrics {
        self.metrics.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.state.status.clone(),
            view: self.state.view,
            filter: self.state.filter,
            loading: self.state.is_loading(),
            dashboard_visible: self.state.dashboard_visible(),
            summary: self.state.summary(),
            visible_results: self.state.visible(),
            total_results: self.state.results.len(),
            metrics: self.metrics.snapshot(),
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::prelude::GENERIC_FAILURE_MESSAGE;

    fn results() -> ResultSet {
        vec![
            AnalysisResult::new("Good, really \"good\".", Sentiment::Positive, 0.9),
            AnalysisResult::new("Bad.", Sentiment::Negative, 0.4),
            AnalysisResult::new("Fine.", Sentiment::Neutral, 0.6),
        ]
    }

    fn ready() -> SessionController {
        let mut controller = SessionController::new();
        controller.submit("Good. Bad. Fine.").unwrap();
        controller.complete(Ok(results()));
        controller
    }

    #[test]
    fn controller_runs_full_cycle() {
        let controller = ready();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert!(snapshot.dashboard_visible);
        assert_eq!(snapshot.total_results, 3);
        assert_eq!(snapshot.summary.positive_count, 1);
        assert_eq!(controller.metrics().completed, 1);
    }

    #[test]
    fn concurrent_submission_is_refused_and_counted() {
        let mut controller = SessionController::new();
        controller.submit("first").unwrap();
        assert_eq!(controller.submit("second"), Err(SessionError::Busy));
        let metrics = controller.metrics();
        assert_eq!(metrics.submitted, 1);
        assert_eq!(metrics.rejected, 1);
    }

    #[test]
    fn failure_surfaces_generic_message_only() {
        let mut controller = ready();
        controller.submit("again").unwrap();
        controller.complete(Err(ClassificationError::Request(
            "connection reset by peer".into(),
        )));
        let state = controller.state();
        assert_eq!(state.error_message(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(state.results.len(), 3);
        assert_eq!(controller.metrics().failed, 1);
    }

    #[test]
    fn missing_credential_blocks_session() {
        let mut controller = SessionController::new();
        controller.submit("text").unwrap();
        controller.complete(Err(ClassificationError::NotConfigured(
            "set API_KEY".into(),
        )));
        assert_eq!(
            controller.submit("text"),
            Err(SessionError::ConfigurationRequired("set API_KEY".into()))
        );
    }

    #[test]
    fn export_ignores_active_filter() {
        let mut controller = ready();
        controller.toggle_filter(Sentiment::Negative);
        assert_eq!(controller.snapshot().visible_results.len(), 1);

        let file = controller.export(ExportFormat::Json);
        let decoded: Vec<AnalysisResult> = serde_json::from_slice(&file.bytes).unwrap();
        assert_eq!(decoded, results());

        let csv = String::from_utf8(controller.export(ExportFormat::Csv).bytes).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn view_changes_follow_state_rules() {
        let mut controller = SessionController::new();
        controller.show(View::Dashboard);
        assert_eq!(controller.state().view, View::Analyzer);

        let mut controller = ready();
        controller.toggle_filter(Sentiment::Positive);
        controller.show(View::Analyzer);
        assert_eq!(controller.state().view, View::Analyzer);
        assert!(!controller.state().filter.is_active());
        controller.show(View::Dashboard);
        assert!(controller.snapshot().dashboard_visible);
    }

    #[test]
    fn snapshot_round_trips_over_json() {
        let mut controller = ready();
        controller.toggle_filter(Sentiment::Positive);
        let snapshot = controller.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, snapshot.status);
        assert_eq!(back.filter, snapshot.filter);
        assert_eq!(back.visible_results, snapshot.visible_results);
        assert_eq!(back.metrics, snapshot.metrics);
        assert!((back.summary.avg_confidence - snapshot.summary.avg_confidence).abs() < 1e-9);
        controller.clear_filter();
        assert_eq!(controller.snapshot().visible_results.len(), 3);
    }
}
