use serde::{Deserialize, Serialize};

use crate::aggregate::{summarize, visible_results, DashboardSummary, FilterState};
use crate::analysis::{ResultSet, Sentiment};
use crate::prelude::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
    Error(String),
    ConfigurationRequired(String),
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Loading => "loading",
            SessionStatus::Ready => "ready",
            SessionStatus::Error(_) => "error",
            SessionStatus::ConfigurationRequired(_) => "configuration_required",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Analyzer,
    Dashboard,
}

/// Inputs that drive the session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Submit(String),
    Classified(ResultSet),
    Failed(String),
    ConfigurationMissing(String),
    ShowAnalyzer,
    ShowDashboard,
    ToggleFilter(Sentiment),
    ClearFilter,
}

/// Complete state of one analysis session.
///
/// The results are kept apart from the status so a failed request leaves the
/// previously displayed results in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub view: View,
    pub filter: FilterState,
    pub results: ResultSet,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Idle,
            view: View::Analyzer,
            filter: FilterState::NONE,
            results: Vec::new(),
        }
    }
}

impl SessionState {
    /// Session that refuses every analysis until the credential is supplied.
    pub fn configuration_required(message: impl Into<String>) -> Self {
        Self {
            status: SessionStatus::ConfigurationRequired(message.into()),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn configuration_message(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::ConfigurationRequired(message) => Some(message),
            _ => None,
        }
    }

    pub fn dashboard_visible(&self) -> bool {
        self.view == View::Dashboard && !self.results.is_empty()
    }

    pub fn summary(&self) -> DashboardSummary {
        summarize(&self.results)
    }

    pub fn visible(&self) -> ResultSet {
        visible_results(&self.results, self.filter)
    }

    /// Pure transition: returns the next state or the reason the event was refused.
    pub fn apply(&self, event: SessionEvent) -> Result<SessionState, SessionError> {
        let mut next = self.clone();
        match event {
            SessionEvent::Submit(text) => {
                if let SessionStatus::ConfigurationRequired(message) = &self.status {
                    return Err(SessionError::ConfigurationRequired(message.clone()));
                }
                if self.is_loading() {
                    return Err(SessionError::Busy);
                }
                if text.trim().is_empty() {
                    return Err(SessionError::EmptyInput);
                }
                next.status = SessionStatus::Loading;
                next.filter = FilterState::NONE;
            }
            SessionEvent::Classified(results) => {
                next.results = results;
                next.status = SessionStatus::Ready;
                next.view = View::Dashboard;
            }
            SessionEvent::Failed(message) => {
                next.status = SessionStatus::Error(message);
            }
            SessionEvent::ConfigurationMissing(message) => {
                next.status = SessionStatus::ConfigurationRequired(message);
            }
            SessionEvent::ShowAnalyzer => {
                next.view = View::Analyzer;
                next.filter = FilterState::NONE;
            }
            SessionEvent::ShowDashboard => {
                if !self.results.is_empty() {
                    next.view = View::Dashboard;
                }
            }
            SessionEvent::ToggleFilter(sentiment) => {
                next.filter = self.filter.toggled(sentiment);
            }
            SessionEvent::ClearFilter => {
                next.filter = FilterState::NONE;
            }
        }
        Ok(next)
    }
}
