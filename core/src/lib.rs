//! Core of the VibeAnalytics sentiment dashboard.
//!
//! Classification itself happens in an external service; this crate holds the
//! data model, the aggregation and filtering that turn a result list into
//! dashboard state, the export encoders, and the session state machine.

pub mod aggregate;
pub mod analysis;
pub mod export;
pub mod prelude;
pub mod session;
pub mod telemetry;

pub use analysis::{AnalysisResult, ResultSet, Sentiment};
pub use prelude::{ClassificationError, Classifier, InputError, SessionError};
