use crate::bridge::model::{AnalyzeRequest, ErrorBody, FilterRequest, ViewRequest};
use log::{error, info};
use serde::de::DeserializeOwned;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, thread};
use tokio::runtime::Builder;
use tokio::sync::RwLock;
use vibecore::analysis::ResultSet;
use vibecore::export::ExportFormat;
use vibecore::prelude::{ClassificationError, Classifier, SessionError};
use vibecore::session::SessionController;
use warp::{
    http::{header, StatusCode},
    reply::{Json, WithStatus},
    Filter, Rejection, Reply,
};

const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub type SharedSession = Arc<RwLock<SessionController>>;

/// Hosts the session HTTP endpoints and owns the single session controller.
pub struct AnalyzerBridge {
    session: SharedSession,
}

impl AnalyzerBridge {
    /// Starts serving on `addr` from a dedicated thread.
    pub fn start(
        controller: SessionController,
        classifier: Arc<dyn Classifier>,
        addr: SocketAddr,
    ) -> Self {
        let session = Arc::new(RwLock::new(controller));
        let api = routes(session.clone(), classifier);

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(api).try_bind_ephemeral(addr) {
                    Ok((bound, server)) => {
                        info!("bridge listening on http://{}", bound);
                        server.await;
                    }
                    Err(err) => error!("failed to bind bridge on {}: {}", addr, err),
                }
            });
        });

        Self { session }
    }

    /// Replaces the session results with an externally produced result set.
    pub async fn publish(&self, results: ResultSet) {
        let mut guard = self.session.write().await;
        guard.complete(Ok(results));
        info!(
            "[bridge] published {} results",
            guard.state().results.len()
        );
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }
}

pub fn routes(
    session: SharedSession,
    classifier: Arc<dyn Classifier>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let session_route = warp::path("session")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_session(session.clone()))
        .and_then(handle_session);

    let analyze_route = warp::path("analyze")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<AnalyzeRequest>())
        .and(with_session(session.clone()))
        .and(with_classifier(classifier))
        .and_then(handle_analyze);

    let filter_route = warp::path("filter")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<FilterRequest>())
        .and(with_session(session.clone()))
        .and_then(handle_filter);

    let view_route = warp::path("view")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<ViewRequest>())
        .and(with_session(session.clone()))
        .and_then(handle_view);

    let export_route = warp::path!("export" / String)
        .and(warp::get())
        .and(with_session(session))
        .and_then(handle_export);

    session_route
        .or(analyze_route)
        .or(filter_route)
        .or(view_route)
        .or(export_route)
        .with(warp::log("analyzer::bridge"))
}

fn with_session(
    session: SharedSession,
) -> impl Filter<Extract = (SharedSession,), Error = Infallible> + Clone {
    warp::any().map(move || session.clone())
}

fn with_classifier(
    classifier: Arc<dyn Classifier>,
) -> impl Filter<Extract = (Arc<dyn Classifier>,), Error = Infallible> + Clone {
    warp::any().map(move || classifier.clone())
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn snapshot_reply(controller: &SessionController) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(&controller.snapshot()), StatusCode::OK)
}

fn rejection_reply(err: &SessionError) -> WithStatus<Json> {
    let status = match err {
        SessionError::EmptyInput => StatusCode::BAD_REQUEST,
        SessionError::Busy => StatusCode::CONFLICT,
        SessionError::ConfigurationRequired(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: err.to_string(),
        }),
        status,
    )
}

async fn handle_session(session: SharedSession) -> Result<WithStatus<Json>, Infallible> {
    let guard = session.read().await;
    Ok(snapshot_reply(&guard))
}

async fn handle_analyze(
    request: AnalyzeRequest,
    session: SharedSession,
    classifier: Arc<dyn Classifier>,
) -> Result<WithStatus<Json>, Infallible> {
    let submitted = session.write().await.submit(&request.text);
    if let Err(err) = submitted {
        return Ok(rejection_reply(&err));
    }

    // The classification runs on its own task so a dropped connection cannot
    // strand the session in Loading. The lock is released while it is in
    // flight; the Loading state refuses any other submission meanwhile.
    let task_session = session.clone();
    let text = request.text;
    let job = tokio::spawn(async move {
        let outcome = classifier.classify(&text).await;
        task_session.write().await.complete(outcome);
    });

    if let Err(err) = job.await {
        error!("classification task ended abnormally: {}", err);
        let mut guard = session.write().await;
        if guard.state().is_loading() {
            guard.complete(Err(ClassificationError::Request(err.to_string())));
        }
    }

    let guard = session.read().await;
    Ok(snapshot_reply(&guard))
}

async fn handle_filter(
    request: FilterRequest,
    session: SharedSession,
) -> Result<WithStatus<Json>, Infallible> {
    let mut guard = session.write().await;
    match request.sentiment {
        Some(sentiment) => guard.toggle_filter(sentiment),
        None => guard.clear_filter(),
    }
    Ok(snapshot_reply(&guard))
}

async fn handle_view(
    request: ViewRequest,
    session: SharedSession,
) -> Result<WithStatus<Json>, Infallible> {
    let mut guard = session.write().await;
    guard.show(request.view);
    Ok(snapshot_reply(&guard))
}

async fn handle_export(
    format: String,
    session: SharedSession,
) -> Result<Box<dyn Reply>, Infallible> {
    let format = match format.parse::<ExportFormat>() {
        Ok(format) => format,
        Err(message) => {
            return Ok(Box::new(warp::reply::with_status(
                warp::reply::json(&ErrorBody { error: message }),
                StatusCode::BAD_REQUEST,
            )))
        }
    };

    let file = session.read().await.export(format);
    let reply = warp::reply::with_header(file.bytes, header::CONTENT_TYPE, file.mime_type);
    let reply = warp::reply::with_header(
        reply,
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", file.filename),
    );
    Ok(Box::new(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::UnconfiguredClassifier;
    use crate::generator::synthetic::SyntheticClassifier;
    use async_trait::async_trait;
    use serde_json::json;
    use vibecore::analysis::{AnalysisResult, Sentiment};
    use std::time::Duration;
    use vibecore::prelude::{ClassificationResult, GENERIC_FAILURE_MESSAGE};
    use vibecore::session::{SessionSnapshot, SessionStatus, View};

    struct FailingClassifier;

    #[async_trait]
    impl Classifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing"
        }

        async fn classify(&self, _text: &str) -> ClassificationResult<ResultSet> {
            Err(ClassificationError::MalformedResponse(
                "API returned an invalid format".into(),
            ))
        }
    }

    struct SlowClassifier;

    #[async_trait]
    impl Classifier for SlowClassifier {
        fn name(&self) -> &str {
            "slow"
        }

        async fn classify(&self, text: &str) -> ClassificationResult<ResultSet> {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(vec![AnalysisResult::new(text, Sentiment::Neutral, 0.7)])
        }
    }

    fn shared(controller: SessionController) -> SharedSession {
        Arc::new(RwLock::new(controller))
    }

    fn ready_session() -> SharedSession {
        let mut controller = SessionController::new();
        controller.submit("A. B. C.").unwrap();
        controller.complete(Ok(vec![
            AnalysisResult::new("A", Sentiment::Positive, 0.9),
            AnalysisResult::new("B", Sentiment::Negative, 0.4),
            AnalysisResult::new("C", Sentiment::Positive, 0.6),
        ]));
        shared(controller)
    }

    fn snapshot(body: &[u8]) -> SessionSnapshot {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn analyze_runs_classifier_and_returns_snapshot() {
        let api = routes(
            shared(SessionController::new()),
            Arc::new(SyntheticClassifier::new(5)),
        );
        let response = warp::test::request()
            .method("POST")
            .path("/analyze")
            .json(&json!({"text": "Nice. Awful. Fine."}))
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let snap = snapshot(response.body());
        assert_eq!(snap.status, SessionStatus::Ready);
        assert_eq!(snap.total_results, 3);
        assert!(snap.dashboard_visible);
    }

    #[tokio::test]
    async fn blank_text_is_a_bad_request() {
        let api = routes(
            shared(SessionController::new()),
            Arc::new(SyntheticClassifier::new(5)),
        );
        let response = warp::test::request()
            .method("POST")
            .path("/analyze")
            .json(&json!({"text": "   "}))
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submission_while_loading_conflicts() {
        let mut controller = SessionController::new();
        controller.submit("in flight").unwrap();
        let api = routes(shared(controller), Arc::new(SyntheticClassifier::new(5)));
        let response = warp::test::request()
            .method("POST")
            .path("/analyze")
            .json(&json!({"text": "second"}))
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn missing_configuration_is_unavailable() {
        let message = "set API_KEY";
        let api = routes(
            shared(SessionController::configuration_required(message)),
            Arc::new(UnconfiguredClassifier::new(message)),
        );
        let response = warp::test::request()
            .method("POST")
            .path("/analyze")
            .json(&json!({"text": "hello"}))
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ErrorBody = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body.error, message);
    }

    #[tokio::test]
    async fn classifier_failure_keeps_previous_results() {
        let session = ready_session();
        let api = routes(session.clone(), Arc::new(FailingClassifier));
        let response = warp::test::request()
            .method("POST")
            .path("/analyze")
            .json(&json!({"text": "again"}))
            .reply(&api)
            .await;
        let snap = snapshot(response.body());
        assert_eq!(snap.status, SessionStatus::Error(GENERIC_FAILURE_MESSAGE.into()));
        assert_eq!(snap.total_results, 3);
    }

    #[tokio::test]
    async fn filter_toggles_and_export_stays_complete() {
        let session = ready_session();
        let api = routes(session, Arc::new(SyntheticClassifier::new(5)));

        let response = warp::test::request()
            .method("POST")
            .path("/filter")
            .json(&json!({"sentiment": "NEGATIVE"}))
            .reply(&api)
            .await;
        let snap = snapshot(response.body());
        assert_eq!(snap.visible_results.len(), 1);
        assert_eq!(snap.filter.selected(), Some(Sentiment::Negative));

        let export = warp::test::request()
            .method("GET")
            .path("/export/csv")
            .reply(&api)
            .await;
        assert_eq!(export.status(), StatusCode::OK);
        assert_eq!(export.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            export.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sentiment_analysis.csv\""
        );
        let body = String::from_utf8(export.body().to_vec()).unwrap();
        assert_eq!(body.lines().count(), 4);

        let response = warp::test::request()
            .method("POST")
            .path("/filter")
            .json(&json!({"sentiment": null}))
            .reply(&api)
            .await;
        assert_eq!(snapshot(response.body()).visible_results.len(), 3);
    }

    #[tokio::test]
    async fn unknown_export_format_is_rejected() {
        let api = routes(ready_session(), Arc::new(SyntheticClassifier::new(5)));
        let response = warp::test::request()
            .method("GET")
            .path("/export/xml")
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn view_switch_respects_results() {
        let api = routes(
            shared(SessionController::new()),
            Arc::new(SyntheticClassifier::new(5)),
        );
        let response = warp::test::request()
            .method("POST")
            .path("/view")
            .json(&json!({"view": "dashboard"}))
            .reply(&api)
            .await;
        assert_eq!(snapshot(response.body()).view, View::Analyzer);

        let session = warp::test::request()
            .method("GET")
            .path("/session")
            .reply(&api)
            .await;
        assert_eq!(snapshot(session.body()).status, SessionStatus::Idle);
    }

    #[tokio::test]
    async fn abandoned_analyze_request_still_completes_session() {
        let session = shared(SessionController::new());
        let api = routes(session.clone(), Arc::new(SlowClassifier));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            warp::test::request()
                .method("POST")
                .path("/analyze")
                .json(&json!({"text": "Slow and steady."}))
                .reply(&api),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(session.read().await.state().is_loading());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(session.read().await.state().status, SessionStatus::Ready);
        assert_eq!(session.read().await.state().results.len(), 1);

        let response = warp::test::request()
            .method("POST")
            .path("/analyze")
            .json(&json!({"text": "Next one."}))
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
