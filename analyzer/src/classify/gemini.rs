//! Google Gemini classification client.
//!
//! The API key is only ever sent to the configured Gemini endpoint, in a header
//! rather than the query string so it stays out of request logs.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use vibecore::analysis::{build_prompt, parse_results, response_schema, ResultSet};
use vibecore::prelude::{ClassificationError, ClassificationResult, Classifier};

use crate::workflow::config::AnalyzerConfig;

pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClassifier {
    /// Builds a client from configuration, failing with `NotConfigured` when the
    /// credential is missing.
    pub fn from_config(config: &AnalyzerConfig) -> ClassificationResult<Self> {
        let api_key = config.resolve_credential()?;
        Self::new(
            api_key,
            &config.api_base,
            &config.model,
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    pub fn new(
        api_key: String,
        api_base: &str,
        model: &str,
        timeout: Duration,
    ) -> ClassificationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClassificationError::Request(err.to_string()))?;
        Ok(Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.api_base, self.model)
    }

    async fn send_request(&self, request: &GeminiRequest) -> ClassificationResult<GeminiResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| ClassificationError::Request(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Service { status, body });
        }

        response
            .json::<GeminiResponse>()
            .await
            .map_err(|err| ClassificationError::MalformedResponse(err.to_string()))
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn classify(&self, text: &str) -> ClassificationResult<ResultSet> {
        let request = GeminiRequest::for_text(text);
        debug!("sending {} chars to {}", text.len(), self.model);
        let response = self.send_request(&request).await?;
        let payload = response.into_text()?;
        parse_results(&payload)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

impl GeminiRequest {
    fn for_text(text: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".into()),
                parts: vec![GeminiPart {
                    text: Some(build_prompt(text)),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: response_schema(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> ClassificationResult<String> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or_else(|| {
                ClassificationError::MalformedResponse("response contained no candidates".into())
            })?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err(ClassificationError::MalformedResponse(
                "response candidate had no text".into(),
            ));
        }
        Ok(text)
    }
}
