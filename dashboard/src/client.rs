use serde::Deserialize;
use serde_json::json;
use std::env;
use std::path::PathBuf;
use vibecore::analysis::Sentiment;
use vibecore::export::ExportFormat;
use vibecore::session::{SessionSnapshot, View};

const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:9000";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

fn bridge_url(path: &str) -> String {
    let base = env::var("VIBE_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_BRIDGE_URL.into());
    format!("{}{}", base.trim_end_matches('/'), path)
}

async fn read_snapshot(response: reqwest::Response) -> Result<SessionSnapshot, String> {
    if response.status().is_success() {
        return response
            .json::<SessionSnapshot>()
            .await
            .map_err(|e| e.to_string());
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => Err(body.error),
        Err(_) => Err(format!("{}: {}", status, text)),
    }
}

pub async fn fetch_session() -> Result<SessionSnapshot, String> {
    let response = reqwest::get(bridge_url("/session"))
        .await
        .map_err(|e| e.to_string())?;
    read_snapshot(response).await
}

pub async fn post_analyze(text: String) -> Result<SessionSnapshot, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(bridge_url("/analyze"))
        .json(&json!({ "text": text }))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_snapshot(response).await
}

/// `Some` toggles that sentiment on the analyzer side, `None` clears the filter.
pub async fn post_filter(sentiment: Option<Sentiment>) -> Result<SessionSnapshot, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(bridge_url("/filter"))
        .json(&json!({ "sentiment": sentiment }))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_snapshot(response).await
}

pub async fn post_view(view: View) -> Result<SessionSnapshot, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(bridge_url("/view"))
        .json(&json!({ "view": view }))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_snapshot(response).await
}

/// Downloads an export and saves it in the working directory under its filename.
pub async fn download_export(format: ExportFormat) -> Result<PathBuf, String> {
    let response = reqwest::get(bridge_url(&format!("/export/{}", format)))
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(format!("{}: {}", status, text));
    }
    let filename = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(attachment_filename)
        .unwrap_or_else(|| format.filename().to_string());
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    let path = PathBuf::from(filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| format!("writing {}: {}", path.display(), e))?;
    Ok(path)
}

/// Bare filename from `attachment; filename="..."`, ignoring any directory part.
fn attachment_filename(header: &str) -> Option<String> {
    let (_, rest) = header.split_once("filename=")?;
    let name = rest.split(';').next()?.trim().trim_matches('"');
    let name = name.rsplit(|c: char| c == '/' || c == '\\').next()?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Reads a dropped or typed file path, accepting only plain text and markdown.
pub async fn load_text_file(path: PathBuf) -> Result<(String, String), String> {
    vibecore::session::TextInputKind::from_path(&path).map_err(|e| e.to_string())?;
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| format!("reading {}: {}", path.display(), e))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_filename_is_extracted() {
        assert_eq!(
            attachment_filename("attachment; filename=\"sentiment_analysis.csv\""),
            Some("sentiment_analysis.csv".into())
        );
        assert_eq!(
            attachment_filename("attachment; filename=../../etc/out.json"),
            Some("out.json".into())
        );
        assert_eq!(attachment_filename("inline"), None);
    }

    #[tokio::test]
    async fn unsupported_files_are_refused_before_reading() {
        let err = load_text_file(PathBuf::from("report.pdf")).await.unwrap_err();
        assert_eq!(err, "Unsupported file type. Please upload a .txt or .md file.");
    }
}
