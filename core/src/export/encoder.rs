use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

const CSV_HEADER: &str = "Text,Sentiment,Confidence\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Json => "sentiment_analysis.json",
            ExportFormat::Csv => "sentiment_analysis.csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format {:?}", other)),
        }
    }
}

/// Encoded download: payload plus the name and MIME type to offer it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub filename: &'static str,
    pub mime_type: &'static str,
}

/// Serializes the full result list. Callers pass the unfiltered results.
pub fn encode(results: &[AnalysisResult], format: ExportFormat) -> ExportFile {
    let bytes = match format {
        ExportFormat::Json => encode_json(results),
        ExportFormat::Csv => encode_csv(results).into_bytes(),
    };
    ExportFile {
        bytes,
        filename: format.filename(),
        mime_type: format.mime_type(),
    }
}

fn encode_json(results: &[AnalysisResult]) -> Vec<u8> {
    // Non-finite confidences serialize as null; nothing in this shape can fail.
    serde_json::to_vec_pretty(results).unwrap_or_default()
}

fn encode_csv(results: &[AnalysisResult]) -> String {
    let rows = results
        .iter()
        .map(|r| {
            format!(
                "\"{}\",{},{}",
                r.text.replace('"', "\"\""),
                r.sentiment.wire_label(),
                r.confidence
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}{}", CSV_HEADER, rows)
}
