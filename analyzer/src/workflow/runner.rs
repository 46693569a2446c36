use anyhow::Context;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vibecore::aggregate::{summarize, DashboardSummary};
use vibecore::analysis::ResultSet;
use vibecore::export::{encode, ExportFormat};
use vibecore::prelude::Classifier;
use vibecore::session::TextInputKind;

pub struct AnalysisReport {
    pub results: ResultSet,
    pub summary: DashboardSummary,
}

/// One-shot driver: classify a text, summarize it and write exports.
#[derive(Clone)]
pub struct Runner {
    classifier: Arc<dyn Classifier>,
}

impl Runner {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub async fn analyze(&self, text: &str) -> anyhow::Result<AnalysisReport> {
        if text.trim().is_empty() {
            anyhow::bail!("input text is empty");
        }
        let results = self
            .classifier
            .classify(text)
            .await
            .with_context(|| format!("classifying text with {}", self.classifier.name()))?;
        let summary = summarize(&results);
        info!(
            "classified {} sentences ({:.1}% positive)",
            summary.total_analyzed, summary.positive_percentage
        );
        Ok(AnalysisReport { results, summary })
    }

    pub fn write_exports(
        &self,
        results: &ResultSet,
        formats: &[ExportFormat],
        dir: &Path,
    ) -> anyhow::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating export directory {}", dir.display()))?;
        let mut written = Vec::with_capacity(formats.len());
        for format in formats {
            let file = encode(results, *format);
            let path = dir.join(file.filename);
            fs::write(&path, &file.bytes)
                .with_context(|| format!("writing {} export {}", format, path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Reads a `.txt` or `.md` file verbatim; other file types are refused.
pub fn load_input(path: &Path) -> anyhow::Result<String> {
    TextInputKind::from_path(path)?;
    fs::read_to_string(path).with_context(|| format!("reading input {}", path.display()))
}
