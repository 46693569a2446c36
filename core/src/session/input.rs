use std::path::Path;

use crate::prelude::InputError;

/// Text file formats accepted by the file input of the Analyzer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputKind {
    PlainText,
    Markdown,
}

impl TextInputKind {
    pub fn from_mime(mime: &str) -> Result<Self, InputError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "text/plain" => Ok(TextInputKind::PlainText),
            "text/markdown" => Ok(TextInputKind::Markdown),
            other => Err(InputError::UnsupportedFileType(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("txt") => Ok(TextInputKind::PlainText),
            Some("md") | Some("markdown") => Ok(TextInputKind::Markdown),
            _ => Err(InputError::UnsupportedFileType(path.display().to_string())),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            TextInputKind::PlainText => "text/plain",
            TextInputKind::Markdown => "text/markdown",
        }
    }
}
