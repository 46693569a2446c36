use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use vibecore::prelude::{ClassificationError, ClassificationResult};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub model: String,
    pub api_key_env: String,
    pub api_base: String,
    pub bind: String,
    pub request_timeout_secs: u64,
    pub export_dir: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            api_base: DEFAULT_API_BASE.into(),
            bind: "127.0.0.1:9000".into(),
            request_timeout_secs: 60,
            export_dir: PathBuf::from("."),
        }
    }
}

impl AnalyzerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading analyzer config {}", path_ref.display()))?;
        let config: AnalyzerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing analyzer config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("invalid bind address {}", self.bind))
    }

    /// Reads the API credential from the process environment.
    pub fn resolve_credential(&self) -> ClassificationResult<String> {
        self.resolve_credential_with(|name| env::var(name).ok())
    }

    pub fn resolve_credential_with<F>(&self, lookup: F) -> ClassificationResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.api_key_env)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ClassificationError::NotConfigured(self.missing_credential_message()))
    }

    pub fn missing_credential_message(&self) -> String {
        format!(
            "Gemini API key is not configured. Please set the {} environment variable in your deployment settings and restart the analyzer.",
            self.api_key_env
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_defaults_are_usable() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.bind_address().unwrap().port(), 9000);
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"model: gemini-test\napi_key_env: VIBE_KEY\nbind: 0.0.0.0:9100\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(cfg.model, "gemini-test");
        assert_eq!(cfg.api_key_env, "VIBE_KEY");
        assert_eq!(cfg.bind_address().unwrap().port(), 9100);
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"request_timeout_secs: [not, a, number]\n").unwrap();
        let path = temp.into_temp_path();
        let err = AnalyzerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("parsing analyzer config"));
    }

    #[test]
    fn missing_or_blank_credential_is_a_configuration_error() {
        let cfg = AnalyzerConfig::default();
        let err = cfg.resolve_credential_with(|_| None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("API_KEY"));
        assert!(cfg
            .resolve_credential_with(|_| Some("  ".into()))
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn credential_is_read_from_named_variable() {
        let cfg = AnalyzerConfig {
            api_key_env: "VIBE_KEY".into(),
            ..AnalyzerConfig::default()
        };
        let key = cfg
            .resolve_credential_with(|name| (name == "VIBE_KEY").then(|| "secret".to_string()))
            .unwrap();
        assert_eq!(key, "secret");
    }
}
