use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    /// Absent on receive-only clients: no jobs are submitted, but
    /// updates from other participants are still displayed.
    #[serde(default)]
    pub translate: Option<TranslateConfig>,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaptureConfig {
    #[serde(default = "default_recognizer")]
    pub recognizer: String,

    /// Locale tag utterances are recognized in, fixed for the session.
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub scripted: Option<ScriptedConfig>,

    #[serde(default)]
    pub whisper: Option<WhisperConfig>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            recognizer: default_recognizer(),
            language: default_language(),
            scripted: None,
            whisper: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScriptedConfig {
    /// Phrases yielded one per listening window, in order.
    #[serde(default)]
    pub phrases: Vec<String>,

    #[serde(default = "default_scripted_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WhisperConfig {
    pub model_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslateConfig {
    /// Endpoint that accepts a transcript and starts a translation job.
    pub submit_url: String,

    /// Endpoint that reports a job's status and, once succeeded, its output.
    pub status_url: String,

    #[serde(default)]
    pub access_key: Option<String>,

    #[serde(default)]
    pub secret_key: Option<String>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// When set, a job still pending after this many seconds is abandoned.
    #[serde(default)]
    pub max_poll_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_call_id")]
    pub call_id: String,

    #[serde(default = "default_participant")]
    pub participant: String,

    #[serde(default = "default_poll_interval_ms")]
    pub state_poll_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            call_id: default_call_id(),
            participant: default_participant(),
            state_poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recognizer() -> String {
    "scripted".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_scripted_delay_ms() -> u64 {
    150
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_call_id() -> String {
    "default".to_string()
}

fn default_participant() -> String {
    "local".to_string()
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_valid_toml() {
        let toml_str = r#"
[general]
log_level = "debug"

[capture]
recognizer = "scripted"
language = "en-GB"

[capture.scripted]
phrases = ["hello there", "see you later"]
delay_ms = 50

[translate]
submit_url = "https://api.example.com/translate"
status_url = "https://api.example.com/translate/status"
poll_interval_ms = 500
max_poll_secs = 30

[session]
provider = "local"
call_id = "standup"
participant = "alex"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.capture.recognizer, "scripted");
        assert_eq!(config.capture.language, "en-GB");
        let scripted = config.capture.scripted.unwrap();
        assert_eq!(scripted.phrases.len(), 2);
        assert_eq!(scripted.delay_ms, 50);
        let translate = config.translate.unwrap();
        assert_eq!(translate.submit_url, "https://api.example.com/translate");
        assert_eq!(translate.poll_interval_ms, 500);
        assert_eq!(translate.max_poll_secs, Some(30));
        assert!(translate.access_key.is_none());
        assert_eq!(config.session.call_id, "standup");
        assert_eq!(config.session.participant, "alex");
    }

    #[test]
    fn test_config_default_values() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.capture.recognizer, "scripted");
        assert_eq!(config.capture.language, "en-US");
        assert!(config.capture.scripted.is_none());
        assert!(config.translate.is_none());
        assert_eq!(config.session.provider, "local");
        assert_eq!(config.session.call_id, "default");
        assert_eq!(config.session.participant, "local");
        assert_eq!(config.session.state_poll_interval_ms, 2000);
    }

    #[test]
    fn test_config_poll_interval_defaults() {
        let toml_str = r#"
[translate]
submit_url = "https://api.example.com/translate"
status_url = "https://api.example.com/translate/status"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        let translate = config.translate.unwrap();
        assert_eq!(translate.poll_interval_ms, 2000);
        assert!(translate.max_poll_secs.is_none());
    }

    #[test]
    fn test_config_env_var_interpolation() {
        std::env::set_var("GLOSSCAST_TEST_TOKEN", "secret123");
        let toml_str = r#"
[translate]
submit_url = "https://api.example.com/translate"
status_url = "https://api.example.com/translate/status"
access_key = "${GLOSSCAST_TEST_TOKEN}"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(
            config.translate.unwrap().access_key.as_deref(),
            Some("secret123")
        );
        std::env::remove_var("GLOSSCAST_TEST_TOKEN");
    }

    #[test]
    fn test_config_missing_env_var_error() {
        let toml_str = r#"
[translate]
submit_url = "https://api.example.com/translate"
status_url = "https://api.example.com/translate/status"
secret_key = "${DEFINITELY_DOES_NOT_EXIST_12345}"
"#;
        let result = AppConfig::from_toml_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("DEFINITELY_DOES_NOT_EXIST_12345"));
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let toml_str = "this is not valid toml [[[";
        let result = AppConfig::from_toml_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_translate_requires_urls() {
        let toml_str = r#"
[translate]
poll_interval_ms = 1000
"#;
        assert!(AppConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = std::env::temp_dir().join("glosscast_test_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.toml");
        std::fs::write(
            &path,
            r#"
[general]
log_level = "warn"

[session]
call_id = "room-7"
"#,
        )
        .unwrap();
        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.session.call_id, "room-7");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/glosscast.toml"));
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
