use crate::recognizer::Recognizer;
use async_trait::async_trait;
use glosscast_core::CaptureError;

pub struct WhisperRecognizer {
    model_path: Option<String>,
    language: Option<String>,
}

impl WhisperRecognizer {
    pub fn new() -> Self {
        Self {
            model_path: None,
            language: None,
        }
    }
}

impl Default for WhisperRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Recognizer for WhisperRecognizer {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn initialize(
        &mut self,
        language: &str,
        config: toml::Value,
    ) -> Result<(), CaptureError> {
        let model_path = config
            .get("model_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                CaptureError::InitializationFailed(
                    "missing 'model_path' in whisper config".to_string(),
                )
            })?;
        self.model_path = Some(model_path.to_string());
        self.language = Some(language.to_string());

        tracing::info!(
            model_path = %model_path,
            language = %language,
            "WhisperRecognizer initialized (stub, model not loaded)"
        );
        Ok(())
    }

    async fn listen_once(&self) -> Result<Option<String>, CaptureError> {
        // Stub: real capture deferred to when whisper-rs is actually wired
        Ok(None)
    }
}
