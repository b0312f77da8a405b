use async_trait::async_trait;
use glosscast_core::CaptureError;

/// A speech-recognition backend producing at most one final phrase per
/// listening window.
///
/// Backends run in single-utterance mode: each call to
/// [`listen_once`](Recognizer::listen_once) opens one window and resolves
/// with `Ok(Some(phrase))` when a final phrase is available, `Ok(None)`
/// when the window closes without speech, or an error. Interim results
/// are never surfaced.
#[async_trait]
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &str;

    /// One-time setup with the backend's TOML table and the locale tag
    /// utterances are recognized in.
    async fn initialize(&mut self, language: &str, config: toml::Value)
        -> Result<(), CaptureError>;

    /// Listen for a single utterance.
    async fn listen_once(&self) -> Result<Option<String>, CaptureError>;
}
