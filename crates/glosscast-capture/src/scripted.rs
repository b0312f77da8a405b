use crate::recognizer::Recognizer;
use async_trait::async_trait;
use glosscast_core::CaptureError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Recognizer that replays configured phrases, one per listening window.
///
/// Each window sleeps for the configured delay and then yields the next
/// phrase, or `None` once the script runs out. Stands in for a live
/// microphone backend in demos and tests.
pub struct ScriptedRecognizer {
    language: Option<String>,
    delay: Duration,
    phrases: Mutex<VecDeque<String>>,
    listen_count: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self {
            language: None,
            delay: Duration::from_millis(150),
            phrases: Mutex::new(VecDeque::new()),
            listen_count: AtomicUsize::new(0),
        }
    }

    pub fn listen_count(&self) -> usize {
        self.listen_count.load(Ordering::Relaxed)
    }

    pub fn remaining_phrases(&self) -> usize {
        self.phrases.lock().unwrap().len()
    }
}

impl Default for ScriptedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn initialize(
        &mut self,
        language: &str,
        config: toml::Value,
    ) -> Result<(), CaptureError> {
        self.language = Some(language.to_string());

        if let Some(delay_ms) = config.get("delay_ms").and_then(|v| v.as_integer()) {
            if delay_ms < 0 {
                return Err(CaptureError::InitializationFailed(
                    "'delay_ms' must not be negative".to_string(),
                ));
            }
            self.delay = Duration::from_millis(delay_ms as u64);
        }

        let phrases: VecDeque<String> = config
            .get("phrases")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();

        tracing::info!(
            language = %language,
            phrases = phrases.len(),
            "ScriptedRecognizer initialized"
        );
        *self.phrases.lock().unwrap() = phrases;
        Ok(())
    }

    async fn listen_once(&self) -> Result<Option<String>, CaptureError> {
        let count = self.listen_count.fetch_add(1, Ordering::Relaxed) + 1;
        tokio::time::sleep(self.delay).await;
        let phrase = self.phrases.lock().unwrap().pop_front();
        tracing::trace!("ScriptedRecognizer window #{count}: {phrase:?}");
        Ok(phrase)
    }
}
