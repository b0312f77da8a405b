use crate::recognizer::Recognizer;
use glosscast_core::CaptureError;
use std::collections::HashMap;

pub struct RecognizerRegistry {
    factories: HashMap<String, fn() -> Box<dyn Recognizer>>,
}

impl RecognizerRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("scripted", || {
            Box::new(crate::scripted::ScriptedRecognizer::new())
        });
        #[cfg(feature = "whisper")]
        registry.register("whisper", || {
            Box::new(crate::whisper::WhisperRecognizer::new())
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn Recognizer>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Recognizer>, CaptureError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| CaptureError::RecognizerNotFound(name.to_string()))
    }

    pub fn list_recognizers(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for RecognizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
