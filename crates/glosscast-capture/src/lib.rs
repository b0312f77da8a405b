pub mod controller;
pub mod recognizer;
pub mod registry;
pub mod scripted;
#[cfg(feature = "whisper")]
pub mod whisper;

pub use controller::CaptureController;
pub use recognizer::Recognizer;
pub use registry::RecognizerRegistry;
pub use scripted::ScriptedRecognizer;
#[cfg(feature = "whisper")]
pub use whisper::WhisperRecognizer;
