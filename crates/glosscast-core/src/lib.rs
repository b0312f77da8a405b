pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use config::AppConfig;
pub use error::{CaptureError, ConfigError, SessionError, TranslateError};
pub use state::{DisplayState, StateEvent, UiCommand};
pub use types::{JobStatus, SignUpdate, TranslationResult};
