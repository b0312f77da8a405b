use crate::types::JobStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("recognizer initialization failed: {0}")]
    InitializationFailed(String),

    #[error("speech recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("recognizer not found: {0}")]
    RecognizerNotFound(String),
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("submit request failed: {0}")]
    SubmitFailed(String),

    #[error("no executionArn in submit response")]
    MissingExecutionArn,

    #[error("status request failed: {0}")]
    DescribeFailed(String),

    #[error("translation job ended with status {0}")]
    ExecutionFailed(JobStatus),

    #[error("failed to parse execution output: {0}")]
    BadOutput(String),

    #[error("translation job exceeded its polling deadline")]
    DeadlineExceeded,

    #[error("translation job superseded by a newer utterance")]
    Superseded,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session provider not found: {0}")]
    ProviderNotFound(String),

    #[error("failed to send custom event: {0}")]
    SendFailed(String),

    #[error("call session closed")]
    Closed,
}
