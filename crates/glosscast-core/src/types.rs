use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a remote translation job, as reported by the workflow's
/// status endpoint.
///
/// Only `SUCCEEDED`, `FAILED` and `TIMED_OUT` are terminal. Any other
/// status string maps to [`JobStatus::Pending`] and keeps the poll loop
/// running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "SUCCEEDED" => JobStatus::Succeeded,
            "FAILED" => JobStatus::Failed,
            "TIMED_OUT" => JobStatus::TimedOut,
            _ => JobStatus::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::TimedOut => "TIMED_OUT",
        };
        f.write_str(name)
    }
}

/// A finished translation: the animation asset URLs plus any input
/// segments the pipeline skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub pose_url: String,
    pub sign_url: String,
    pub skipped: Vec<String>,
}

/// The payload shared between participants, either inside a custom event
/// or in the call's shared custom data.
///
/// Both fields are independently optional: a peer applies whichever URLs
/// are present and leaves the rest of its display untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpdate {
    #[serde(rename = "poseURL", default, skip_serializing_if = "Option::is_none")]
    pub pose_url: Option<String>,
    #[serde(rename = "signURL", default, skip_serializing_if = "Option::is_none")]
    pub sign_url: Option<String>,
}

impl SignUpdate {
    pub fn from_result(result: &TranslationResult) -> Self {
        SignUpdate {
            pose_url: Some(result.pose_url.clone()),
            sign_url: Some(result.sign_url.clone()),
        }
    }
}
