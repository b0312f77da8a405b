use async_trait::async_trait;
use glosscast_core::{JobStatus, TranslateError, TranslationResult};
use serde::{Deserialize, Serialize};

/// Opaque handle identifying a submitted translation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionHandle(pub String);

/// One status observation of a job: where it stands and, once
/// succeeded, its raw output payload.
#[derive(Debug, Clone)]
pub struct ExecutionDescription {
    pub status: JobStatus,
    pub output: Option<String>,
}

/// The remote gloss-to-animation workflow, reduced to job submission
/// and status inspection.
#[async_trait]
pub trait GlossService: Send + Sync {
    /// Submit a transcript for translation and return the job handle.
    async fn submit(&self, text: &str) -> Result<ExecutionHandle, TranslateError>;

    /// Fetch the job's current status.
    async fn describe(&self, handle: &ExecutionHandle) -> Result<ExecutionDescription, TranslateError>;
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    #[serde(rename = "Text")]
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(rename = "executionArn", default)]
    pub execution_arn: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DescribeRequest<'a> {
    #[serde(rename = "executionArn")]
    pub execution_arn: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DescribeResponse {
    pub status: String,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExecutionOutput {
    #[serde(rename = "PoseURL")]
    pose_url: String,
    #[serde(rename = "SignURL")]
    sign_url: String,
    #[serde(rename = "Skipped", default)]
    skipped: Vec<String>,
}

/// Decode a succeeded job's output.
///
/// The status response carries the output as a JSON string which itself
/// encodes the result object, so it gets decoded a second time here.
pub fn parse_execution_output(output: &str) -> Result<TranslationResult, TranslateError> {
    let parsed: ExecutionOutput =
        serde_json::from_str(output).map_err(|e| TranslateError::BadOutput(e.to_string()))?;
    Ok(TranslationResult {
        pose_url: parsed.pose_url,
        sign_url: parsed.sign_url,
        skipped: parsed.skipped,
    })
}
