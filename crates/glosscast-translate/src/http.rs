use crate::service::{
    DescribeRequest, DescribeResponse, ExecutionDescription, ExecutionHandle, GlossService,
    SubmitRequest, SubmitResponse,
};
use async_trait::async_trait;
use glosscast_core::config::TranslateConfig;
use glosscast_core::{JobStatus, TranslateError};

/// [`GlossService`] over the workflow's HTTP gateway.
///
/// Submission posts `{"Text": ...}` to the submit endpoint; status posts
/// `{"executionArn": ...}` to the status endpoint, with the configured
/// credentials attached as headers.
pub struct HttpGlossService {
    client: reqwest::Client,
    submit_url: String,
    status_url: String,
    access_key: Option<String>,
    secret_key: Option<String>,
}

impl HttpGlossService {
    pub fn new(config: &TranslateConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            submit_url: config.submit_url.clone(),
            status_url: config.status_url.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
        }
    }
}

#[async_trait]
impl GlossService for HttpGlossService {
    async fn submit(&self, text: &str) -> Result<ExecutionHandle, TranslateError> {
        let response = self
            .client
            .post(&self.submit_url)
            .json(&SubmitRequest { text })
            .send()
            .await
            .map_err(|e| TranslateError::SubmitFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::SubmitFailed(format!(
                "submit endpoint returned status {}",
                response.status()
            )));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::SubmitFailed(e.to_string()))?;

        match body.execution_arn {
            Some(arn) if !arn.is_empty() => Ok(ExecutionHandle(arn)),
            _ => Err(TranslateError::MissingExecutionArn),
        }
    }

    async fn describe(
        &self,
        handle: &ExecutionHandle,
    ) -> Result<ExecutionDescription, TranslateError> {
        let mut request = self.client.post(&self.status_url).json(&DescribeRequest {
            execution_arn: &handle.0,
        });
        if let Some(key) = &self.access_key {
            request = request.header("x-access-key", key);
        }
        if let Some(secret) = &self.secret_key {
            request = request.header("x-secret-key", secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranslateError::DescribeFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::DescribeFailed(format!(
                "status endpoint returned status {}",
                response.status()
            )));
        }

        let body: DescribeResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::DescribeFailed(e.to_string()))?;

        Ok(ExecutionDescription {
            status: JobStatus::from_wire(&body.status),
            output: body.output,
        })
    }
}
