use crate::service::{parse_execution_output, ExecutionHandle, GlossService};
use glosscast_core::{JobStatus, TranslateError, TranslationResult};
use std::time::Duration;
use tokio::sync::watch;

/// Poll a submitted job at a fixed cadence until it reaches a terminal
/// status.
///
/// The loop checks immediately, then sleeps `interval` between checks.
/// It stops early when the optional `deadline` elapses, or when the
/// `active` generation moves past `generation`, meaning a newer
/// utterance owns the pipeline now.
pub async fn poll_until_terminal(
    service: &dyn GlossService,
    handle: &ExecutionHandle,
    interval: Duration,
    deadline: Option<Duration>,
    generation: u64,
    active: &mut watch::Receiver<u64>,
) -> Result<TranslationResult, TranslateError> {
    let started = tokio::time::Instant::now();
    loop {
        // Consumes any pending change notification, so the select
        // below only wakes for generations sent after this check.
        if *active.borrow_and_update() != generation {
            return Err(TranslateError::Superseded);
        }
        if let Some(limit) = deadline {
            if started.elapsed() >= limit {
                return Err(TranslateError::DeadlineExceeded);
            }
        }

        let description = service.describe(handle).await?;
        match description.status {
            JobStatus::Succeeded => {
                let output = description.output.ok_or_else(|| {
                    TranslateError::BadOutput("succeeded without output".to_string())
                })?;
                return parse_execution_output(&output);
            }
            JobStatus::Failed | JobStatus::TimedOut => {
                return Err(TranslateError::ExecutionFailed(description.status));
            }
            JobStatus::Pending => {}
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = active.changed() => {
                // A closed channel means the worker is gone; treat it
                // like supersession and stop polling.
                if changed.is_err() || *active.borrow() != generation {
                    return Err(TranslateError::Superseded);
                }
            }
        }
    }
}
