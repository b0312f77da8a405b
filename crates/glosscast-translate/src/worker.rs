use crate::job::poll_until_terminal;
use crate::service::GlossService;
use glosscast_core::{StateEvent, TranslateError};
use glosscast_session::{broadcast_result, CallSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Turns recognized transcripts into translation jobs.
///
/// Each transcript is submitted and polled to completion; a transcript
/// arriving while a job is still in flight supersedes it, and the old
/// poll loop winds down without touching the display. Results are
/// applied locally and broadcast to the call in one motion.
pub struct TranslationWorker {
    service: Arc<dyn GlossService>,
    session: Arc<dyn CallSession>,
    event_tx: mpsc::UnboundedSender<StateEvent>,
    transcript_rx: Option<mpsc::UnboundedReceiver<String>>,
    poll_interval: Duration,
    deadline: Option<Duration>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TranslationWorker {
    pub fn new(
        service: Arc<dyn GlossService>,
        session: Arc<dyn CallSession>,
        event_tx: mpsc::UnboundedSender<StateEvent>,
        transcript_rx: mpsc::UnboundedReceiver<String>,
        poll_interval: Duration,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            service,
            session,
            event_tx,
            transcript_rx: Some(transcript_rx),
            poll_interval,
            deadline,
            task_handle: None,
        }
    }

    pub fn start(&mut self) {
        let mut transcript_rx = self
            .transcript_rx
            .take()
            .expect("start() called but receiver already taken");
        let service = Arc::clone(&self.service);
        let session = Arc::clone(&self.session);
        let event_tx = self.event_tx.clone();
        let poll_interval = self.poll_interval;
        let deadline = self.deadline;

        let handle = tokio::spawn(async move {
            let (active_tx, _) = watch::channel(0u64);
            let mut generation = 0u64;
            let mut jobs: Vec<tokio::task::JoinHandle<()>> = Vec::new();

            while let Some(text) = transcript_rx.recv().await {
                let text = text.trim().to_string();
                if text.is_empty() {
                    tracing::debug!("ignoring empty transcript");
                    continue;
                }

                generation += 1;
                if generation > 1 {
                    tracing::debug!(generation, "new utterance supersedes in-flight job");
                }
                active_tx.send_replace(generation);

                jobs.retain(|job| !job.is_finished());
                // Subscribing after the bump marks the job's own
                // generation as seen; its poll loop wakes only when a
                // newer one lands.
                jobs.push(tokio::spawn(run_translation(
                    Arc::clone(&service),
                    Arc::clone(&session),
                    event_tx.clone(),
                    text,
                    generation,
                    active_tx.subscribe(),
                    poll_interval,
                    deadline,
                )));
            }

            // Channel closed: cancel whatever is still polling and wait
            // for the jobs to wind down.
            drop(active_tx);
            for job in jobs {
                let _ = job.await;
            }
        });

        self.task_handle = Some(handle);
    }

    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_translation(
    service: Arc<dyn GlossService>,
    session: Arc<dyn CallSession>,
    event_tx: mpsc::UnboundedSender<StateEvent>,
    text: String,
    generation: u64,
    mut active: watch::Receiver<u64>,
    poll_interval: Duration,
    deadline: Option<Duration>,
) {
    let _ = event_tx.send(StateEvent::TranslationStarted);
    tracing::info!(generation, transcript = %text, "submitting translation job");

    let outcome = async {
        let handle = service.submit(&text).await?;
        tracing::debug!(generation, handle = %handle.0, "translation job accepted");
        poll_until_terminal(
            service.as_ref(),
            &handle,
            poll_interval,
            deadline,
            generation,
            &mut active,
        )
        .await
    }
    .await;

    match outcome {
        Ok(result) => {
            tracing::info!(
                generation,
                pose_url = %result.pose_url,
                sign_url = %result.sign_url,
                skipped = result.skipped.len(),
                "translation ready"
            );
            let _ = event_tx.send(StateEvent::TranslationReady(result.clone()));
            broadcast_result(session.as_ref(), &result).await;
            let _ = event_tx.send(StateEvent::TranslationFinished);
        }
        Err(TranslateError::Superseded) => {
            // The newer job owns the loading flag now; emitting a
            // finished event here would clear it underneath that job.
            tracing::debug!(generation, "translation job superseded, result discarded");
        }
        Err(e) => {
            tracing::error!(generation, "translation failed: {e}");
            let _ = event_tx.send(StateEvent::TranslationFinished);
        }
    }
}
