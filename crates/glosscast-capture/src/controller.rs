use crate::recognizer::Recognizer;
use glosscast_core::StateEvent;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};

/// Drives a [`Recognizer`] in single-utterance mode.
///
/// The controller owns the recognition handle explicitly: [`toggle`]
/// opens a listening window when idle and cancels the open one
/// otherwise. Each window emits `ListeningStarted`, then at most one
/// final transcript, then `ListeningEnded`. Recognized phrases also go
/// to the transcript channel for translation. Dropping the controller
/// cancels any window still open.
///
/// [`toggle`]: CaptureController::toggle
pub struct CaptureController {
    recognizer: Arc<dyn Recognizer>,
    event_tx: mpsc::UnboundedSender<StateEvent>,
    transcript_tx: mpsc::UnboundedSender<String>,
    /// Cancel handle for the open window, `None` while idle. The sender
    /// lives only here, so dropping the controller closes the channel
    /// and ends the window.
    cancel: Mutex<Option<watch::Sender<bool>>>,
}

/// A window that ended on its own leaves a closed sender in the slot.
fn window_open(slot: &Option<watch::Sender<bool>>) -> bool {
    slot.as_ref().is_some_and(|cancel_tx| !cancel_tx.is_closed())
}

impl CaptureController {
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        event_tx: mpsc::UnboundedSender<StateEvent>,
        transcript_tx: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            recognizer,
            event_tx,
            transcript_tx,
            cancel: Mutex::new(None),
        }
    }

    pub fn is_listening(&self) -> bool {
        window_open(&self.cancel.lock().unwrap())
    }

    pub fn toggle(&self) {
        if self.is_listening() {
            self.stop_listening();
        } else {
            self.start_listening();
        }
    }

    /// Open a listening window. No-op if one is already open.
    pub fn start_listening(&self) {
        let mut slot = self.cancel.lock().unwrap();
        if window_open(&slot) {
            return;
        }
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        *slot = Some(cancel_tx);
        drop(slot);

        let recognizer = Arc::clone(&self.recognizer);
        let event_tx = self.event_tx.clone();
        let transcript_tx = self.transcript_tx.clone();

        tokio::spawn(async move {
            let _ = event_tx.send(StateEvent::ListeningStarted);
            tokio::select! {
                result = recognizer.listen_once() => match result {
                    Ok(Some(text)) => {
                        tracing::info!(transcript = %text, "final phrase recognized");
                        let _ = event_tx.send(StateEvent::TranscriptFinal(text.clone()));
                        let _ = transcript_tx.send(text);
                    }
                    Ok(None) => {
                        tracing::debug!("listening window closed without speech");
                    }
                    Err(e) => {
                        tracing::error!("speech recognition error: {e}");
                    }
                },
                // Fires on cancel or when the controller is dropped.
                _ = cancel_rx.changed() => {
                    tracing::debug!("listening window cancelled");
                }
            }
            // Sent while this task still holds the receiver: the end
            // event always lands before the next window's start.
            let _ = event_tx.send(StateEvent::ListeningEnded);
        });
    }

    /// Cancel the open listening window, if any. The window stays
    /// registered until its task winds down, so a new one cannot open
    /// ahead of the end event.
    pub fn stop_listening(&self) {
        let slot = self.cancel.lock().unwrap();
        if let Some(cancel_tx) = slot.as_ref() {
            let _ = cancel_tx.send(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedRecognizer;
    use async_trait::async_trait;
    use glosscast_core::CaptureError;
    use std::time::Duration;

    struct FailingRecognizer;

    #[async_trait]
    impl Recognizer for FailingRecognizer {
        fn name(&self) -> &str {
            "failing"
        }

        async fn initialize(
            &mut self,
            _language: &str,
            _config: toml::Value,
        ) -> Result<(), CaptureError> {
            Ok(())
        }

        async fn listen_once(&self) -> Result<Option<String>, CaptureError> {
            Err(CaptureError::RecognitionFailed("microphone on fire".to_string()))
        }
    }

    async fn scripted(phrases: &[&str], delay_ms: i64) -> Arc<ScriptedRecognizer> {
        let mut recognizer = ScriptedRecognizer::new();
        let mut table = toml::map::Map::new();
        table.insert(
            "phrases".to_string(),
            toml::Value::Array(
                phrases
                    .iter()
                    .map(|p| toml::Value::String(p.to_string()))
                    .collect(),
            ),
        );
        table.insert("delay_ms".to_string(), toml::Value::Integer(delay_ms));
        recognizer
            .initialize("en-US", toml::Value::Table(table))
            .await
            .unwrap();
        Arc::new(recognizer)
    }

    async fn recv_event(rx: &mut mpsc::UnboundedReceiver<StateEvent>) -> StateEvent {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_controller_window_emits_transcript() {
        let recognizer = scripted(&["hello everyone"], 0).await;
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();
        let controller = CaptureController::new(recognizer, event_tx, transcript_tx);

        controller.toggle();

        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningStarted);
        assert_eq!(
            recv_event(&mut event_rx).await,
            StateEvent::TranscriptFinal("hello everyone".to_string())
        );
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningEnded);

        let transcript = tokio::time::timeout(Duration::from_secs(2), transcript_rx.recv())
            .await
            .expect("timed out waiting for transcript")
            .expect("transcript channel closed");
        assert_eq!(transcript, "hello everyone");
    }

    #[tokio::test]
    async fn test_controller_toggle_cancels_open_window() {
        // Long delay keeps the window open until the second toggle.
        let recognizer = scripted(&["never delivered"], 5000).await;
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();
        let controller = CaptureController::new(recognizer, event_tx, transcript_tx);

        controller.toggle();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningStarted);
        assert!(controller.is_listening());

        controller.toggle();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningEnded);
        assert!(!controller.is_listening());

        // The cancelled window must not deliver a phrase.
        assert!(transcript_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_controller_drop_cancels_open_window() {
        // Without an explicit stop, dropping the controller must end
        // the window rather than leave it listening in the background.
        let recognizer = scripted(&["never delivered"], 5000).await;
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();
        let controller = CaptureController::new(recognizer, event_tx, transcript_tx);

        controller.start_listening();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningStarted);

        drop(controller);
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningEnded);
        assert!(transcript_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_controller_end_event_precedes_next_start() {
        // Silent zero-delay windows end on their own; driving several
        // in a row must never interleave one window's end with the
        // next window's start.
        let recognizer = scripted(&[], 0).await;
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (transcript_tx, _transcript_rx) = mpsc::unbounded_channel();
        let controller = CaptureController::new(recognizer, event_tx, transcript_tx);

        for _ in 0..3 {
            controller.start_listening();
            tokio::time::timeout(Duration::from_secs(2), async {
                while controller.is_listening() {
                    tokio::task::yield_now().await;
                }
            })
            .await
            .expect("window did not close");
        }
        drop(controller);

        let events = tokio::time::timeout(Duration::from_secs(2), async {
            let mut events = Vec::new();
            while let Some(event) = event_rx.recv().await {
                events.push(event);
            }
            events
        })
        .await
        .expect("event channel did not close");

        assert_eq!(events.len(), 6);
        for pair in events.chunks(2) {
            assert_eq!(pair[0], StateEvent::ListeningStarted);
            assert_eq!(pair[1], StateEvent::ListeningEnded);
        }
    }

    #[tokio::test]
    async fn test_controller_one_phrase_per_window() {
        let recognizer = scripted(&["first", "second"], 0).await;
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();
        let controller = CaptureController::new(recognizer, event_tx, transcript_tx);

        controller.start_listening();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningStarted);
        assert_eq!(
            recv_event(&mut event_rx).await,
            StateEvent::TranscriptFinal("first".to_string())
        );
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningEnded);

        // The second phrase waits for the next window.
        assert!(transcript_rx.try_recv().is_ok());
        assert!(transcript_rx.try_recv().is_err());

        controller.start_listening();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningStarted);
        assert_eq!(
            recv_event(&mut event_rx).await,
            StateEvent::TranscriptFinal("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_controller_start_while_open_is_no_op() {
        let recognizer = scripted(&["once"], 5000).await;
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (transcript_tx, _transcript_rx) = mpsc::unbounded_channel();
        let controller = CaptureController::new(Arc::clone(&recognizer) as Arc<dyn Recognizer>, event_tx, transcript_tx);

        controller.start_listening();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningStarted);
        controller.start_listening();

        assert_eq!(recognizer.listen_count(), 1);
        controller.stop_listening();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningEnded);
    }

    #[tokio::test]
    async fn test_controller_recognition_error_closes_window() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();
        let controller =
            CaptureController::new(Arc::new(FailingRecognizer), event_tx, transcript_tx);

        controller.toggle();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningStarted);
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningEnded);
        assert!(!controller.is_listening());
        assert!(transcript_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_controller_silent_window_emits_no_transcript() {
        let recognizer = scripted(&[], 0).await;
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();
        let controller = CaptureController::new(recognizer, event_tx, transcript_tx);

        controller.toggle();
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningStarted);
        assert_eq!(recv_event(&mut event_rx).await, StateEvent::ListeningEnded);
        assert!(transcript_rx.try_recv().is_err());
    }
}
