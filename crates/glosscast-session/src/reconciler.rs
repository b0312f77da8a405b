use crate::session::CallSession;
use glosscast_core::{DisplayState, StateEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};

/// Owns one participant's [`DisplayState`] and folds all three sources
/// into it: local events from capture and translation, custom events
/// from the session, and a fixed-cadence poll of the call's shared
/// custom data.
///
/// The two remote paths are redundant on purpose; the value-gated merge
/// in [`DisplayState::apply_update`] makes their races and duplicates
/// harmless. A new snapshot is published only when something actually
/// changed.
///
/// The task exits when the local event channel closes or when the last
/// snapshot receiver is dropped, whichever comes first.
pub struct Reconciler {
    session: Arc<dyn CallSession>,
    local_rx: Option<mpsc::UnboundedReceiver<StateEvent>>,
    state_tx: watch::Sender<DisplayState>,
    poll_interval: Duration,
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl Reconciler {
    pub fn new(
        session: Arc<dyn CallSession>,
        local_rx: mpsc::UnboundedReceiver<StateEvent>,
        state_tx: watch::Sender<DisplayState>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            session,
            local_rx: Some(local_rx),
            state_tx,
            poll_interval,
            task_handle: None,
        }
    }

    pub fn start(&mut self) {
        let mut local_rx = self
            .local_rx
            .take()
            .expect("start() called but receiver already taken");
        // Subscribe before spawning so no event sent after start() is missed.
        let mut events = self.session.subscribe_custom_events();
        let session = Arc::clone(&self.session);
        let state_tx = self.state_tx.clone();
        let poll_interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut poll = tokio::time::interval(poll_interval);
            let mut state = DisplayState::default();
            loop {
                let changed = tokio::select! {
                    event = local_rx.recv() => match event {
                        Some(event) => state.apply_event(&event),
                        None => break,
                    },
                    received = events.recv() => match received {
                        Ok(event) => match event.sign_update_payload() {
                            Some(update) => {
                                tracing::debug!(
                                    participant = %session.participant(),
                                    "received sign video update event"
                                );
                                state.apply_update(&update)
                            }
                            None => false,
                        },
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            tracing::warn!(
                                missed,
                                "event subscription lagged, shared-state poll will catch up"
                            );
                            false
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    // First tick fires immediately, seeding late joiners
                    // from whatever shared data the call already has.
                    _ = poll.tick() => match session.shared_state() {
                        Some(update) => state.apply_update(&update),
                        None => false,
                    },
                };
                if changed && state_tx.send(state.clone()).is_err() {
                    break;
                }
            }
            tracing::debug!(
                participant = %session.participant(),
                "display reconciliation stopped"
            );
        });

        self.task_handle = Some(handle);
    }

    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }
    }
}
