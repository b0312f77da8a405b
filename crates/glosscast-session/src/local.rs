use crate::session::{CallSession, CustomEvent};
use async_trait::async_trait;
use glosscast_core::{SessionError, SignUpdate};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// In-process call backend: one hub per call, fanning custom events out
/// to every joined participant and keeping a shared custom-data bag.
///
/// Every `signVideoUpdate` event is mirrored into the bag the way a call
/// platform persists custom data, so participants that miss the event
/// (or join late) still converge through the poll path.
pub struct LocalHub {
    call_id: String,
    events: broadcast::Sender<CustomEvent>,
    shared: Arc<Mutex<Option<SignUpdate>>>,
}

impl LocalHub {
    pub fn new(call_id: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            call_id: call_id.to_string(),
            events,
            shared: Arc::new(Mutex::new(None)),
        }
    }

    pub fn join(&self, participant: &str) -> LocalSession {
        tracing::debug!(
            call_id = %self.call_id,
            participant = %participant,
            "participant joined call"
        );
        LocalSession {
            call_id: self.call_id.clone(),
            participant: participant.to_string(),
            events: self.events.clone(),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Overwrite the shared custom data directly, bypassing the event
    /// channel. Lets tests stage exactly what the poll path observes.
    pub fn set_shared_state(&self, update: SignUpdate) {
        *self.shared.lock().unwrap() = Some(update);
    }

    pub fn shared_state(&self) -> Option<SignUpdate> {
        self.shared.lock().unwrap().clone()
    }
}

fn mirror_into_shared(shared: &Mutex<Option<SignUpdate>>, update: &SignUpdate) {
    let mut bag = shared.lock().unwrap();
    let slot = bag.get_or_insert_with(SignUpdate::default);
    if update.pose_url.is_some() {
        slot.pose_url = update.pose_url.clone();
    }
    if update.sign_url.is_some() {
        slot.sign_url = update.sign_url.clone();
    }
}

/// One participant's handle on a [`LocalHub`] call.
pub struct LocalSession {
    call_id: String,
    participant: String,
    events: broadcast::Sender<CustomEvent>,
    shared: Arc<Mutex<Option<SignUpdate>>>,
}

#[async_trait]
impl CallSession for LocalSession {
    fn call_id(&self) -> &str {
        &self.call_id
    }

    fn participant(&self) -> &str {
        &self.participant
    }

    async fn send_custom_event(&self, event: CustomEvent) -> Result<(), SessionError> {
        if let Some(update) = event.sign_update_payload() {
            mirror_into_shared(&self.shared, &update);
        }
        // A send error only means nobody is subscribed right now; the
        // shared bag still carries the update to poll-path readers.
        let _ = self.events.send(event);
        Ok(())
    }

    fn subscribe_custom_events(&self) -> broadcast::Receiver<CustomEvent> {
        self.events.subscribe()
    }

    fn shared_state(&self) -> Option<SignUpdate> {
        self.shared.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(pose: Option<&str>, sign: Option<&str>) -> SignUpdate {
        SignUpdate {
            pose_url: pose.map(String::from),
            sign_url: sign.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_hub_fans_out_to_all_participants() {
        let hub = LocalHub::new("room-1");
        let alice = hub.join("alice");
        let bob = hub.join("bob");

        let mut alice_rx = alice.subscribe_custom_events();
        let mut bob_rx = bob.subscribe_custom_events();

        let event = CustomEvent::sign_update(&update(Some("p.mp4"), Some("s.mp4")));
        alice.send_custom_event(event.clone()).await.unwrap();

        // The sender hears its own event too.
        assert_eq!(alice_rx.recv().await.unwrap(), event);
        assert_eq!(bob_rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_hub_mirrors_sign_updates_into_shared_state() {
        let hub = LocalHub::new("room-1");
        let alice = hub.join("alice");

        assert_eq!(hub.shared_state(), None);

        let payload = update(Some("p.mp4"), Some("s.mp4"));
        alice
            .send_custom_event(CustomEvent::sign_update(&payload))
            .await
            .unwrap();

        assert_eq!(hub.shared_state(), Some(payload.clone()));
        assert_eq!(alice.shared_state(), Some(payload));
    }

    #[tokio::test]
    async fn test_hub_shared_state_merges_per_field() {
        let hub = LocalHub::new("room-1");
        let alice = hub.join("alice");

        alice
            .send_custom_event(CustomEvent::sign_update(&update(Some("p1.mp4"), Some("s1.mp4"))))
            .await
            .unwrap();
        alice
            .send_custom_event(CustomEvent::sign_update(&update(Some("p2.mp4"), None)))
            .await
            .unwrap();

        let shared = hub.shared_state().unwrap();
        assert_eq!(shared.pose_url.as_deref(), Some("p2.mp4"));
        assert_eq!(shared.sign_url.as_deref(), Some("s1.mp4"));
    }

    #[tokio::test]
    async fn test_hub_other_events_leave_shared_state_alone() {
        let hub = LocalHub::new("room-1");
        let alice = hub.join("alice");

        let event = CustomEvent {
            kind: "reaction".to_string(),
            data: serde_json::json!({"emoji": "wave"}),
        };
        alice.send_custom_event(event).await.unwrap();

        assert_eq!(hub.shared_state(), None);
    }

    #[tokio::test]
    async fn test_send_without_subscribers_still_updates_shared_state() {
        let hub = LocalHub::new("room-1");
        let alice = hub.join("alice");

        // Nobody is subscribed; the send must not fail and the shared
        // bag must still pick the update up for poll-path readers.
        let payload = update(Some("p.mp4"), Some("s.mp4"));
        alice
            .send_custom_event(CustomEvent::sign_update(&payload))
            .await
            .unwrap();

        assert_eq!(hub.shared_state(), Some(payload));
    }

    #[tokio::test]
    async fn test_set_shared_state_replaces_bag() {
        let hub = LocalHub::new("room-1");
        hub.set_shared_state(update(Some("p1.mp4"), Some("s1.mp4")));
        hub.set_shared_state(update(Some("p2.mp4"), None));

        let shared = hub.shared_state().unwrap();
        assert_eq!(shared.pose_url.as_deref(), Some("p2.mp4"));
        assert_eq!(shared.sign_url, None);
    }

    #[test]
    fn test_session_identity() {
        let hub = LocalHub::new("room-9");
        let session = hub.join("carol");
        assert_eq!(session.call_id(), "room-9");
        assert_eq!(session.participant(), "carol");
    }
}
