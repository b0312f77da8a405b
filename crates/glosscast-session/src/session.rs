use async_trait::async_trait;
use glosscast_core::{SessionError, SignUpdate};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event type carrying a finished translation between participants.
pub const SIGN_VIDEO_UPDATE: &str = "signVideoUpdate";

/// An application-defined event on the call's data channel.
///
/// Events of other types flow through the same channel; consumers filter
/// by [`kind`](CustomEvent::kind) and ignore the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
}

impl CustomEvent {
    pub fn sign_update(update: &SignUpdate) -> Self {
        Self {
            kind: SIGN_VIDEO_UPDATE.to_string(),
            // SignUpdate serializes to a plain object, this cannot fail.
            data: serde_json::to_value(update).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Decode the payload of a `signVideoUpdate` event. Returns `None`
    /// for other event types or malformed payloads.
    pub fn sign_update_payload(&self) -> Option<SignUpdate> {
        if self.kind != SIGN_VIDEO_UPDATE {
            return None;
        }
        serde_json::from_value(self.data.clone()).ok()
    }
}

/// A live call session, reduced to the three capabilities this client
/// needs: publishing custom events, subscribing to them, and reading the
/// call's shared custom data.
///
/// The send side is best-effort; a failed send is the caller's to log
/// and ignore. Dropping the subscription receiver unsubscribes.
#[async_trait]
pub trait CallSession: Send + Sync {
    fn call_id(&self) -> &str;

    fn participant(&self) -> &str;

    /// Publish a custom event to every participant, including this one.
    async fn send_custom_event(&self, event: CustomEvent) -> Result<(), SessionError>;

    fn subscribe_custom_events(&self) -> broadcast::Receiver<CustomEvent>;

    /// Snapshot of the call's shared custom data, if any has been set.
    fn shared_state(&self) -> Option<SignUpdate>;
}
