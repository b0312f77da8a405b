use crate::session::{CallSession, CustomEvent};
use glosscast_core::{SignUpdate, TranslationResult};

/// Publish a finished translation to every participant on the session.
///
/// Fire-and-forget: a delivery failure is logged and swallowed, since
/// peers converge through the shared-state poll anyway.
pub async fn broadcast_result(session: &dyn CallSession, result: &TranslationResult) {
    let update = SignUpdate::from_result(result);
    tracing::debug!(
        call_id = %session.call_id(),
        pose_url = %result.pose_url,
        sign_url = %result.sign_url,
        "publishing sign video update"
    );
    if let Err(e) = session.send_custom_event(CustomEvent::sign_update(&update)).await {
        tracing::warn!("sign video update not delivered: {e}");
    }
}
