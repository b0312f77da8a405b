pub mod broadcast;
pub mod local;
pub mod reconciler;
pub mod session;

pub use broadcast::broadcast_result;
pub use local::{LocalHub, LocalSession};
pub use reconciler::Reconciler;
pub use session::{CallSession, CustomEvent, SIGN_VIDEO_UPDATE};
