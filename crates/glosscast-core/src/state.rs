//! Per-participant display state and the events that mutate it.
//!
//! Remote updates (custom events and the shared-state poll) both funnel
//! through [`DisplayState::apply_update`], which is value-gated: applying
//! the same update twice is a no-op, so the two delivery paths can race
//! or duplicate freely without disturbing the display.

use crate::types::{SignUpdate, TranslationResult};

/// Locally produced display mutations, emitted by the capture controller
/// and the translation worker.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// A listening window opened. Clears the previous transcript and
    /// animation URLs; skipped segments survive until the next result.
    ListeningStarted,
    /// The listening window closed, with or without a phrase.
    ListeningEnded,
    /// A final phrase came out of the current listening window.
    TranscriptFinal(String),
    /// A translation job went in flight.
    TranslationStarted,
    /// A translation job produced a result.
    TranslationReady(TranslationResult),
    /// A translation job left flight, successfully or not.
    TranslationFinished,
}

/// Commands from the terminal UI back to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    ToggleListening,
    Quit,
}

/// What one participant's panel currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub listening: bool,
    pub translating: bool,
    pub transcript: Option<String>,
    pub pose_url: Option<String>,
    pub sign_url: Option<String>,
    pub skipped: Vec<String>,
}

impl DisplayState {
    /// Apply a locally produced event. Returns `true` if anything changed.
    pub fn apply_event(&mut self, event: &StateEvent) -> bool {
        let before = self.clone();
        match event {
            StateEvent::ListeningStarted => {
                self.listening = true;
                self.transcript = None;
                self.pose_url = None;
                self.sign_url = None;
            }
            StateEvent::ListeningEnded => {
                self.listening = false;
            }
            StateEvent::TranscriptFinal(text) => {
                self.transcript = Some(text.clone());
            }
            StateEvent::TranslationStarted => {
                self.translating = true;
            }
            StateEvent::TranslationReady(result) => {
                self.pose_url = Some(result.pose_url.clone());
                self.sign_url = Some(result.sign_url.clone());
                self.skipped = result.skipped.clone();
            }
            StateEvent::TranslationFinished => {
                self.translating = false;
            }
        }
        *self != before
    }

    /// Merge a shared update into the display, field by field.
    ///
    /// A field is applied only when it is present, non-empty and differs
    /// from what is already shown. Returns `true` if anything changed.
    pub fn apply_update(&mut self, update: &SignUpdate) -> bool {
        let mut changed = false;
        if let Some(pose) = update.pose_url.as_deref().filter(|url| !url.is_empty()) {
            if self.pose_url.as_deref() != Some(pose) {
                self.pose_url = Some(pose.to_string());
                changed = true;
            }
        }
        if let Some(sign) = update.sign_url.as_deref().filter(|url| !url.is_empty()) {
            if self.sign_url.as_deref() != Some(sign) {
                self.sign_url = Some(sign.to_string());
                changed = true;
            }
        }
        changed
    }
}
