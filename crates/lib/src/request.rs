//! Outbound turn -> detect-intent request.

use crate::auth::Session;
use crate::message::OutboundTurn;

/// One detect-intent request, built per turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectIntentRequest {
    /// `projects/{project}/agent/sessions/{session}`.
    pub session_path: String,
    pub language_code: String,
    /// Utterance; `None` for media-only turns, which are not forwarded as text.
    pub text: Option<String>,
}

/// Pick the utterance for a turn: first button (label, else string payload), else nothing for
/// media-only turns, else the plain message text.
pub fn build_request(turn: &OutboundTurn, session: &Session) -> DetectIntentRequest {
    DetectIntentRequest {
        session_path: session.session_path(),
        language_code: session.language_code.clone(),
        text: select_text(turn),
    }
}

fn select_text(turn: &OutboundTurn) -> Option<String> {
    if let Some(first) = turn.buttons.first() {
        let label = first.text.as_deref().filter(|t| !t.is_empty());
        let payload = first
            .payload
            .as_ref()
            .and_then(|p| p.as_str())
            .filter(|p| !p.is_empty());
        if label.is_some() || payload.is_some() {
            return label.or(payload).map(str::to_string);
        }
    }
    if !turn.media.is_empty() {
        log::debug!("media messages are not supported, sending turn without text");
        return None;
    }
    turn.message_text.clone()
}
