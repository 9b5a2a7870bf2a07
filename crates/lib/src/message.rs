//! Host-facing message shapes: the outbound user turn and the canonical bot message.

use serde::{Deserialize, Serialize};

/// A user turn handed to the connector by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundTurn {
    #[serde(default)]
    pub message_text: Option<String>,
    /// Buttons the user "clicked"; only the first one is used.
    #[serde(default)]
    pub buttons: Vec<OutboundButton>,
    /// Media attachments. Not forwarded to the service.
    #[serde(default)]
    pub media: Vec<MediaRef>,
}

impl OutboundTurn {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message_text: Some(text.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutboundButton {
    #[serde(default)]
    pub text: Option<String>,
    /// Arbitrary payload; only a string payload can be sent as an utterance.
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub media_uri: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Button postback after best-effort JSON decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// The postback was valid JSON.
    Decoded(serde_json::Value),
    /// The postback was not JSON; kept verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub text: Option<String>,
    /// `null` for quick replies given as plain strings.
    pub payload: Option<Payload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub media_uri: Option<String>,
    pub mime_type: String,
    pub alt_text: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Card title.
    pub text: Option<String>,
    /// Card subtitle.
    pub content: Option<String>,
    /// `null` when the card has no image.
    pub media: Option<Vec<Media>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
}

/// Recognized intent; serializes as `{}` when the service reported none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl IntentInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.confidence.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nlp {
    pub intent: IntentInfo,
}

/// Canonical bot message delivered to the host for one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMessage {
    /// Newline-joined text of every text-bearing fragment, in response order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_text: Option<String>,
    pub buttons: Vec<Button>,
    pub media: Vec<Media>,
    pub cards: Vec<Card>,
    pub nlp: Nlp,
    /// Raw query result, kept for debugging.
    pub source_data: serde_json::Value,
}

impl BotMessage {
    /// Append one text-bearing line. An empty accumulated text is replaced, not joined.
    pub(crate) fn push_text(&mut self, line: Option<&str>) {
        let Some(line) = line else {
            return;
        };
        match &mut self.message_text {
            Some(text) if !text.is_empty() => {
                text.push('\n');
                text.push_str(line);
            }
            _ => self.message_text = Some(line.to_string()),
        }
    }
}
