//! Detect-intent query result as returned by the service, independent of transport.
//!
//! Fulfillment messages are a sum type with one variant per content kind; anything the
//! connector does not understand (or cannot parse) becomes [`FulfillmentMessage::Unknown`].
//! JSON parsing accepts both snake_case (gateway) and camelCase field names.

use crate::config::FieldNaming;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One detect-intent result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub fulfillment_messages: Vec<FulfillmentMessage>,
    pub intent: Option<Intent>,
    /// Server-reported score in [0, 1]; passed through untouched.
    pub intent_detection_confidence: Option<f64>,
    /// The result as received, for `sourceData`.
    pub source: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
}

/// A single unit of scripted reply content.
#[derive(Debug, Clone, PartialEq)]
pub enum FulfillmentMessage {
    Text(TextMessage),
    QuickReplies(QuickReplies),
    Card(CardMessage),
    Image(MediaMessage),
    Video(MediaMessage),
    Audio(MediaMessage),
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    #[serde(default)]
    pub text: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickReplies {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "quickReplies")]
    pub quick_replies: Option<Vec<QuickReply>>,
}

/// A quick reply entry: either a bare label or a button with a postback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuickReply {
    Label(String),
    Button(CardButton),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardMessage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default, alias = "imageUri")]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub buttons: Option<Vec<CardButton>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardButton {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub postback: Option<String>,
}

/// Image, video or audio content. Images carry `image_uri`, video/audio carry `uri`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMessage {
    #[serde(default, alias = "imageUri")]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default, alias = "accessibilityText")]
    pub accessibility_text: Option<String>,
}

impl MediaMessage {
    pub fn media_uri(&self) -> Option<&str> {
        self.image_uri
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.uri.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Look up `snake` or its camelCase form, treating `null` as absent.
fn field<'a>(value: &'a serde_json::Value, snake: &str) -> Option<&'a serde_json::Value> {
    value
        .get(snake)
        .or_else(|| value.get(FieldNaming::Camel.key(snake)))
        .filter(|v| !v.is_null())
}

fn parse_kind<T: DeserializeOwned>(
    kind: &str,
    value: &serde_json::Value,
    wrap: fn(T) -> FulfillmentMessage,
) -> FulfillmentMessage {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(inner) => wrap(inner),
        Err(e) => {
            log::debug!("skipping malformed {} fulfillment message: {}", kind, e);
            FulfillmentMessage::Unknown
        }
    }
}

impl FulfillmentMessage {
    /// Classify one JSON fulfillment message by which content field is populated.
    pub fn from_json(value: &serde_json::Value) -> Self {
        if let Some(v) = field(value, "text") {
            parse_kind("text", v, FulfillmentMessage::Text)
        } else if let Some(v) = field(value, "quick_replies") {
            parse_kind("quick_replies", v, FulfillmentMessage::QuickReplies)
        } else if let Some(v) = field(value, "card") {
            parse_kind("card", v, FulfillmentMessage::Card)
        } else if let Some(v) = field(value, "image") {
            parse_kind("image", v, FulfillmentMessage::Image)
        } else if let Some(v) = field(value, "video") {
            parse_kind("video", v, FulfillmentMessage::Video)
        } else if let Some(v) = field(value, "audio") {
            parse_kind("audio", v, FulfillmentMessage::Audio)
        } else {
            FulfillmentMessage::Unknown
        }
    }
}

impl QueryResult {
    /// Build from the JSON `query_result` object of a detect-intent response.
    pub fn from_json(value: serde_json::Value) -> Self {
        let fulfillment_messages = field(&value, "fulfillment_messages")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().map(FulfillmentMessage::from_json).collect())
            .unwrap_or_default();
        let intent = field(&value, "intent").and_then(|v| {
            serde_json::from_value::<Intent>(v.clone())
                .map_err(|e| log::debug!("ignoring malformed intent: {}", e))
                .ok()
        });
        let intent_detection_confidence =
            field(&value, "intent_detection_confidence").and_then(|v| v.as_f64());
        Self {
            fulfillment_messages,
            intent,
            intent_detection_confidence,
            source: value,
        }
    }
}
