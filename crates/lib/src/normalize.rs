//! Response normalization: detect-intent query result -> canonical bot message.
//!
//! Fragments are visited in response order. Text-bearing fragments (text lines, quick reply
//! titles, media captions) are accumulated into `message_text`; quick replies become top-level
//! buttons, media fragments top-level media, and cards keep their own media/buttons.
//! Nothing in here fails: unknown or unparseable fragments are skipped.

use crate::intent::extract_intent;
use crate::message::{BotMessage, Button, Card, Media, Nlp};
use crate::payload::decode_payload;
use crate::query_result::{CardButton, CardMessage, FulfillmentMessage, QueryResult, QuickReply};

const UNKNOWN_MIME_TYPE: &str = "application/unknown";

/// Convert one query result into the message delivered to the host.
pub fn normalize(result: &QueryResult) -> BotMessage {
    let mut msg = BotMessage {
        source_data: result.source.clone(),
        ..Default::default()
    };
    for fragment in &result.fulfillment_messages {
        match fragment {
            FulfillmentMessage::Text(t) => {
                let first = t.text.as_ref().and_then(|lines| lines.first());
                msg.push_text(first.map(String::as_str));
            }
            FulfillmentMessage::QuickReplies(q) => {
                msg.push_text(q.title.as_deref());
                msg.buttons
                    .extend(q.quick_replies.iter().flatten().map(map_quick_reply));
            }
            FulfillmentMessage::Card(c) => msg.cards.push(map_card(c)),
            FulfillmentMessage::Image(m)
            | FulfillmentMessage::Video(m)
            | FulfillmentMessage::Audio(m) => {
                msg.push_text(m.accessibility_text.as_deref());
                msg.media.push(map_media(m.media_uri()));
            }
            FulfillmentMessage::Unknown => {}
        }
    }
    msg.nlp = Nlp {
        intent: extract_intent(result),
    };
    msg
}

fn map_quick_reply(reply: &QuickReply) -> Button {
    match reply {
        QuickReply::Label(text) => Button {
            text: Some(text.clone()),
            payload: None,
        },
        QuickReply::Button(b) => map_button(b),
    }
}

fn map_button(button: &CardButton) -> Button {
    Button {
        text: button.text.clone(),
        payload: button.postback.as_deref().map(decode_payload),
    }
}

fn map_card(card: &CardMessage) -> Card {
    let media = card
        .image_uri
        .as_deref()
        .filter(|uri| !uri.is_empty())
        .map(|uri| vec![map_media(Some(uri))]);
    let buttons = card
        .buttons
        .as_ref()
        .filter(|b| !b.is_empty())
        .map(|b| b.iter().map(map_button).collect());
    Card {
        text: card.title.clone(),
        content: card.subtitle.clone(),
        media,
        buttons,
    }
}

fn map_media(uri: Option<&str>) -> Media {
    Media {
        media_uri: uri.map(str::to_string),
        mime_type: uri
            .and_then(lookup_mime_type)
            .unwrap_or(UNKNOWN_MIME_TYPE)
            .to_string(),
        alt_text: false,
    }
}

/// MIME type from the URI's file extension (query and fragment ignored).
fn lookup_mime_type(uri: &str) -> Option<&'static str> {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let mime = mime_guess::from_path(path).first_raw();
    if mime.is_none() {
        log::debug!("no mime type for media uri {}, using {}", uri, UNKNOWN_MIME_TYPE);
    }
    mime
}
