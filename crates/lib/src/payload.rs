//! Best-effort decoding of button postbacks.

use crate::message::Payload;

/// Decode a postback as JSON; anything that is not valid JSON is kept as the raw string.
pub fn decode_payload(raw: &str) -> Payload {
    match serde_json::from_str(raw) {
        Ok(value) => Payload::Decoded(value),
        Err(e) => {
            log::debug!("button payload is not json, keeping raw string: {}", e);
            Payload::Raw(raw.to_string())
        }
    }
}
