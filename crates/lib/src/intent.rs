//! Top intent extraction.

use crate::message::IntentInfo;
use crate::query_result::QueryResult;

/// Intent name and confidence, or an empty [`IntentInfo`] when no intent was matched.
pub fn extract_intent(result: &QueryResult) -> IntentInfo {
    match &result.intent {
        Some(intent) => IntentInfo {
            name: intent.display_name.clone(),
            confidence: result.intent_detection_confidence,
        },
        None => IntentInfo::default(),
    }
}
