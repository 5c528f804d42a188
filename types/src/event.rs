//! UX analytics events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{EmotionType, Identifier, Intensity, RecordId};

/// A user-experience event emitted by the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UxEvent {
    /// The record screen was shown (wizard start).
    RecordScreenView,
    EmojiSelected { emotion: EmotionType },
    IntensitySelected { intensity: Intensity },
    /// The note field received focus for the first time.
    TextInputStart,
    RecordComplete { record_id: RecordId },
    FeedbackConfirmed,
}

impl UxEvent {
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::RecordScreenView => "record_screen_view",
            Self::EmojiSelected { .. } => "emoji_selected",
            Self::IntensitySelected { .. } => "intensity_selected",
            Self::TextInputStart => "text_input_start",
            Self::RecordComplete { .. } => "record_complete",
            Self::FeedbackConfirmed => "feedback_confirmed",
        }
    }

    #[must_use]
    pub fn metadata(&self) -> Value {
        match self {
            Self::EmojiSelected { emotion } => json!({ "emotion": emotion.as_str() }),
            Self::IntensitySelected { intensity } => json!({ "intensity": intensity.value() }),
            Self::RecordComplete { record_id } => json!({ "record_id": record_id.value() }),
            Self::RecordScreenView | Self::TextInputStart | Self::FeedbackConfirmed => {
                Value::Object(Map::new())
            }
        }
    }
}

/// Body of `POST /api/events/`.
///
/// `metadata_json` carries the event metadata as a JSON-encoded string, not a
/// nested object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub session_id: Identifier,
    pub user_id: Identifier,
    pub event_type: String,
    pub metadata_json: String,
}

impl EventPayload {
    #[must_use]
    pub fn new(event: &UxEvent, session_id: Identifier, user_id: Identifier) -> Self {
        Self {
            session_id,
            user_id,
            event_type: event.event_type().to_string(),
            metadata_json: event.metadata().to_string(),
        }
    }
}
