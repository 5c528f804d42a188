//! Mood record types: the in-progress draft and its wire representations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Identifier, RecordId};

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 5;

/// Column size of the note on the record service; front ends cap input here.
pub const NOTE_MAX_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("emotion type must not be empty")]
pub struct EmotionTypeError;

/// Category code of the selected emotion (e.g. `happy`).
///
/// Invariant: non-empty after trimming, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmotionType(String);

impl EmotionType {
    pub fn new(value: impl Into<String>) -> Result<Self, EmotionTypeError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmotionTypeError);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmotionType {
    type Error = EmotionTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EmotionType {
    type Error = EmotionTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmotionType> for String {
    fn from(value: EmotionType) -> Self {
        value.0
    }
}

impl fmt::Display for EmotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("intensity must be between {MIN_INTENSITY} and {MAX_INTENSITY}, got {0}")]
pub struct IntensityError(pub i64);

/// Subjective intensity rating on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Intensity(u8);

impl Intensity {
    pub fn new(value: i64) -> Result<Self, IntensityError> {
        if (i64::from(MIN_INTENSITY)..=i64::from(MAX_INTENSITY)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(IntensityError(value))
        }
    }

    /// Every valid rating, lowest first.
    pub fn all() -> impl Iterator<Item = Self> {
        (MIN_INTENSITY..=MAX_INTENSITY).map(Self)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Intensity {
    type Error = IntensityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Intensity> for i64 {
    fn from(value: Intensity) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IncompleteDraft {
    #[error("no emotion has been selected")]
    MissingEmotion,
    #[error("no intensity has been selected")]
    MissingIntensity,
}

/// The in-progress mood entry assembled by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftRecord {
    pub emotion_type: Option<EmotionType>,
    pub intensity: Option<Intensity>,
    pub note: String,
}

impl DraftRecord {
    /// Build the request body for the record endpoint.
    pub fn to_new_record(&self, user_id: Identifier) -> Result<NewRecord, IncompleteDraft> {
        let emotion_type = self
            .emotion_type
            .clone()
            .ok_or(IncompleteDraft::MissingEmotion)?;
        let intensity = self.intensity.ok_or(IncompleteDraft::MissingIntensity)?;
        Ok(NewRecord {
            user_id,
            emotion_type,
            intensity,
            note: self.note.clone(),
        })
    }
}

/// Body of `POST /api/records/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub user_id: Identifier,
    pub emotion_type: EmotionType,
    pub intensity: Intensity,
    pub note: String,
}

/// Successful response of `POST /api/records/`. Only `id` is read; other
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRecord {
    pub id: RecordId,
}

/// Successful response of `POST /api/feedback/`. Only `content` is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Feedback {
    pub content: String,
}
