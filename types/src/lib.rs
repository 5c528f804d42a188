//! Core domain types for Moodping.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod event;
mod ids;
mod record;

pub use event::{EventPayload, UxEvent};
pub use ids::{Identifier, IdentifierError, RecordId};
pub use record::{
    CreatedRecord, DraftRecord, EmotionType, EmotionTypeError, Feedback, IncompleteDraft,
    Intensity, IntensityError, MAX_INTENSITY, MIN_INTENSITY, NOTE_MAX_CHARS, NewRecord,
};
