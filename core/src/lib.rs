//! Domain logic for Moodping that does not touch the network.
//!
//! Identifier resolution over pluggable key-value stores, the record-screen
//! wizard state machine, the emotion catalogue and feedback formatting.

mod catalog;
mod format;
pub mod identity;
pub mod storage;
pub mod wizard;

pub use catalog::{DEFAULT_EMOTIONS, EmotionOption};
pub use format::render_feedback_markup;
pub use identity::{Identity, SESSION_ID_KEY, USER_ID_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use wizard::{
    ResultPanel, Section, SectionState, Transition, Wizard, WizardError, WizardSnapshot,
};
