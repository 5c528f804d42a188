//! Orchestration for the Moodping record wizard.
//!
//! The [`WizardController`] wraps the pure [`moodping_core::Wizard`] state
//! machine with side effects: UX events through the [`EventLogger`], record and
//! feedback calls through [`moodping_client::ApiClient`], and presentation
//! through the [`View`] and [`Navigator`] seams. [`drive`] runs a controller
//! against a command channel.

mod controller;
mod events;
mod messages;
mod runtime;
mod view;

pub use controller::{SubmitOutcome, WizardController};
pub use events::EventLogger;
pub use messages::Alert;
pub use runtime::{DriveExit, WizardCommand, WizardContext, drive, run_wizards};
pub use view::{HOME_ROUTE, Navigator, View};

pub use moodping_client;
pub use moodping_config;
pub use moodping_core;
pub use moodping_types;
