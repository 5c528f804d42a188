//! Sequential command processing for a wizard.
//!
//! The front end sends [`WizardCommand`]s over a bounded channel and never
//! waits on the network; one task owns the controller and handles commands
//! strictly in arrival order.

use std::sync::Arc;

use tokio::sync::mpsc;

use moodping_client::ApiClient;
use moodping_config::Locale;
use moodping_core::Identity;
use moodping_types::{EmotionType, Intensity};

use crate::controller::WizardController;
use crate::events::EventLogger;
use crate::view::{Navigator, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardCommand {
    SelectEmotion(EmotionType),
    SelectIntensity(Intensity),
    FocusNote,
    Submit(String),
    Confirm,
}

/// Why [`drive`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveExit {
    /// Feedback was confirmed and the controller navigated away. The caller
    /// starts the next wizard on the same channel.
    Navigated,
    /// The command channel closed.
    Closed,
}

pub async fn drive(
    mut controller: WizardController,
    commands: &mut mpsc::Receiver<WizardCommand>,
) -> DriveExit {
    while let Some(command) = commands.recv().await {
        let label = command_label(&command);
        let result = match command {
            WizardCommand::SelectEmotion(emotion) => controller.select_emotion(emotion),
            WizardCommand::SelectIntensity(intensity) => controller.select_intensity(intensity),
            WizardCommand::FocusNote => controller.focus_note(),
            WizardCommand::Submit(note) => controller.submit(note).await.map(|_| ()),
            WizardCommand::Confirm => match controller.confirm().await {
                Ok(()) => return DriveExit::Navigated,
                Err(e) => Err(e),
            },
        };

        if let Err(e) = result {
            tracing::debug!("Ignoring {label} command: {e}");
        }
    }
    DriveExit::Closed
}

fn command_label(command: &WizardCommand) -> &'static str {
    match command {
        WizardCommand::SelectEmotion(_) => "select-emotion",
        WizardCommand::SelectIntensity(_) => "select-intensity",
        WizardCommand::FocusNote => "focus-note",
        WizardCommand::Submit(_) => "submit",
        WizardCommand::Confirm => "confirm",
    }
}

/// Everything needed to start a wizard. Shared by every wizard in a session.
#[derive(Clone)]
pub struct WizardContext {
    pub api: ApiClient,
    pub identity: Arc<Identity>,
    pub events: EventLogger,
    pub view: Arc<dyn View>,
    pub navigator: Arc<dyn Navigator>,
    pub locale: Locale,
}

impl WizardContext {
    #[must_use]
    pub fn start(&self) -> WizardController {
        WizardController::new(
            self.api.clone(),
            self.identity.clone(),
            self.events.clone(),
            self.view.clone(),
            self.navigator.clone(),
            self.locale,
        )
    }
}

impl std::fmt::Debug for WizardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardContext")
            .field("base_url", &self.api.base_url().as_str())
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

/// Run wizards back to back until the command channel closes. Each
/// confirmation starts a fresh wizard (new draft, same session).
pub async fn run_wizards(context: WizardContext, mut commands: mpsc::Receiver<WizardCommand>) {
    loop {
        match drive(context.start(), &mut commands).await {
            DriveExit::Navigated => tracing::info!("Starting a new record"),
            DriveExit::Closed => break,
        }
    }
}
