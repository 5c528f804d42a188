//! Drives one record-screen wizard: state transitions, UX events, network calls.

use std::sync::Arc;

use moodping_client::{ApiClient, ClientError};
use moodping_config::Locale;
use moodping_core::{Identity, Wizard, WizardError, WizardSnapshot, render_feedback_markup};
use moodping_types::{EmotionType, Intensity, RecordId, UxEvent};

use crate::events::EventLogger;
use crate::messages::Alert;
use crate::view::{HOME_ROUTE, Navigator, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Record saved and feedback displayed.
    Completed { record_id: RecordId },
    /// The user was alerted and the wizard rolled back to a retryable state.
    Failed(Alert),
}

/// Owned per wizard. Every public method leaves the view in sync with the
/// wizard before returning.
pub struct WizardController {
    wizard: Wizard,
    api: ApiClient,
    identity: Arc<Identity>,
    events: EventLogger,
    view: Arc<dyn View>,
    navigator: Arc<dyn Navigator>,
    locale: Locale,
}

impl WizardController {
    /// Start a fresh wizard: logs `record_screen_view` and renders.
    pub fn new(
        api: ApiClient,
        identity: Arc<Identity>,
        events: EventLogger,
        view: Arc<dyn View>,
        navigator: Arc<dyn Navigator>,
        locale: Locale,
    ) -> Self {
        let controller = Self {
            wizard: Wizard::new(),
            api,
            identity,
            events,
            view,
            navigator,
            locale,
        };
        controller.events.log(UxEvent::RecordScreenView);
        controller.render();
        controller
    }

    #[must_use]
    pub fn snapshot(&self) -> WizardSnapshot {
        self.wizard.snapshot()
    }

    fn render(&self) {
        self.view.render(&self.wizard.snapshot());
    }

    pub fn select_emotion(&mut self, emotion: EmotionType) -> Result<(), WizardError> {
        self.wizard.select_emotion(emotion.clone())?;
        self.events.log(UxEvent::EmojiSelected { emotion });
        self.render();
        Ok(())
    }

    pub fn select_intensity(&mut self, intensity: Intensity) -> Result<(), WizardError> {
        self.wizard.select_intensity(intensity)?;
        self.events.log(UxEvent::IntensitySelected { intensity });
        self.render();
        Ok(())
    }

    pub fn focus_note(&mut self) -> Result<(), WizardError> {
        if self.wizard.focus_note()? {
            self.events.log(UxEvent::TextInputStart);
        }
        Ok(())
    }

    /// Save the record, then fetch and show feedback.
    ///
    /// `Err` means the submission was not started (wrong section, already in
    /// flight, already completed). Network failures are reported through the
    /// view and returned as [`SubmitOutcome::Failed`].
    pub async fn submit(&mut self, note: String) -> Result<SubmitOutcome, WizardError> {
        let draft = self.wizard.begin_submission(note)?;
        self.render();

        let user_id = match self.identity.user_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Could not resolve user id for submission: {e}");
                return Ok(self.fail(Alert::Communication));
            }
        };

        let record = match draft.to_new_record(user_id) {
            Ok(record) => record,
            Err(e) => {
                self.wizard.submission_failed();
                self.render();
                return Err(e.into());
            }
        };

        let created = match self.api.create_record(&record).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!("Record submission failed: {e}");
                return Ok(self.fail(alert_for_record_error(&e)));
            }
        };

        let record_id = created.id;
        self.wizard.record_created(record_id);
        self.events.log(UxEvent::RecordComplete { record_id });

        let feedback = match self.api.request_feedback(record_id).await {
            Ok(feedback) => feedback,
            Err(e) => {
                tracing::warn!(%record_id, "Feedback request failed: {e}");
                return Ok(self.fail(Alert::Communication));
            }
        };

        self.wizard
            .feedback_received(render_feedback_markup(&feedback.content));
        self.render();
        tracing::info!(%record_id, "Record completed");
        Ok(SubmitOutcome::Completed { record_id })
    }

    fn fail(&mut self, alert: Alert) -> SubmitOutcome {
        self.view.alert(alert.message(self.locale));
        self.wizard.submission_failed();
        self.render();
        SubmitOutcome::Failed(alert)
    }

    /// Log `feedback_confirmed` and navigate home once that log has finished.
    pub async fn confirm(&mut self) -> Result<(), WizardError> {
        self.wizard.ensure_confirmable()?;
        self.events.log_and_wait(UxEvent::FeedbackConfirmed).await;
        self.navigator.navigate(HOME_ROUTE);
        Ok(())
    }
}

fn alert_for_record_error(error: &ClientError) -> Alert {
    if error.is_status() {
        Alert::SaveFailed
    } else {
        Alert::Communication
    }
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("wizard", &self.wizard)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
