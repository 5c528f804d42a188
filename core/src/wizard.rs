//! Record-screen wizard state machine.
//!
//! The screen has four sections. The three input sections (emoji, intensity,
//! note) become active strictly in order and never deactivate. The result
//! section follows the note section: it is revealed when a submission starts
//! and concealed again if that submission fails.
//!
//! ```text
//! Emoji --select--> Intensity --select--> Note --submit--> Result(Loading)
//!                                                           |        |
//!                                            failure: Hidden  success: Ready
//! ```
//!
//! All transitions go through [`Wizard::activate`], which rejects any edge that
//! is not the next one forward.

use std::fmt;

use thiserror::Error;

use moodping_types::{DraftRecord, EmotionType, IncompleteDraft, Intensity, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Emoji,
    Intensity,
    Note,
    Result,
}

impl Section {
    /// The only section `self` may advance to.
    #[must_use]
    pub const fn next(self) -> Option<Section> {
        match self {
            Section::Emoji => Some(Section::Intensity),
            Section::Intensity => Some(Section::Note),
            Section::Note => Some(Section::Result),
            Section::Result => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Section::Emoji => "emoji",
            Section::Intensity => "intensity",
            Section::Note => "note",
            Section::Result => "result",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Inactive,
    Active,
}

/// Contents of the result region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultPanel {
    #[default]
    Hidden,
    /// Region visible, loading indicator shown, content hidden.
    Loading,
    /// Region visible with rendered feedback markup.
    Ready { markup: String },
}

impl ResultPanel {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, ResultPanel::Hidden)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitState {
    Enabled,
    InFlight,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("cannot move from the {from} section to the {to} section")]
    OutOfOrder { from: Section, to: Section },
    #[error("the {0} section is not active")]
    SectionInactive(Section),
    #[error("a submission is already in progress")]
    SubmissionInFlight,
    #[error("this record has already been submitted")]
    AlreadySubmitted,
    #[error("feedback is not ready to confirm")]
    FeedbackNotReady,
    #[error(transparent)]
    Incomplete(#[from] IncompleteDraft),
}

/// Immutable copy of wizard state handed to views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSnapshot {
    pub emoji: SectionState,
    pub intensity: SectionState,
    pub note: SectionState,
    pub selected_emotion: Option<EmotionType>,
    pub selected_intensity: Option<Intensity>,
    pub note_text: String,
    pub submit_enabled: bool,
    pub result: ResultPanel,
    pub record_id: Option<RecordId>,
    /// Submissions begun so far. Lets a front end tell whether a submit it
    /// sent has been picked up yet.
    pub submissions: u32,
}

impl WizardSnapshot {
    #[must_use]
    pub fn state(&self, section: Section) -> SectionState {
        match section {
            Section::Emoji => self.emoji,
            Section::Intensity => self.intensity,
            Section::Note => self.note,
            Section::Result => {
                if self.result.is_visible() {
                    SectionState::Active
                } else {
                    SectionState::Inactive
                }
            }
        }
    }

    #[must_use]
    pub fn is_active(&self, section: Section) -> bool {
        self.state(section) == SectionState::Active
    }
}

impl Default for WizardSnapshot {
    fn default() -> Self {
        Wizard::new().snapshot()
    }
}

/// One record screen: the draft plus the section and submission state.
#[derive(Debug, Clone)]
pub struct Wizard {
    draft: DraftRecord,
    /// Furthest active input section (Emoji, Intensity or Note).
    frontier: Section,
    result: ResultPanel,
    submit: SubmitState,
    note_focused: bool,
    record_id: Option<RecordId>,
    submissions: u32,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            draft: DraftRecord::default(),
            frontier: Section::Emoji,
            result: ResultPanel::Hidden,
            submit: SubmitState::Enabled,
            note_focused: false,
            record_id: None,
            submissions: 0,
        }
    }

    #[must_use]
    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    #[must_use]
    pub fn state(&self, section: Section) -> SectionState {
        let active = match section {
            Section::Result => self.result.is_visible(),
            input => input <= self.frontier,
        };
        if active {
            SectionState::Active
        } else {
            SectionState::Inactive
        }
    }

    #[must_use]
    pub fn is_active(&self, section: Section) -> bool {
        self.state(section) == SectionState::Active
    }

    /// Activate `target`. Re-activating an active section is a no-op; anything
    /// other than the next section forward is rejected.
    pub fn activate(&mut self, target: Section) -> Result<Transition, WizardError> {
        if self.is_active(target) {
            return Ok(Transition::Unchanged);
        }

        if self.frontier.next() != Some(target) {
            return Err(WizardError::OutOfOrder {
                from: self.frontier,
                to: target,
            });
        }

        match target {
            Section::Result => self.result = ResultPanel::Loading,
            input => self.frontier = input,
        }
        Ok(Transition::Advanced)
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.submit {
            SubmitState::Enabled => Ok(()),
            SubmitState::InFlight => Err(WizardError::SubmissionInFlight),
            SubmitState::Completed => Err(WizardError::AlreadySubmitted),
        }
    }

    /// Record the selected emotion (replacing any previous choice) and open the
    /// intensity section.
    pub fn select_emotion(&mut self, emotion: EmotionType) -> Result<Transition, WizardError> {
        self.ensure_editable()?;
        self.draft.emotion_type = Some(emotion);
        self.activate(Section::Intensity)
    }

    /// Record the selected intensity and open the note section.
    pub fn select_intensity(&mut self, intensity: Intensity) -> Result<Transition, WizardError> {
        self.ensure_editable()?;
        if !self.is_active(Section::Intensity) {
            return Err(WizardError::SectionInactive(Section::Intensity));
        }
        self.draft.intensity = Some(intensity);
        self.activate(Section::Note)
    }

    /// Returns `true` only for the first focus of the note field.
    pub fn focus_note(&mut self) -> Result<bool, WizardError> {
        if !self.is_active(Section::Note) {
            return Err(WizardError::SectionInactive(Section::Note));
        }
        let first = !self.note_focused;
        self.note_focused = true;
        Ok(first)
    }

    /// Start a submission: store the note, show the loading indicator and
    /// disable submit. Returns the draft to send.
    pub fn begin_submission(&mut self, note: String) -> Result<DraftRecord, WizardError> {
        if !self.is_active(Section::Note) {
            return Err(WizardError::SectionInactive(Section::Note));
        }
        self.ensure_editable()?;
        if self.draft.emotion_type.is_none() {
            return Err(IncompleteDraft::MissingEmotion.into());
        }
        if self.draft.intensity.is_none() {
            return Err(IncompleteDraft::MissingIntensity.into());
        }

        self.draft.note = note;
        self.activate(Section::Result)?;
        self.result = ResultPanel::Loading;
        self.submit = SubmitState::InFlight;
        self.submissions += 1;
        Ok(self.draft.clone())
    }

    pub fn record_created(&mut self, record_id: RecordId) {
        self.record_id = Some(record_id);
    }

    /// Show the rendered feedback. Submit stays disabled.
    pub fn feedback_received(&mut self, markup: String) {
        self.result = ResultPanel::Ready { markup };
        self.submit = SubmitState::Completed;
    }

    /// Roll back to a retryable state: submit enabled, result hidden.
    pub fn submission_failed(&mut self) {
        if self.submit == SubmitState::InFlight {
            self.submit = SubmitState::Enabled;
            self.result = ResultPanel::Hidden;
            self.record_id = None;
        }
    }

    pub fn ensure_confirmable(&self) -> Result<(), WizardError> {
        match self.result {
            ResultPanel::Ready { .. } => Ok(()),
            ResultPanel::Hidden | ResultPanel::Loading => Err(WizardError::FeedbackNotReady),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            emoji: self.state(Section::Emoji),
            intensity: self.state(Section::Intensity),
            note: self.state(Section::Note),
            selected_emotion: self.draft.emotion_type.clone(),
            selected_intensity: self.draft.intensity,
            note_text: self.draft.note.clone(),
            submit_enabled: self.submit == SubmitState::Enabled,
            result: self.result.clone(),
            record_id: self.record_id,
            submissions: self.submissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use moodping_types::{EmotionType, IncompleteDraft, Intensity, RecordId};

    use super::{ResultPanel, Section, SectionState, Transition, Wizard, WizardError};

    fn emotion(code: &str) -> EmotionType {
        EmotionType::new(code).unwrap()
    }

    fn intensity(value: i64) -> Intensity {
        Intensity::new(value).unwrap()
    }

    fn wizard_at_note() -> Wizard {
        let mut wizard = Wizard::new();
        wizard.select_emotion(emotion("happy")).unwrap();
        wizard.select_intensity(intensity(3)).unwrap();
        wizard
    }

    #[test]
    fn starts_with_only_emoji_active() {
        let wizard = Wizard::new();
        assert_eq!(wizard.state(Section::Emoji), SectionState::Active);
        assert_eq!(wizard.state(Section::Intensity), SectionState::Inactive);
        assert_eq!(wizard.state(Section::Note), SectionState::Inactive);
        assert_eq!(wizard.state(Section::Result), SectionState::Inactive);
        assert!(wizard.snapshot().submit_enabled);
    }

    #[test]
    fn selecting_emotion_opens_intensity() {
        let mut wizard = Wizard::new();
        let transition = wizard.select_emotion(emotion("happy")).unwrap();

        assert_eq!(transition, Transition::Advanced);
        assert!(wizard.is_active(Section::Intensity));
        assert!(!wizard.is_active(Section::Note));
    }

    #[test]
    fn reselecting_emotion_keeps_exactly_one_selection() {
        let mut wizard = Wizard::new();
        wizard.select_emotion(emotion("happy")).unwrap();
        let transition = wizard.select_emotion(emotion("sad")).unwrap();

        assert_eq!(transition, Transition::Unchanged);
        let snapshot = wizard.snapshot();
        assert_eq!(snapshot.selected_emotion, Some(emotion("sad")));
        assert_eq!(wizard.draft().emotion_type, Some(emotion("sad")));
    }

    #[test]
    fn reselecting_emotion_later_does_not_move_sections_back() {
        let mut wizard = wizard_at_note();
        assert_eq!(
            wizard.select_emotion(emotion("calm")).unwrap(),
            Transition::Unchanged
        );
        assert!(wizard.is_active(Section::Note));
    }

    #[test]
    fn intensity_before_emotion_is_rejected() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.select_intensity(intensity(2)),
            Err(WizardError::SectionInactive(Section::Intensity))
        );
        assert_eq!(wizard.draft().intensity, None);
    }

    #[test]
    fn skipping_sections_is_rejected() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.activate(Section::Note),
            Err(WizardError::OutOfOrder {
                from: Section::Emoji,
                to: Section::Note,
            })
        );
        assert_eq!(
            wizard.activate(Section::Result),
            Err(WizardError::OutOfOrder {
                from: Section::Emoji,
                to: Section::Result,
            })
        );
    }

    #[test]
    fn activating_an_active_section_is_unchanged() {
        let mut wizard = wizard_at_note();
        assert_eq!(wizard.activate(Section::Emoji), Ok(Transition::Unchanged));
        assert_eq!(wizard.activate(Section::Intensity), Ok(Transition::Unchanged));
    }

    #[test]
    fn note_focus_reports_first_time_only() {
        let mut wizard = wizard_at_note();
        assert_eq!(wizard.focus_note(), Ok(true));
        assert_eq!(wizard.focus_note(), Ok(false));
    }

    #[test]
    fn note_focus_requires_note_section() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.focus_note(),
            Err(WizardError::SectionInactive(Section::Note))
        );
    }

    #[test]
    fn submission_shows_loading_and_disables_submit() {
        let mut wizard = wizard_at_note();
        let draft = wizard.begin_submission("today was fine".into()).unwrap();

        assert_eq!(draft.note, "today was fine");
        let snapshot = wizard.snapshot();
        assert_eq!(snapshot.result, ResultPanel::Loading);
        assert!(!snapshot.submit_enabled);
        assert!(snapshot.is_active(Section::Result));
    }

    #[test]
    fn double_submission_is_rejected() {
        let mut wizard = wizard_at_note();
        wizard.begin_submission(String::new()).unwrap();
        assert_eq!(
            wizard.begin_submission(String::new()),
            Err(WizardError::SubmissionInFlight)
        );
    }

    #[test]
    fn submission_before_note_section_is_rejected() {
        let mut wizard = Wizard::new();
        wizard.select_emotion(emotion("happy")).unwrap();
        assert_eq!(
            wizard.begin_submission(String::new()),
            Err(WizardError::SectionInactive(Section::Note))
        );
    }

    #[test]
    fn failure_rolls_back_to_retryable_state() {
        let mut wizard = wizard_at_note();
        wizard.begin_submission("n".into()).unwrap();
        wizard.record_created(RecordId::new(5));
        wizard.submission_failed();

        let snapshot = wizard.snapshot();
        assert!(snapshot.submit_enabled);
        assert_eq!(snapshot.result, ResultPanel::Hidden);
        assert_eq!(snapshot.record_id, None);
        assert!(snapshot.is_active(Section::Note));

        // Retry is allowed.
        assert!(wizard.begin_submission("n".into()).is_ok());
    }

    #[test]
    fn feedback_completes_the_record() {
        let mut wizard = wizard_at_note();
        wizard.begin_submission(String::new()).unwrap();
        wizard.record_created(RecordId::new(9));
        wizard.feedback_received("<strong>ok</strong>".into());

        let snapshot = wizard.snapshot();
        assert_eq!(
            snapshot.result,
            ResultPanel::Ready {
                markup: "<strong>ok</strong>".into()
            }
        );
        assert!(!snapshot.submit_enabled);
        assert_eq!(snapshot.record_id, Some(RecordId::new(9)));
        assert_eq!(wizard.ensure_confirmable(), Ok(()));
        assert_eq!(
            wizard.select_emotion(emotion("sad")),
            Err(WizardError::AlreadySubmitted)
        );
        assert_eq!(
            wizard.begin_submission(String::new()),
            Err(WizardError::AlreadySubmitted)
        );
    }

    #[test]
    fn confirm_requires_feedback() {
        let mut wizard = wizard_at_note();
        assert_eq!(
            wizard.ensure_confirmable(),
            Err(WizardError::FeedbackNotReady)
        );
        wizard.begin_submission(String::new()).unwrap();
        assert_eq!(
            wizard.ensure_confirmable(),
            Err(WizardError::FeedbackNotReady)
        );
    }

    #[test]
    fn incomplete_draft_error_converts() {
        let err: WizardError = IncompleteDraft::MissingEmotion.into();
        assert_eq!(err.to_string(), "no emotion has been selected");
    }

    #[test]
    fn submission_count_survives_rollback() {
        let mut wizard = wizard_at_note();
        assert_eq!(wizard.snapshot().submissions, 0);

        wizard.begin_submission(String::new()).unwrap();
        wizard.submission_failed();
        assert_eq!(wizard.snapshot().submissions, 1);

        wizard.begin_submission(String::new()).unwrap();
        assert_eq!(wizard.snapshot().submissions, 2);
    }
}
