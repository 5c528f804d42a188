//! Front-end state for the record screen and key handling.
//!
//! The wizard itself lives in the controller task. This side tracks only what
//! the terminal needs on top of the latest snapshot: focus, row cursors, the
//! note being typed and any open alert. User intent leaves as
//! [`WizardCommand`]s.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use moodping_engine::moodping_config::{Locale, UiOptions};
use moodping_engine::moodping_core::{DEFAULT_EMOTIONS, ResultPanel, Section, WizardSnapshot};
use moodping_engine::moodping_types::{Intensity, MAX_INTENSITY, NOTE_MAX_CHARS};
use moodping_engine::{HOME_ROUTE, WizardCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Emotion,
    Intensity,
    Note,
    Submit,
    Confirm,
}

#[derive(Debug)]
pub struct Screen {
    snapshot: WizardSnapshot,
    focus: Focus,
    emotion_cursor: usize,
    intensity_cursor: usize,
    note: String,
    note_focus_sent: bool,
    /// Submission count seen when the last `Submit` was sent, until a
    /// snapshot shows the controller has begun it.
    pending_submit: Option<u32>,
    alert: Option<String>,
    commands: mpsc::Sender<WizardCommand>,
    locale: Locale,
    options: UiOptions,
    tick: usize,
    should_quit: bool,
}

impl Screen {
    #[must_use]
    pub fn new(commands: mpsc::Sender<WizardCommand>, locale: Locale, options: UiOptions) -> Self {
        Self {
            snapshot: WizardSnapshot::default(),
            focus: Focus::Emotion,
            emotion_cursor: 0,
            intensity_cursor: 0,
            note: String::new(),
            note_focus_sent: false,
            pending_submit: None,
            alert: None,
            commands,
            locale,
            options,
            tick: 0,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &WizardSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn emotion_cursor(&self) -> usize {
        self.emotion_cursor
    }

    /// Zero-based position in the intensity row.
    #[must_use]
    pub fn intensity_cursor(&self) -> usize {
        self.intensity_cursor
    }

    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn options(&self) -> UiOptions {
        self.options
    }

    #[must_use]
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Whether the submit button accepts a press: the wizard allows it and no
    /// submit sent from here is still waiting to be picked up.
    #[must_use]
    pub fn submit_available(&self) -> bool {
        self.snapshot.submit_enabled && self.pending_submit.is_none()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Adopt a new snapshot, moving focus to whatever just opened.
    pub fn apply_snapshot(&mut self, next: WizardSnapshot) {
        let prev = &self.snapshot;
        let was_ready = matches!(prev.result, ResultPanel::Ready { .. });
        let is_ready = matches!(next.result, ResultPanel::Ready { .. });

        if !prev.is_active(Section::Intensity) && next.is_active(Section::Intensity) {
            self.focus = Focus::Intensity;
        }
        if !prev.is_active(Section::Note) && next.is_active(Section::Note) {
            self.focus = Focus::Note;
        }
        if !was_ready && is_ready {
            self.focus = Focus::Confirm;
        }
        if prev.result.is_visible() && !next.result.is_visible() && next.submit_enabled {
            self.focus = Focus::Submit;
        }

        if let Some(intensity) = next.selected_intensity {
            self.intensity_cursor = usize::from(intensity.value() - 1);
        }

        if self
            .pending_submit
            .is_some_and(|sent_at| next.submissions > sent_at)
        {
            self.pending_submit = None;
        }

        self.snapshot = next;
        if !self.focus_order().contains(&self.focus) {
            self.focus = Focus::Emotion;
        }
    }

    pub fn show_alert(&mut self, message: String) {
        self.alert = Some(message);
    }

    /// A new wizard starts after navigating home.
    pub fn navigated(&mut self, route: &str) {
        if route != HOME_ROUTE {
            tracing::warn!(route, "Ignoring navigation to unknown route");
            return;
        }
        self.snapshot = WizardSnapshot::default();
        self.focus = Focus::Emotion;
        self.emotion_cursor = 0;
        self.intensity_cursor = 0;
        self.note.clear();
        self.note_focus_sent = false;
        self.pending_submit = None;
    }

    /// Controls that can currently take focus, top to bottom.
    #[must_use]
    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Emotion];
        if self.snapshot.is_active(Section::Intensity) {
            order.push(Focus::Intensity);
        }
        if self.snapshot.is_active(Section::Note) {
            order.push(Focus::Note);
            order.push(Focus::Submit);
        }
        if matches!(self.snapshot.result, ResultPanel::Ready { .. }) {
            order.push(Focus::Confirm);
        }
        order
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                if self.alert.is_none() && self.focus == Focus::Note {
                    let text = text.replace("\r\n", "\n").replace('\r', "\n");
                    for ch in text.chars() {
                        self.insert_note_char(ch);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.alert.take().is_some() {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            _ => match self.focus {
                Focus::Emotion => self.handle_emotion_key(key),
                Focus::Intensity => self.handle_intensity_key(key),
                Focus::Note => self.handle_note_key(key),
                Focus::Submit => self.handle_submit_key(key),
                Focus::Confirm => self.handle_confirm_key(key),
            },
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
        if self.focus == Focus::Note {
            self.note_focused();
        }
    }

    fn handle_emotion_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.emotion_cursor = self.emotion_cursor.saturating_sub(1),
            KeyCode::Right => {
                self.emotion_cursor = (self.emotion_cursor + 1).min(DEFAULT_EMOTIONS.len() - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let option = &DEFAULT_EMOTIONS[self.emotion_cursor];
                match option.emotion_type() {
                    Ok(emotion) => {
                        self.send(WizardCommand::SelectEmotion(emotion));
                    }
                    Err(e) => tracing::warn!(code = option.code, "Invalid catalogue entry: {e}"),
                }
            }
            KeyCode::Char(c) => self.pick_intensity_digit(c),
            _ => {}
        }
    }

    fn handle_intensity_key(&mut self, key: KeyEvent) {
        let last = usize::from(MAX_INTENSITY) - 1;
        match key.code {
            KeyCode::Left => self.intensity_cursor = self.intensity_cursor.saturating_sub(1),
            KeyCode::Right => self.intensity_cursor = (self.intensity_cursor + 1).min(last),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.select_intensity(self.intensity_cursor as i64 + 1);
            }
            KeyCode::Char(c) => self.pick_intensity_digit(c),
            _ => {}
        }
    }

    fn pick_intensity_digit(&mut self, c: char) {
        if !self.snapshot.is_active(Section::Intensity) {
            return;
        }
        if let Some(digit) = c.to_digit(10) {
            self.select_intensity(i64::from(digit));
        }
    }

    fn select_intensity(&mut self, value: i64) {
        if let Ok(intensity) = Intensity::new(value) {
            self.intensity_cursor = usize::from(intensity.value() - 1);
            self.send(WizardCommand::SelectIntensity(intensity));
        }
    }

    fn handle_note_key(&mut self, key: KeyEvent) {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_note_char(c),
            KeyCode::Enter => self.insert_note_char('\n'),
            KeyCode::Backspace => {
                if self.submit_available() {
                    self.note_focused();
                    self.note.pop();
                }
            }
            _ => {}
        }
    }

    fn insert_note_char(&mut self, ch: char) {
        if !self.submit_available() {
            return;
        }
        self.note_focused();
        if self.note.chars().count() < NOTE_MAX_CHARS {
            self.note.push(ch);
        }
    }

    fn note_focused(&mut self) {
        if !self.note_focus_sent {
            self.note_focus_sent = true;
            self.send(WizardCommand::FocusNote);
        }
    }

    fn handle_submit_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
            && self.submit_available()
            && self.send(WizardCommand::Submit(self.note.clone()))
        {
            self.pending_submit = Some(self.snapshot.submissions);
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
            && matches!(self.snapshot.result, ResultPanel::Ready { .. })
        {
            self.send(WizardCommand::Confirm);
        }
    }

    fn send(&self, command: WizardCommand) -> bool {
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropping wizard command: {e}");
                false
            }
        }
    }
}
