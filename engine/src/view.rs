//! Seams between the controller and whatever presents the wizard.

use moodping_core::WizardSnapshot;

/// Route the wizard navigates to once feedback is confirmed.
pub const HOME_ROUTE: &str = "/";

pub trait View: Send + Sync {
    /// Present the current wizard state. Called after every state change.
    ///
    /// Feedback in [`moodping_core::ResultPanel::Ready`] is escaped markup:
    /// `<strong>`, `</strong>` and `<br>` are the only tags, and literal `&`,
    /// `<`, `>` arrive as entities that the view decodes for display.
    fn render(&self, snapshot: &WizardSnapshot);
    /// Show a blocking, user-dismissed message.
    fn alert(&self, message: &str);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}
