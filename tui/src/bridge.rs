//! Connects the controller task to the frame loop.
//!
//! Snapshots travel over a `watch` channel (the frame loop only ever needs the
//! latest). Alerts and navigation are discrete and go over a bounded queue.

use tokio::sync::{mpsc, watch};

use moodping_engine::moodping_core::WizardSnapshot;
use moodping_engine::{Navigator, View};

use crate::screen::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Alert(String),
    Navigate(String),
}

/// Controller-side half: implements [`View`] and [`Navigator`].
#[derive(Debug, Clone)]
pub struct TerminalView {
    snapshots: watch::Sender<WizardSnapshot>,
    notices: mpsc::Sender<Notice>,
}

/// Frame-loop half.
#[derive(Debug)]
pub struct ViewUpdates {
    snapshots: watch::Receiver<WizardSnapshot>,
    notices: mpsc::Receiver<Notice>,
}

#[must_use]
pub fn view_channel(notice_capacity: usize) -> (TerminalView, ViewUpdates) {
    let (snapshot_tx, snapshot_rx) = watch::channel(WizardSnapshot::default());
    let (notice_tx, notice_rx) = mpsc::channel(notice_capacity.max(1));
    (
        TerminalView {
            snapshots: snapshot_tx,
            notices: notice_tx,
        },
        ViewUpdates {
            snapshots: snapshot_rx,
            notices: notice_rx,
        },
    )
}

impl TerminalView {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.notices.try_send(notice) {
            tracing::warn!("Dropping UI notice: {e}");
        }
    }
}

impl View for TerminalView {
    fn render(&self, snapshot: &WizardSnapshot) {
        self.snapshots.send_replace(snapshot.clone());
    }

    fn alert(&self, message: &str) {
        self.notify(Notice::Alert(message.to_string()));
    }
}

impl Navigator for TerminalView {
    fn navigate(&self, route: &str) {
        self.notify(Notice::Navigate(route.to_string()));
    }
}

impl ViewUpdates {
    /// Apply pending notices, then the latest snapshot if it changed. Returns
    /// whether anything was applied.
    pub fn apply(&mut self, screen: &mut Screen) -> bool {
        let mut applied = false;
        while let Ok(notice) = self.notices.try_recv() {
            match notice {
                Notice::Alert(message) => screen.show_alert(message),
                Notice::Navigate(route) => screen.navigated(&route),
            }
            applied = true;
        }

        if self.snapshots.has_changed().unwrap_or(false) {
            let snapshot = self.snapshots.borrow_and_update().clone();
            screen.apply_snapshot(snapshot);
            applied = true;
        }
        applied
    }
}
