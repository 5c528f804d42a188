//! Shared test utilities and fixtures
//!
//! A mock Moodping backend plus a fully wired app: the real [`Screen`] and
//! view bridge on one side, [`run_wizards`] on a spawned task on the other.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moodping_engine::moodping_client::ApiClient;
use moodping_engine::moodping_config::{Locale, UiOptions};
use moodping_engine::moodping_core::{FileStore, Identity, MemoryStore};
use moodping_engine::{EventLogger, WizardContext, run_wizards};
use moodping_tui::{Screen, ViewUpdates, view_channel};

pub const RECORDS_PATH: &str = "/api/records/";
pub const FEEDBACK_PATH: &str = "/api/feedback/";
pub const EVENTS_PATH: &str = "/api/events/";

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Accept every UX event.
pub async fn mount_events(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;
}

/// Create every record with the given id.
pub async fn mount_record(server: &MockServer, record_id: i64) {
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": record_id,
            "created_at": "2026-10-19T09:00:00Z"
        })))
        .mount(server)
        .await;
}

pub async fn mount_feedback(server: &MockServer, record_id: i64, content: &str) {
    Mock::given(method("POST"))
        .and(path(FEEDBACK_PATH))
        .and(query_param("record_id", record_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "content": content
        })))
        .mount(server)
        .await;
}

/// JSON bodies received on `route`, in arrival order.
pub async fn bodies(server: &MockServer, route: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == route)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

pub struct App {
    pub screen: Screen,
    pub updates: ViewUpdates,
    pub identity: Arc<Identity>,
    pub storage_path: PathBuf,
    wizards: JoinHandle<()>,
    _dir: TempDir,
}

impl App {
    pub fn start(server: &MockServer, locale: Locale) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage_path = dir.path().join("storage.json");
        let identity = Arc::new(Identity::new(
            Arc::new(FileStore::new(&storage_path)),
            Arc::new(MemoryStore::new()),
        ));
        let api = ApiClient::new(&Url::parse(&server.uri()).unwrap(), None).unwrap();
        let (events, _worker) = EventLogger::spawn(api.clone(), identity.clone(), 64);

        let (view, updates) = view_channel(16);
        let view = Arc::new(view);
        let (tx, rx) = mpsc::channel(32);
        let context = WizardContext {
            api,
            identity: identity.clone(),
            events,
            view: view.clone(),
            navigator: view,
            locale,
        };
        let wizards = tokio::spawn(run_wizards(context, rx));

        Self {
            screen: Screen::new(tx, locale, UiOptions::default()),
            updates,
            identity,
            storage_path,
            wizards,
            _dir: dir,
        }
    }

    pub fn press(&mut self, code: KeyCode) {
        self.screen
            .handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(KeyCode::Char(ch));
        }
    }

    /// Apply view updates until `done` holds for the screen.
    pub async fn settle(&mut self, what: &str, done: impl Fn(&Screen) -> bool) {
        let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
        loop {
            self.updates.apply(&mut self.screen);
            if done(&self.screen) {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for {what}"
            );
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.wizards.abort();
    }
}

/// Poll until `route` has received at least `count` requests.
pub async fn wait_for_requests(server: &MockServer, route: &str, count: usize) -> Vec<Value> {
    let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
    loop {
        let received = bodies(server, route).await;
        if received.len() >= count {
            return received;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {count} requests on {route}, got {}",
            received.len()
        );
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
