//! Keyboard-driven record flow against a mock backend.

use crossterm::event::KeyCode;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moodping_engine::moodping_config::Locale;
use moodping_engine::moodping_core::{ResultPanel, Section, WizardSnapshot};
use moodping_tui::Focus;

use crate::common::{
    App, EVENTS_PATH, RECORDS_PATH, bodies, mount_events, mount_feedback, mount_record,
    wait_for_requests,
};

fn event_type(body: &Value) -> &str {
    body["event_type"].as_str().unwrap()
}

/// Select the first emotion, intensity 3 and type `note`, leaving focus on
/// the submit button.
async fn fill_in(app: &mut App, note: &str) {
    app.settle("initial render", |s| s.snapshot().is_active(Section::Emoji))
        .await;

    app.press(KeyCode::Enter);
    app.settle("intensity section", |s| {
        s.snapshot().is_active(Section::Intensity)
    })
    .await;
    assert_eq!(app.screen.focus(), Focus::Intensity);

    app.press(KeyCode::Char('3'));
    app.settle("note section", |s| s.snapshot().is_active(Section::Note))
        .await;
    assert_eq!(app.screen.focus(), Focus::Note);

    app.type_text(note);
    app.press(KeyCode::Tab);
    assert_eq!(app.screen.focus(), Focus::Submit);
}

#[tokio::test]
async fn record_feedback_and_restart() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    mount_record(&server, 42).await;
    mount_feedback(&server, 42, "<strong>Nice</strong> & steady").await;

    let mut app = App::start(&server, Locale::English);
    fill_in(&mut app, "good day").await;

    app.press(KeyCode::Enter);
    app.settle("feedback", |s| {
        matches!(s.snapshot().result, ResultPanel::Ready { .. })
    })
    .await;
    assert_eq!(app.screen.focus(), Focus::Confirm);
    assert!(!app.screen.snapshot().submit_enabled);
    assert!(app.screen.alert().is_none());

    let records = bodies(&server, RECORDS_PATH).await;
    assert_eq!(records.len(), 1);
    let user_id = app.identity.user_id().unwrap();
    assert_eq!(
        records[0],
        json!({
            "user_id": user_id.as_str(),
            "emotion_type": "happy",
            "intensity": 3,
            "note": "good day"
        })
    );

    app.press(KeyCode::Enter);
    app.settle("fresh wizard", |s| {
        s.snapshot() == &WizardSnapshot::default() && s.note().is_empty()
    })
    .await;
    assert_eq!(app.screen.focus(), Focus::Emotion);

    let events = wait_for_requests(&server, EVENTS_PATH, 7).await;
    let types: Vec<&str> = events.iter().map(event_type).collect();
    assert_eq!(
        types,
        vec![
            "record_screen_view",
            "emoji_selected",
            "intensity_selected",
            "text_input_start",
            "record_complete",
            "feedback_confirmed",
            "record_screen_view",
        ]
    );

    let session_id = app.identity.session_id().unwrap();
    for event in &events {
        assert_eq!(event["session_id"], session_id.as_str());
        assert_eq!(event["user_id"], user_id.as_str());
    }
    assert_eq!(events[4]["metadata_json"], r#"{"record_id":42}"#);
}

#[tokio::test]
async fn user_id_is_written_to_durable_storage() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    mount_record(&server, 7).await;
    mount_feedback(&server, 7, "ok").await;

    let mut app = App::start(&server, Locale::English);
    fill_in(&mut app, "").await;
    app.press(KeyCode::Enter);
    app.settle("feedback", |s| {
        matches!(s.snapshot().result, ResultPanel::Ready { .. })
    })
    .await;

    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(&app.storage_path).unwrap()).unwrap();
    let records = bodies(&server, RECORDS_PATH).await;
    assert_eq!(stored["user_id"], records[0]["user_id"]);
    assert_eq!(records[0]["note"], "");
}

#[tokio::test]
async fn failed_save_alerts_and_allows_retry() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_record(&server, 9).await;
    mount_feedback(&server, 9, "welcome back").await;

    let mut app = App::start(&server, Locale::Korean);
    fill_in(&mut app, "retry me").await;

    app.press(KeyCode::Enter);
    app.settle("alert", |s| s.alert().is_some()).await;
    assert_eq!(
        app.screen.alert(),
        Some("기록 저장에 실패했습니다. 다시 시도해주세요.")
    );
    app.settle("rollback", |s| s.snapshot().submit_enabled).await;
    assert_eq!(app.screen.snapshot().result, ResultPanel::Hidden);
    assert_eq!(app.screen.note(), "retry me");

    // The first key only dismisses the alert.
    app.press(KeyCode::Enter);
    assert!(app.screen.alert().is_none());
    assert_eq!(app.screen.focus(), Focus::Submit);

    app.press(KeyCode::Enter);
    app.settle("feedback after retry", |s| {
        matches!(s.snapshot().result, ResultPanel::Ready { .. })
    })
    .await;

    let records = bodies(&server, RECORDS_PATH).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], records[1]);
}

#[tokio::test]
async fn unreachable_feedback_reports_communication_error() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    mount_record(&server, 5).await;
    Mock::given(method("POST"))
        .and(path("/api/feedback/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut app = App::start(&server, Locale::Korean);
    fill_in(&mut app, "hello").await;
    app.press(KeyCode::Enter);

    app.settle("alert", |s| s.alert().is_some()).await;
    assert_eq!(app.screen.alert(), Some("서버 통신 중 오류가 발생했습니다."));
    app.settle("rollback", |s| s.snapshot().submit_enabled).await;
    assert!(!app.screen.snapshot().result.is_visible());
}

#[tokio::test]
async fn repeated_submit_press_posts_once_after_failure() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut app = App::start(&server, Locale::Korean);
    fill_in(&mut app, "twice").await;

    app.press(KeyCode::Enter);
    app.press(KeyCode::Enter);

    app.settle("alert", |s| s.alert().is_some()).await;
    app.settle("rollback", |s| s.submit_available()).await;
    app.press(KeyCode::Esc);
    assert!(app.screen.alert().is_none());
    assert!(!app.screen.should_quit());

    // Give a queued duplicate every chance to reach the server.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    app.updates.apply(&mut app.screen);

    assert_eq!(bodies(&server, RECORDS_PATH).await.len(), 1);
    assert!(app.screen.alert().is_none());
}
