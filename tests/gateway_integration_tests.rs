use std::time::Duration;

use r4r::gateway::{Backend, GatewayError, HttpBackend, Role};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), Duration::from_secs(5))
}

/// A port nothing listens on.
fn unreachable_backend() -> HttpBackend {
    HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2))
}

// ============================================================================
// /api/message
// ============================================================================

#[tokio::test]
async fn test_send_message_creates_project_when_thread_is_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/message"))
        .and(body_json(json!({
            "message": "Plan the launch",
            "project": null,
            "phase": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Here is a plan",
            "model": "mistral-small",
            "metrics": {"tokens": 42, "tok_per_s": 21.5, "ttf": 0.4},
            "project": "launch_r4r_1",
            "phase": "phase1",
            "project_display": "Launch",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = assert_ok!(
        backend_for(&mock_server)
            .send_message("Plan the launch", None, None)
            .await
    );

    assert_eq!(reply.reply, "Here is a plan");
    assert_eq!(reply.project, "launch_r4r_1");
    assert_eq!(reply.phase, "phase1");
    assert_eq!(reply.display_title(), "Launch");
    assert_eq!(reply.model.as_deref(), Some("mistral-small"));
    let metrics = reply.metrics.expect("metrics present");
    assert_eq!(metrics.tokens, Some(42));
}

#[tokio::test]
async fn test_send_message_targets_the_active_thread() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/message"))
        .and(body_json(json!({
            "message": "next step?",
            "project": "launch_r4r_1",
            "phase": "phase2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Ship it",
            "project": "launch_r4r_1",
            "phase": "phase2",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = assert_ok!(
        backend_for(&mock_server)
            .send_message("next step?", Some("launch_r4r_1"), Some("phase2"))
            .await
    );
    assert_eq!(reply.reply, "Ship it");
    assert!(reply.metrics.is_none());
    assert_eq!(reply.display_title(), "launch_r4r_1");
}

#[tokio::test]
async fn test_send_message_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/message"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(
        backend_for(&mock_server)
            .send_message("hi", None, None)
            .await
    );
    assert_eq!(
        err,
        GatewayError::Api {
            status: 500,
            message: "model crashed".to_string(),
        }
    );
}

#[tokio::test]
async fn test_send_message_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/message"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(
        backend_for(&mock_server)
            .send_message("hi", None, None)
            .await
    );
    assert!(matches!(err, GatewayError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_send_message_network_failure() {
    let err = assert_err!(unreachable_backend().send_message("hi", None, None).await);
    assert!(matches!(err, GatewayError::Network(_)), "got {err:?}");
}

// ============================================================================
// /api/history
// ============================================================================

#[tokio::test]
async fn test_history_decodes_messages_and_bot_alias() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/history"))
        .and(body_json(json!({"project": "alpha", "phase": "phase1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [
                {"role": "user", "content": "hello"},
                {"role": "bot", "content": "hi there", "meta": {"model": "m1"}},
            ],
            "memory_time": 1700000000.5,
            "context_exists": true,
            "pending": true,
        })))
        .mount(&mock_server)
        .await;

    let history = assert_ok!(
        backend_for(&mock_server)
            .get_history("alpha", "phase1")
            .await
    );
    assert_eq!(history.history.len(), 2);
    assert_eq!(history.history[0].role, Role::User);
    assert_eq!(history.history[1].role, Role::Assistant);
    assert!(history.pending);
    assert!(history.context_exists);
}

#[tokio::test]
async fn test_history_error_status_degrades_to_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let history = assert_ok!(
        backend_for(&mock_server)
            .get_history("gone", "phase1")
            .await
    );
    assert!(history.history.is_empty());
    assert!(!history.pending);
}

#[tokio::test]
async fn test_history_network_failure_is_an_error() {
    let err = assert_err!(unreachable_backend().get_history("alpha", "phase1").await);
    assert!(matches!(err, GatewayError::Network(_)), "got {err:?}");
}

// ============================================================================
// /api/save_context
// ============================================================================

#[tokio::test]
async fn test_save_context_reports_next_phase() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/save_context"))
        .and(body_json(json!({"project": "alpha", "phase": "phase1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "saved": true,
            "next_phase": "phase2",
        })))
        .mount(&mock_server)
        .await;

    let outcome = assert_ok!(
        backend_for(&mock_server)
            .save_context("alpha", "phase1")
            .await
    );
    assert!(outcome.saved);
    assert_eq!(outcome.next_phase.as_deref(), Some("phase2"));
}

#[tokio::test]
async fn test_save_context_pending_is_not_saved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/save_context"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"status": "pending"})))
        .mount(&mock_server)
        .await;

    let outcome = assert_ok!(
        backend_for(&mock_server)
            .save_context("alpha", "phase1")
            .await
    );
    assert!(!outcome.saved);
    assert!(outcome.next_phase.is_none());
}

#[tokio::test]
async fn test_save_context_error_without_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/save_context"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let outcome = assert_ok!(
        backend_for(&mock_server)
            .save_context("alpha", "phase1")
            .await
    );
    assert!(!outcome.saved);
}

// ============================================================================
// /api/projects and /api/project/{slug}
// ============================================================================

#[tokio::test]
async fn test_list_projects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"project": "alpha", "title": "Alpha", "phases": ["phase1", "phase2"]},
            {"project": "beta", "title": "Beta"},
        ])))
        .mount(&mock_server)
        .await;

    let projects = assert_ok!(backend_for(&mock_server).list_projects().await);
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].phases, vec!["phase1", "phase2"]);
    assert!(projects[1].phases.is_empty());
}

#[tokio::test]
async fn test_list_projects_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = assert_err!(backend_for(&mock_server).list_projects().await);
    assert!(matches!(err, GatewayError::Api { status: 503, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_rename_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/project/alpha"))
        .and(body_json(json!({"new_title": "Alpha Launch"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert_ok!(
        backend_for(&mock_server)
            .rename_project("alpha", "Alpha Launch")
            .await
    );
}

#[tokio::test]
async fn test_rename_project_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/project/alpha"))
        .respond_with(ResponseTemplate::new(409).set_body_string("title taken"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(
        backend_for(&mock_server)
            .rename_project("alpha", "Beta")
            .await
    );
    assert!(matches!(err, GatewayError::Api { status: 409, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_delete_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/project/alpha"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert_ok!(backend_for(&mock_server).delete_project("alpha").await);
}

#[tokio::test]
async fn test_delete_project_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/project/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = assert_err!(backend_for(&mock_server).delete_project("ghost").await);
    assert!(matches!(err, GatewayError::Api { status: 404, .. }), "got {err:?}");
}
