mod common;

use std::time::Duration;

use axum::{body::Body, http::Request, http::StatusCode, Router};
use common::{
    config, empty_request, json_request, offline_config, send, send_json, FakeTelegram,
    TEST_TOKEN, UNREACHABLE_BASE,
};
use serde_json::json;
use telegram_relay::{
    app,
    config::Config,
    models::update::ChatId,
    services::telegram_service::{DeliveryOutcome, DeliveryReport},
    AppState,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

fn setup_app(config: Config) -> (Router, UnboundedReceiver<DeliveryReport>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let state = AppState::new(config).expect("state").with_delivery_hook(tx);
    (app::webhook_router(state), rx)
}

async fn next_report(rx: &mut UnboundedReceiver<DeliveryReport>) -> DeliveryReport {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("delivery report in time")
        .expect("hook still open")
}

fn text_update(chat_id: i64, text: &str) -> serde_json::Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "chat": { "id": chat_id, "type": "private" },
            "from": { "id": 5, "is_bot": false, "first_name": "Alice", "username": "alice" },
            "text": text,
        }
    })
}

#[tokio::test]
async fn text_message_is_echoed_exactly_once() {
    let (fake, base) = FakeTelegram::start().await;
    let (app, mut rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let (status, body) = send(&app, json_request("POST", "/webhook", text_update(42, "hello"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let report = next_report(&mut rx).await;
    assert!(report.is_delivered());
    assert_eq!(report.chat_id, ChatId::Id(42));
    assert_eq!(report.text, "You said: hello");

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, format!("/bot{}/sendMessage", TEST_TOKEN));
    assert_eq!(
        requests[0].json(),
        json!({ "chat_id": 42, "text": "You said: hello" })
    );
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn updates_without_known_keys_trigger_nothing() {
    let (fake, base) = FakeTelegram::start().await;
    let (app, mut rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let payloads = [
        json!({ "update_id": 2 }),
        json!({ "update_id": 3, "poll": { "id": "p" } }),
        json!({ "update_id": 4, "message": null }),
        json!([1, 2, 3]),
    ];
    for payload in payloads {
        let (status, body) = send(&app, json_request("POST", "/webhook", payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn story_edit_and_callback_updates_are_only_logged() {
    let (fake, base) = FakeTelegram::start().await;
    let (app, mut rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let payloads = [
        json!({ "update_id": 5, "story": { "id": 1, "chat": { "id": 42 } } }),
        json!({ "update_id": 6, "edited_message": { "chat": { "id": 42 }, "text": "edit" } }),
        json!({ "update_id": 7, "callback_query": { "id": "cb", "data": "x" } }),
    ];
    for payload in payloads {
        let (status, _) = send(&app, json_request("POST", "/webhook", payload)).await;
        assert_eq!(status, StatusCode::OK);
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn message_without_text_or_chat_is_acknowledged() {
    let (fake, base) = FakeTelegram::start().await;
    let (app, mut rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let no_text = json!({ "message": { "chat": { "id": 1 }, "photo": [] } });
    let empty_text = text_update(1, "");
    let no_chat = json!({ "message": { "text": "orphan" } });
    for payload in [no_text, empty_text, no_chat] {
        let (status, _) = send(&app, json_request("POST", "/webhook", payload)).await;
        assert_eq!(status, StatusCode::OK);
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn garbage_body_is_still_acknowledged() {
    let (app, _rx) = setup_app(offline_config());
    let req = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "text/plain")
        .body(Body::from("not json at all"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn echo_without_token_reports_failure_and_acknowledges() {
    let (app, mut rx) = setup_app(offline_config());

    let (status, _) = send(&app, json_request("POST", "/webhook", text_update(9, "hi"))).await;
    assert_eq!(status, StatusCode::OK);

    let report = next_report(&mut rx).await;
    assert!(!report.is_delivered());
    assert!(matches!(report.outcome, DeliveryOutcome::Failed { .. }));
}

#[tokio::test]
async fn unreachable_bot_api_does_not_affect_response() {
    let (app, mut rx) = setup_app(config(Some(TEST_TOKEN), UNREACHABLE_BASE, None));

    let (status, body) = send(&app, json_request("POST", "/webhook", text_update(9, "hi"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let report = next_report(&mut rx).await;
    match report.outcome {
        DeliveryOutcome::Failed { error } => assert!(!error.contains(TEST_TOKEN)),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn telegram_rejection_is_reported() {
    let (fake, base) = FakeTelegram::start().await;
    fake.reply(
        &format!("/bot{}/sendMessage", TEST_TOKEN),
        StatusCode::FORBIDDEN,
        r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#,
    );
    let (app, mut rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let (status, _) = send(&app, json_request("POST", "/webhook", text_update(3, "yo"))).await;
    assert_eq!(status, StatusCode::OK);

    let report = next_report(&mut rx).await;
    match report.outcome {
        DeliveryOutcome::Rejected { status, response } => {
            assert_eq!(status, 403);
            assert_eq!(response["error_code"], 403);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn set_webhook_requires_token() {
    let (app, _rx) = setup_app(offline_config());
    let (status, body) = send_json(
        &app,
        json_request("POST", "/set-webhook", json!({ "webhookUrl": "https://example.com/webhook" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "BOT_TOKEN not configured");
}

#[tokio::test]
async fn set_webhook_requires_url() {
    let (fake, base) = FakeTelegram::start().await;
    let (app, _rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let (status, body) = send_json(&app, json_request("POST", "/set-webhook", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "webhookUrl is required");

    let (status, _) = send_json(&app, empty_request("POST", "/set-webhook")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn set_webhook_registers_allowed_updates() {
    let (fake, base) = FakeTelegram::start().await;
    fake.reply(
        &format!("/bot{}/setWebhook", TEST_TOKEN),
        StatusCode::OK,
        r#"{"ok":true,"result":true,"description":"Webhook was set"}"#,
    );
    let (app, _rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let (status, body) = send_json(
        &app,
        json_request("POST", "/set-webhook", json!({ "webhookUrl": "https://example.com/webhook" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "result": true, "description": "Webhook was set" }));

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].json(),
        json!({
            "url": "https://example.com/webhook",
            "allowed_updates": ["message", "story", "edited_message", "callback_query"],
        })
    );
}

#[tokio::test]
async fn set_webhook_relays_telegram_errors_as_ok() {
    let (fake, base) = FakeTelegram::start().await;
    fake.reply(
        &format!("/bot{}/setWebhook", TEST_TOKEN),
        StatusCode::BAD_REQUEST,
        r#"{"ok":false,"error_code":400,"description":"Bad Request: bad webhook"}"#,
    );
    let (app, _rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let (status, body) = send_json(
        &app,
        json_request("POST", "/set-webhook", json!({ "webhookUrl": "ftp://nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["description"], "Bad Request: bad webhook");
}

#[tokio::test]
async fn webhook_info_is_relayed() {
    let (fake, base) = FakeTelegram::start().await;
    fake.reply(
        &format!("/bot{}/getWebhookInfo", TEST_TOKEN),
        StatusCode::OK,
        r#"{"ok":true,"result":{"url":"https://example.com/webhook","pending_update_count":0}}"#,
    );
    let (app, _rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let (status, body) = send_json(&app, empty_request("GET", "/webhook-info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["url"], "https://example.com/webhook");

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
}

#[tokio::test]
async fn webhook_info_failures() {
    let (app, _rx) = setup_app(offline_config());
    let (status, _) = send_json(&app, empty_request("GET", "/webhook-info")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (app, _rx) = setup_app(config(Some(TEST_TOKEN), UNREACHABLE_BASE, None));
    let (status, body) = send_json(&app, empty_request("GET", "/webhook-info")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().contains(TEST_TOKEN));
}

#[tokio::test]
async fn health_and_banner() {
    let (app, _rx) = setup_app(offline_config());

    let (status, body) = send_json(&app, empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["bot_configured"], false);
    assert!(body["timestamp"].is_string());

    let (status, body) = send_json(&app, empty_request("GET", "/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["webhook"], "/webhook");
}

#[tokio::test]
async fn unknown_route_echoes_path() {
    let (app, _rx) = setup_app(offline_config());
    let (status, body) = send_json(&app, empty_request("GET", "/does/not/exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["requestedPath"], "/does/not/exist");
}

#[tokio::test]
async fn wrong_method_is_an_unknown_route() {
    let (app, _rx) = setup_app(offline_config());
    for (method, path) in [("GET", "/webhook"), ("GET", "/set-webhook"), ("POST", "/webhook-info")] {
        let (status, body) = send_json(&app, empty_request(method, path)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, path);
        assert_eq!(body["success"], false);
        assert_eq!(body["requestedPath"], path);
    }
}

#[tokio::test]
async fn non_string_text_is_still_echoed() {
    let (fake, base) = FakeTelegram::start().await;
    let (app, mut rx) = setup_app(config(Some(TEST_TOKEN), &base, None));

    let update = json!({ "message": { "chat": { "id": 8 }, "text": 42, "from": "not-a-user" } });
    let (status, _) = send(&app, json_request("POST", "/webhook", update)).await;
    assert_eq!(status, StatusCode::OK);

    let report = next_report(&mut rx).await;
    assert!(report.is_delivered());
    assert_eq!(report.text, "You said: 42");
    assert_eq!(fake.requests()[0].json(), json!({ "chat_id": 8, "text": "You said: 42" }));
}
