mod common;

use axum::http::{Method, StatusCode};
use common::{FakeBackend, RecordingConsole, closed_address};
use serde_json::json;
use terminal_pos::application::controller::SessionController;
use terminal_pos::domain::payment::ApiReply;
use terminal_pos::domain::ports::TerminalBackend;
use terminal_pos::error::TerminalError;
use terminal_pos::infrastructure::http::HttpTerminalBackend;

fn controller(base: &str) -> (SessionController, RecordingConsole) {
    let console = RecordingConsole::default();
    let backend = HttpTerminalBackend::parse(base).unwrap();
    (
        SessionController::new(Box::new(backend), Box::new(console.clone())),
        console,
    )
}

fn sample_readers() -> serde_json::Value {
    json!({
        "readersList": {
            "object": "list",
            "data": [
                {
                    "id": "r1",
                    "label": "Reader 1",
                    "device_type": "simulated_wisepos_e",
                    "action": null
                },
                {"id": "r2", "label": "Counter", "device_type": "bbpos_wisepos_e"}
            ]
        }
    })
}

#[tokio::test]
async fn test_list_readers_over_http() {
    let fake = FakeBackend::default();
    fake.reply_json("/api/readers", sample_readers());
    let base = fake.serve().await;

    let (mut controller, console) = controller(&base);
    controller.load_readers().await;

    let readers = controller.state().readers.clone().unwrap();
    assert_eq!(readers.len(), 2);
    assert!(readers[0].is_simulated());
    assert!(console.lines().is_empty());
    assert_eq!(fake.requests()[0].method, Method::GET);
}

#[tokio::test]
async fn test_process_payment_scenario() {
    let fake = FakeBackend::default();
    fake.reply_json(
        "/api/readers/process-payment",
        json!({"reader": {"id": "r1", "label": "Reader 1"}, "paymentIntent": {"id": "pi_123"}}),
    );
    let base = fake.serve().await;

    let (mut controller, _) = controller(&base);
    controller.select_reader("r1");
    controller.set_amount("100");
    controller.process_payment().await;

    assert_eq!(
        controller.state().transcript(),
        ["Processing payment for 100 on reader Reader 1"]
    );
    assert!(controller.is_capturable());

    let request = &fake.requests()[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/readers/process-payment");
    assert_eq!(request.body, Some(json!({"amount": "100", "readerId": "r1"})));
}

#[tokio::test]
async fn test_capture_scenario_resets_session() {
    let fake = FakeBackend::default();
    fake.reply_json(
        "/api/readers/process-payment",
        json!({"reader": {"id": "r1", "label": "Reader 1"}, "paymentIntent": {"id": "pi_123"}}),
    )
    .reply_json("/api/payments/capture", json!({"paymentIntent": {"id": "pi_123"}}));
    let base = fake.serve().await;

    let (mut controller, _) = controller(&base);
    controller.select_reader("r1");
    controller.set_amount("100");
    controller.process_payment().await;
    controller.capture_payment().await;

    let state = controller.state();
    assert_eq!(state.transcript().last().unwrap(), "Captured payment for pi_123");
    assert!(state.reader.is_none());
    assert!(state.amount.is_none());
    assert!(state.payment_intent.is_none());
    assert_eq!(
        fake.requests()[1].body,
        Some(json!({"paymentIntentId": "pi_123"}))
    );
}

#[tokio::test]
async fn test_simulate_error_scenario() {
    let fake = FakeBackend::default();
    fake.reply_json(
        "/api/readers/process-payment",
        json!({
            "reader": {"id": "r1", "label": "Reader 1", "device_type": "simulated_wisepos_e"},
            "paymentIntent": {"id": "pi_123", "status": "requires_payment_method"}
        }),
    )
    .reply_json(
        "/api/readers/simulate-payment",
        json!({"error": {"message": "reader offline"}}),
    );
    let base = fake.serve().await;

    let (mut controller, console) = controller(&base);
    controller.select_reader("r1");
    controller.set_amount("100");
    controller.process_payment().await;
    assert!(controller.is_simulateable());
    let before = controller.state().clone();

    controller.simulate_payment().await;

    let after = controller.state();
    assert_eq!(after.transcript().last().unwrap(), "reader offline");
    assert_eq!(after.reader, before.reader);
    assert_eq!(after.payment_intent, before.payment_intent);
    assert!(console.lines().is_empty());
    assert_eq!(fake.requests()[1].body, Some(json!({"readerId": "r1"})));
}

#[tokio::test]
async fn test_error_body_with_failure_status_is_still_a_business_error() {
    let fake = FakeBackend::default();
    fake.reply(
        "/api/readers/process-payment",
        StatusCode::BAD_REQUEST,
        json!({"error": {"message": "No such terminal.reader: 'r9'"}}).to_string(),
    );
    let base = fake.serve().await;

    let backend = HttpTerminalBackend::parse(&base).unwrap();
    let reply = backend.process_payment("100", "r9").await.unwrap();

    assert_eq!(reply, ApiReply::rejected("No such terminal.reader: 'r9'"));
}

#[tokio::test]
async fn test_non_json_body_is_a_transport_failure() {
    let fake = FakeBackend::default();
    fake.reply(
        "/api/payments/capture",
        StatusCode::INTERNAL_SERVER_ERROR,
        "<html>Internal Server Error</html>",
    );
    let base = fake.serve().await;

    let backend = HttpTerminalBackend::parse(&base).unwrap();
    let result = backend.capture_payment("pi_1").await;

    assert!(matches!(result, Err(TerminalError::Decode(_))));
}

#[tokio::test]
async fn test_cancel_error_is_console_only() {
    let fake = FakeBackend::default();
    fake.reply_json(
        "/api/payments/cancel-payment",
        json!({"error": {"message": "Reader is not busy"}}),
    );
    let base = fake.serve().await;

    let (mut controller, console) = controller(&base);
    controller.select_reader("r1");
    controller.cancel_action().await;

    assert!(controller.state().transcript().is_empty());
    assert_eq!(controller.state().reader_id.as_deref(), Some("r1"));
    assert_eq!(console.lines(), ["Error: Reader is not busy"]);
}

#[tokio::test]
async fn test_cancel_success_takes_reader_id_from_response() {
    let fake = FakeBackend::default();
    fake.reply_json(
        "/api/payments/cancel-payment",
        json!({"reader": {"id": "r2", "label": "Counter", "action": null}}),
    );
    let base = fake.serve().await;

    let (mut controller, console) = controller(&base);
    controller.select_reader("r1");
    controller.set_amount("42");
    controller.cancel_action().await;

    assert_eq!(controller.state().reader_id.as_deref(), Some("r2"));
    assert!(controller.state().amount.is_none());
    assert_eq!(console.lines(), ["Canceled reader action on Counter (r2)"]);
}

#[tokio::test]
async fn test_cancel_without_selected_reader_sends_null() {
    let fake = FakeBackend::default();
    fake.reply_json(
        "/api/payments/cancel-payment",
        json!({"error": {"message": "Missing required param: reader."}}),
    );
    let base = fake.serve().await;

    let (mut controller, console) = controller(&base);
    controller.cancel_action().await;

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, Some(json!({"readerId": null})));
    assert_eq!(console.lines(), ["Error: Missing required param: reader."]);
}

#[tokio::test]
async fn test_reader_listing_network_failure() {
    let base = closed_address().await;

    let (mut controller, console) = controller(&base);
    controller.load_readers().await;

    assert!(controller.state().readers.is_none());
    assert!(controller.state().transcript().is_empty());
    assert_eq!(console.lines().len(), 1);
    assert!(console.lines()[0].starts_with("Error fetching readers: HTTP error"));
}

#[tokio::test]
async fn test_capture_failure_leaves_session_untouched() {
    let fake = FakeBackend::default();
    fake.reply_json(
        "/api/readers/process-payment",
        json!({"reader": {"id": "r1", "label": "Reader 1"}, "paymentIntent": {"id": "pi_123"}}),
    );
    let base = fake.serve().await;

    let (mut controller, console) = controller(&base);
    controller.select_reader("r1");
    controller.set_amount("100");
    controller.process_payment().await;
    let before = controller.state().clone();

    // The capture route is not served, so the body cannot be decoded.
    controller.capture_payment().await;

    assert_eq!(controller.state(), &before);
    assert_eq!(console.lines().len(), 1);
    assert!(console.lines()[0].starts_with("Error capturing payment: Decoding error"));
}
