//! End-to-end transport behaviour against a raw TCP fixture server.
//!
//! Each test serves one canned HTTP response from a loopback listener and
//! drives the real client, gateway, and store stack against it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use console::domain::{
    ApiErrorKind, CallOptions, IdempotencyKey, PaymentDraft, PaymentGateway, PaymentStatus,
    PaymentStatusQuery,
};
use console::test_support::{VALIDATION_ERROR_BODY, payment, payment_envelope_body};
use console::{ApiClient, CancelToken, ClientConfig, PaymentsApi, PaymentsStore, RequestOptions};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

fn http_response(status_line: &str, extra_headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status_line}\r\n");
    for (name, value) in extra_headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str("Content-Type: application/json\r\n");
    response.push_str(&format!("Content-Length: {}\r\n", body.len()));
    response.push_str("Connection: close\r\n\r\n");
    response.push_str(body);
    response
}

/// Serve exactly one response, capturing the raw request for assertions.
async fn serve_once(response: String, delay: Duration) -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("fixture listener binds");
    let addr = listener.local_addr().expect("fixture address");
    let (captured_tx, captured_rx) = oneshot::channel();
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut buffer = vec![0u8; 16 * 1024];
        let read = socket.read(&mut buffer).await.unwrap_or(0);
        let _ = captured_tx.send(String::from_utf8_lossy(&buffer[..read]).into_owned());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    (addr, captured_rx)
}

fn client_for(addr: SocketAddr) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::new(ClientConfig::new(format!("http://{addr}/api/v1")))
            .expect("client builds"),
    )
}

fn store_for(addr: SocketAddr) -> PaymentsStore<PaymentsApi> {
    PaymentsStore::new(Arc::new(PaymentsApi::new(client_for(addr))))
}

#[tokio::test]
async fn create_payment_flows_through_client_gateway_and_store() {
    let fixture = payment("pay_live", PaymentStatus::Pending);
    let (addr, captured) = serve_once(
        http_response(
            "201 Created",
            &[("X-Request-ID", "req_echo_1")],
            &payment_envelope_body(&fixture),
        ),
        Duration::ZERO,
    )
    .await;
    let store = store_for(addr);

    let options = CallOptions {
        idempotency_key: Some(IdempotencyKey::new("payment_fixture_key").expect("valid key")),
        ..CallOptions::default()
    };
    let created = store
        .create_payment(PaymentDraft::new("mock", 150.0, "IDR"), options)
        .await;

    assert_eq!(created.map(|p| p.id), Some("pay_live".to_owned()));
    let state = store.snapshot();
    assert_eq!(state.payments.len(), 1);
    assert_eq!(state.error, None);

    let request = captured.await.expect("request captured").to_lowercase();
    assert!(request.starts_with("post /api/v1/payments http/1.1"));
    assert!(request.contains("idempotency-key: payment_fixture_key"));
    assert!(request.contains("x-request-id:"), "a tracing id is always sent");
    assert!(request.contains("accept: application/json"));
    assert!(request.contains("content-type: application/json"));
}

#[tokio::test]
async fn validation_failure_is_normalized_end_to_end() {
    let (addr, _captured) = serve_once(
        http_response(
            "422 Unprocessable Entity",
            &[("X-Request-ID", "req_fixture_9")],
            VALIDATION_ERROR_BODY,
        ),
        Duration::ZERO,
    )
    .await;
    let gateway = PaymentsApi::new(client_for(addr));

    let error = gateway
        .create_payment(
            &PaymentDraft::new("mock", 150.0, "IDR"),
            &CallOptions::default(),
        )
        .await
        .expect_err("422 must fail");

    assert_eq!(error.kind(), ApiErrorKind::Http);
    assert_eq!(error.status(), 422);
    assert_eq!(error.message(), "The given data was invalid.");
    assert_eq!(error.request_id(), Some("req_fixture_9"));
    let issue = error.validation().first().expect("one validation issue");
    assert_eq!(issue.field, "amount");
    assert_eq!(issue.messages, ["The amount field is required."]);
}

#[tokio::test]
async fn validation_failure_lands_in_the_store_error_slot() {
    let (addr, _captured) = serve_once(
        http_response("422 Unprocessable Entity", &[], VALIDATION_ERROR_BODY),
        Duration::ZERO,
    )
    .await;
    let store = store_for(addr);

    let created = store
        .create_payment(PaymentDraft::new("mock", 150.0, "IDR"), CallOptions::default())
        .await;

    assert!(created.is_none());
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("The given data was invalid."));
    assert!(state.payments.is_empty());
    assert!(!state.is_creating);
}

#[tokio::test]
async fn status_refresh_hits_the_encoded_path() {
    let fixture = payment("pay_7", PaymentStatus::Succeeded);
    let (addr, captured) = serve_once(
        http_response("200 OK", &[], &payment_envelope_body(&fixture)),
        Duration::ZERO,
    )
    .await;
    let store = store_for(addr);

    let refreshed = store
        .refresh_payment_status(
            PaymentStatusQuery::new("mock pay", "ref/2024"),
            CallOptions::default(),
        )
        .await;

    assert_eq!(
        refreshed.map(|p| p.status),
        Some(PaymentStatus::Succeeded)
    );
    let request = captured.await.expect("request captured");
    assert!(
        request.starts_with("GET /api/v1/payments/mock%20pay/ref%2F2024/status HTTP/1.1"),
        "path segments must be percent-encoded: {request}"
    );
}

#[tokio::test]
async fn slow_responses_surface_the_timeout_kind() {
    let (addr, _captured) = serve_once(
        http_response("200 OK", &[], "{}"),
        Duration::from_millis(500),
    )
    .await;
    let client = client_for(addr);

    let error = client
        .get::<Value>(
            "/slow",
            RequestOptions {
                timeout: Some(Duration::from_millis(50)),
                ..RequestOptions::default()
            },
        )
        .await
        .expect_err("deadline must win");

    assert_eq!(error.kind(), ApiErrorKind::Timeout);
    assert_eq!(error.status(), 0);
}

#[tokio::test]
async fn pre_cancelled_token_aborts_without_touching_the_collection() {
    let (addr, _captured) = serve_once(
        http_response("200 OK", &[], "{}"),
        Duration::ZERO,
    )
    .await;
    let token = CancelToken::new();
    token.cancel();

    let gateway = PaymentsApi::new(client_for(addr));
    let error = gateway
        .payment_status(
            &PaymentStatusQuery::new("mock", "ref_1"),
            &CallOptions {
                cancel: Some(token.clone()),
                ..CallOptions::default()
            },
        )
        .await
        .expect_err("aborted call must fail");
    assert_eq!(error.kind(), ApiErrorKind::Abort);

    let store = store_for(addr);
    let refreshed = store
        .refresh_payment_status(
            PaymentStatusQuery::new("mock", "ref_1"),
            CallOptions {
                cancel: Some(token),
                ..CallOptions::default()
            },
        )
        .await;
    assert!(refreshed.is_none());
    let state = store.snapshot();
    assert!(state.payments.is_empty(), "no mutation on abort");
    assert_eq!(state.error.as_deref(), Some("request cancelled by caller"));
}

#[tokio::test]
async fn empty_bodies_resolve_to_null() {
    let (addr, _captured) =
        serve_once(http_response("204 No Content", &[], ""), Duration::ZERO).await;
    let client = client_for(addr);

    let outcome = client
        .delete::<Value>("/users/u_1", RequestOptions::default())
        .await
        .expect("empty body is a success");
    assert_eq!(outcome.status, 204);
    assert_eq!(outcome.data, Value::Null);
}

#[tokio::test]
async fn non_enveloped_bodies_pass_through_whole() {
    let (addr, _captured) = serve_once(
        http_response("200 OK", &[], r#"{"id":"raw","ok":true}"#),
        Duration::ZERO,
    )
    .await;
    let client = client_for(addr);

    let outcome = client
        .get::<Value>("/raw", RequestOptions::default())
        .await
        .expect("plain body is a success");
    assert_eq!(outcome.data, json!({"id": "raw", "ok": true}));
}

#[tokio::test]
async fn invalid_success_bodies_surface_the_parse_kind() {
    let (addr, _captured) = serve_once(
        http_response("200 OK", &[], "<html>not json</html>"),
        Duration::ZERO,
    )
    .await;
    let client = client_for(addr);

    let error = client
        .get::<Value>("/broken", RequestOptions::default())
        .await
        .expect_err("malformed body must fail");
    assert_eq!(error.kind(), ApiErrorKind::Parse);
    assert_eq!(error.status(), 200);
}

#[tokio::test]
async fn refused_connections_surface_the_network_kind() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener binds");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    let client = client_for(addr);
    let error = client
        .get::<Value>("/payments", RequestOptions::default())
        .await
        .expect_err("refused connection must fail");
    assert_eq!(error.kind(), ApiErrorKind::Network);
    assert_eq!(error.status(), 0);
}
