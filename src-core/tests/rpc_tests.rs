use std::time::Duration;

use punto_inicio_core::rpc::OdooClient;
use punto_inicio_core::session::{
    SessionFilter, SessionId, SessionService, SessionState, DETAIL_FIELDS,
};
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_READ_PATH: &str = "/web/dataset/call_kw/pos.session/search_read";

fn id(n: u32) -> SessionId {
    SessionId::new(n).unwrap()
}

fn browser_client(server: &MockServer) -> OdooClient {
    OdooClient::browser_session(Url::parse(&server.uri()).unwrap())
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result
    }))
}

#[tokio::test]
async fn test_search_read_decodes_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEARCH_READ_PATH))
        .respond_with(rpc_result(json!([{
            "id": 42,
            "name": "PI/00042",
            "config_id": [3, "Front Counter"],
            "start_at": "2024-05-01 08:30:00",
            "state": "opened",
            "cash_register_balance_start": 100.0
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = browser_client(&server);
    let sessions = client
        .fetch_sessions(&SessionFilter::by_id(id(42)), DETAIL_FIELDS)
        .await
        .unwrap();

    assert_eq!(sessions.len(), 1);
    let session = &sessions[0];
    assert_eq!(session.id, id(42));
    assert_eq!(session.state, SessionState::Opened);
    assert_eq!(session.cash_register_balance_start, 100.0);
    assert_eq!(session.config_name(), "Front Counter");

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["method"], "call");
    assert_eq!(body["params"]["model"], "pos.session");
    assert_eq!(body["params"]["method"], "search_read");
    assert_eq!(body["params"]["kwargs"]["domain"], json!([["id", "=", 42]]));
    assert_eq!(
        body["params"]["kwargs"]["fields"],
        json!(["name", "config_id", "start_at", "state", "cash_register_balance_start"])
    );
}

#[tokio::test]
async fn test_error_body_prefers_data_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/web/dataset/call_kw/pos.session/action_pos_session_open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 200,
                "message": "Odoo Server Error",
                "data": {
                    "name": "odoo.exceptions.UserError",
                    "message": "Another session is already open"
                }
            }
        })))
        .mount(&server)
        .await;

    let fault = browser_client(&server).open_session(id(42)).await.unwrap_err();

    assert_eq!(fault.message, "Another session is already open");
}

#[tokio::test]
async fn test_non_success_status_is_a_fault() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/web/dataset/call_kw/pos.session/action_pos_session_closing_control"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let fault = browser_client(&server)
        .begin_closing_control(id(42))
        .await
        .unwrap_err();

    assert_eq!(fault.message, "HTTP error 500 Internal Server Error");
}

#[tokio::test]
async fn test_html_body_names_the_failed_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEARCH_READ_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>Login</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let fault = browser_client(&server)
        .fetch_sessions(&SessionFilter::by_id(id(42)), DETAIL_FIELDS)
        .await
        .unwrap_err();

    assert!(
        fault
            .message
            .starts_with(&format!("Unexpected response from {}", SEARCH_READ_PATH)),
        "Fault should name the call, got: {}",
        fault.message
    );
}

#[tokio::test]
async fn test_login_rejected_with_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "params": { "service": "common", "method": "login" }
        })))
        .respond_with(rpc_result(json!(false)))
        .expect(1)
        .mount(&server)
        .await;

    let result = OdooClient::login(
        Url::parse(&server.uri()).unwrap(),
        "production",
        "cashier@example.com",
        "wrong",
        Duration::from_secs(5),
    )
    .await;

    let fault = result.err().unwrap();
    assert_eq!(fault.message, "Login failed: wrong login or password");
}

#[tokio::test]
async fn test_login_then_execute_kw_carries_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "params": { "service": "common", "method": "login" }
        })))
        .respond_with(rpc_result(json!(7)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "params": { "service": "object", "method": "execute_kw" }
        })))
        .respond_with(rpc_result(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let client = OdooClient::login(
        Url::parse(&server.uri()).unwrap(),
        "production",
        "cashier@example.com",
        "secret",
        Duration::from_secs(5),
    )
    .await
    .unwrap();
    client.open_session(id(42)).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[1].body_json().unwrap();
    assert_eq!(
        body["params"]["args"],
        json!([
            "production",
            7,
            "secret",
            "pos.session",
            "action_pos_session_open",
            [[42]],
            {}
        ])
    );
}
