//! JSON-RPC 2.0 envelopes spoken by the server, and the method calls the
//! session service is built from.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::Fault;
use crate::session::{SessionField, SessionFilter, SessionId};

pub const SESSION_MODEL: &str = "pos.session";

/// A model method invocation, independent of the endpoint that carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub model: &'static str,
    pub method: &'static str,
    pub args: Value,
    pub kwargs: Value,
}

impl MethodCall {
    fn on_session(method: &'static str, session_id: SessionId, kwargs: Value) -> Self {
        Self {
            model: SESSION_MODEL,
            method,
            args: json!([[session_id.get()]]),
            kwargs,
        }
    }

    pub fn set_cashbox_opening(session_id: SessionId, cashbox_start: f64, notes: &str) -> Self {
        Self::on_session(
            "set_cashbox_opening",
            session_id,
            json!({ "cashbox_start": cashbox_start, "notes": notes }),
        )
    }

    pub fn open_session(session_id: SessionId) -> Self {
        Self::on_session("action_pos_session_open", session_id, json!({}))
    }

    pub fn begin_closing_control(session_id: SessionId) -> Self {
        Self::on_session("action_pos_session_closing_control", session_id, json!({}))
    }

    pub fn search_read(filter: &SessionFilter, fields: &[SessionField]) -> Self {
        let fields: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
        Self {
            model: SESSION_MODEL,
            method: "search_read",
            args: json!([]),
            kwargs: json!({ "domain": filter.to_domain(), "fields": fields }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RpcRequest<P> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: P,
    pub id: u64,
}

impl<P: Serialize> RpcRequest<P> {
    pub fn call(id: u64, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "call",
            params,
            id,
        }
    }
}

/// Params for `/web/dataset/call_kw/<model>/<method>`.
#[derive(Debug, Serialize)]
pub struct CallKwParams<'a> {
    pub model: &'a str,
    pub method: &'a str,
    pub args: &'a Value,
    pub kwargs: &'a Value,
}

impl<'a> From<&'a MethodCall> for CallKwParams<'a> {
    fn from(call: &'a MethodCall) -> Self {
        Self {
            model: call.model,
            method: call.method,
            args: &call.args,
            kwargs: &call.kwargs,
        }
    }
}

/// Params for the `/jsonrpc` external API endpoint.
#[derive(Debug, Serialize)]
pub struct ServiceParams {
    pub service: &'static str,
    pub method: &'static str,
    pub args: Value,
}

impl ServiceParams {
    pub fn login(database: &str, login: &str, password: &str) -> Self {
        Self {
            service: "common",
            method: "login",
            args: json!([database, login, password]),
        }
    }

    pub fn execute_kw(database: &str, uid: i64, password: &str, call: &MethodCall) -> Self {
        Self {
            service: "object",
            method: "execute_kw",
            args: json!([
                database,
                uid,
                password,
                call.model,
                call.method,
                call.args,
                call.kwargs
            ]),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

impl RpcErrorBody {
    /// `data.message` carries the user-facing text; the top-level message is
    /// a generic "Odoo Server Error".
    pub fn fault_message(&self) -> String {
        self.data
            .as_ref()
            .and_then(|data| data.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.message.as_str())
            .to_string()
    }
}

impl RpcResponse {
    pub fn into_result(self) -> Result<Value, Fault> {
        if let Some(error) = self.error {
            return Err(Fault::new(error.fault_message()));
        }
        // A void server method answers with `null` or omits the result.
        Ok(self.result.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> SessionId {
        SessionId::new(n).unwrap()
    }

    #[test]
    fn test_set_cashbox_opening_call() {
        let call = MethodCall::set_cashbox_opening(id(42), 100.0, "initial");
        assert_eq!(call.model, "pos.session");
        assert_eq!(call.method, "set_cashbox_opening");
        assert_eq!(call.args, json!([[42]]));
        assert_eq!(call.kwargs, json!({"cashbox_start": 100.0, "notes": "initial"}));
    }

    #[test]
    fn test_lifecycle_calls_target_session() {
        assert_eq!(MethodCall::open_session(id(7)).method, "action_pos_session_open");
        assert_eq!(MethodCall::open_session(id(7)).args, json!([[7]]));
        assert_eq!(
            MethodCall::begin_closing_control(id(7)).method,
            "action_pos_session_closing_control"
        );
    }

    #[test]
    fn test_search_read_call() {
        let call = MethodCall::search_read(
            &SessionFilter::by_id(id(42)),
            &[SessionField::Name, SessionField::State],
        );
        assert_eq!(call.method, "search_read");
        assert_eq!(call.args, json!([]));
        assert_eq!(
            call.kwargs,
            json!({"domain": [["id", "=", 42]], "fields": ["name", "state"]})
        );
    }

    #[test]
    fn test_call_kw_envelope() {
        let call = MethodCall::open_session(id(3));
        let request = RpcRequest::call(9, CallKwParams::from(&call));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "jsonrpc": "2.0",
                "method": "call",
                "params": {
                    "model": "pos.session",
                    "method": "action_pos_session_open",
                    "args": [[3]],
                    "kwargs": {}
                },
                "id": 9
            })
        );
    }

    #[test]
    fn test_execute_kw_envelope() {
        let call = MethodCall::begin_closing_control(id(5));
        let params = ServiceParams::execute_kw("prod", 2, "secret", &call);
        assert_eq!(params.service, "object");
        assert_eq!(params.method, "execute_kw");
        assert_eq!(
            params.args,
            json!([
                "prod",
                2,
                "secret",
                "pos.session",
                "action_pos_session_closing_control",
                [[5]],
                {}
            ])
        );
    }

    #[test]
    fn test_error_prefers_data_message() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 200,
                "message": "Odoo Server Error",
                "data": {
                    "name": "odoo.exceptions.UserError",
                    "message": "This session is already opened."
                }
            }
        }))
        .unwrap();
        let fault = response.into_result().unwrap_err();
        assert_eq!(fault.message, "This session is already opened.");
    }

    #[test]
    fn test_error_without_data_uses_message() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": 100, "message": "Odoo Session Expired" }
        }))
        .unwrap();
        assert_eq!(
            response.into_result().unwrap_err().message,
            "Odoo Session Expired"
        );
    }

    #[test]
    fn test_missing_result_is_null() {
        let response: RpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1})).unwrap();
        assert_eq!(response.into_result().unwrap(), Value::Null);
    }
}
