use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::wire::{CallKwParams, MethodCall, RpcRequest, RpcResponse, ServiceParams};
use crate::error::Fault;
use crate::session::{Session, SessionField, SessionFilter, SessionId, SessionService};

#[derive(Clone)]
enum Auth {
    /// Same-origin browser session; the cookie authenticates each call.
    BrowserSession,
    /// External API with explicit credentials on every call.
    ExternalApi {
        database: String,
        uid: i64,
        password: String,
    },
}

/// [`SessionService`] backed by an Odoo server over JSON-RPC.
///
/// Cheap to clone; clones share the HTTP connection pool and request ids.
#[derive(Clone)]
pub struct OdooClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Auth,
    next_id: Arc<AtomicU64>,
}

impl OdooClient {
    /// Client for code served by the server itself, authenticated by the
    /// browser's session cookie.
    pub fn browser_session(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            auth: Auth::BrowserSession,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Log in through the external API and keep the credentials for later
    /// calls.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn login(
        base_url: Url,
        database: &str,
        login: &str,
        password: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, Fault> {
        let http = reqwest::Client::builder()
            .user_agent("PuntoInicio/1.0")
            .timeout(timeout)
            .build()?;

        let mut client = Self {
            http,
            base_url,
            auth: Auth::BrowserSession,
            next_id: Arc::new(AtomicU64::new(1)),
        };

        info!("Logging in to {} as {}", database, login);
        let uid = client
            .post("/jsonrpc", ServiceParams::login(database, login, password))
            .await?;
        let uid = uid
            .as_i64()
            .ok_or_else(|| Fault::new("Login failed: wrong login or password"))?;
        debug!("Logged in with uid {}", uid);

        client.auth = Auth::ExternalApi {
            database: database.to_string(),
            uid,
            password: password.to_string(),
        };
        Ok(client)
    }

    /// Run a model method and return the raw result.
    pub async fn call(&self, call: &MethodCall) -> Result<Value, Fault> {
        debug!("Calling {}.{}", call.model, call.method);
        match &self.auth {
            Auth::BrowserSession => {
                let path = format!("/web/dataset/call_kw/{}/{}", call.model, call.method);
                self.post(&path, CallKwParams::from(call)).await
            }
            Auth::ExternalApi {
                database,
                uid,
                password,
            } => {
                self.post(
                    "/jsonrpc",
                    ServiceParams::execute_kw(database, *uid, password, call),
                )
                .await
            }
        }
    }

    async fn call_as<T: DeserializeOwned>(&self, call: &MethodCall) -> Result<T, Fault> {
        let value = self.call(call).await?;
        serde_json::from_value(value).map_err(|e| {
            Fault::new(format!(
                "Unexpected response from {}.{}: {}",
                call.model, call.method, e
            ))
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn post<P: Serialize>(&self, path: &str, params: P) -> Result<Value, Fault> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::call(id, params);

        let response = self
            .http
            .post(self.endpoint(path))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("HTTP {} from {}", status, path);
            return Err(Fault::new(format!(
                "HTTP error {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| Fault::new(format!("Unexpected response from {}: {}", path, e)))?;
        body.into_result()
    }
}

impl SessionService for OdooClient {
    async fn set_cashbox_opening(
        &self,
        session_id: SessionId,
        cashbox_start: f64,
        notes: &str,
    ) -> Result<(), Fault> {
        self.call(&MethodCall::set_cashbox_opening(session_id, cashbox_start, notes))
            .await
            .map(|_| ())
    }

    async fn open_session(&self, session_id: SessionId) -> Result<(), Fault> {
        self.call(&MethodCall::open_session(session_id))
            .await
            .map(|_| ())
    }

    async fn begin_closing_control(&self, session_id: SessionId) -> Result<(), Fault> {
        self.call(&MethodCall::begin_closing_control(session_id))
            .await
            .map(|_| ())
    }

    async fn fetch_sessions(
        &self,
        filter: &SessionFilter,
        fields: &[SessionField],
    ) -> Result<Vec<Session>, Fault> {
        self.call_as(&MethodCall::search_read(filter, fields)).await
    }
}
