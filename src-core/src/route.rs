//! Navigation targets and the `session_id` entry parameter.

use std::fmt;

use url::form_urlencoded;

use crate::error::SessionError;
use crate::session::SessionId;

/// Query parameter carrying the session to load.
pub const SESSION_ID_PARAM: &str = "session_id";

const SESSION_UI_PATH: &str = "/punto_inicio/ui";
const CASH_OPENING_PATH: &str = "/punto_inicio/cash_opening";
const DASHBOARD_URL: &str = "/web#action=punto_inicio.action_punto_inicio_dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Session detail view for an open session.
    SessionDetail(SessionId),
    /// Cash opening page for a session still in opening control.
    CashOpening(SessionId),
    /// Punto de Inicio dashboard in the backend.
    Dashboard,
}

impl Route {
    pub fn to_url(&self) -> String {
        match self {
            Route::SessionDetail(id) => with_session_query(SESSION_UI_PATH, *id),
            Route::CashOpening(id) => with_session_query(CASH_OPENING_PATH, *id),
            Route::Dashboard => DASHBOARD_URL.to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

fn with_session_query(path: &str, id: SessionId) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(SESSION_ID_PARAM, &id.to_string())
        .finish();
    format!("{}?{}", path, query)
}

/// Raw `session_id` value of a query string (leading `?` optional).
pub fn session_id_value(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == SESSION_ID_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Read `session_id` from a query string.
///
/// Absent, empty, non-numeric, zero or negative values are all an
/// [`SessionError::InvalidReference`].
pub fn parse_session_id(query: &str) -> Result<SessionId, SessionError> {
    let raw = session_id_value(query)
        .ok_or_else(|| SessionError::InvalidReference("No session id was provided".to_string()))?;

    raw.parse::<SessionId>().map_err(SessionError::InvalidReference)
}
