//! Read-only list of Punto de Inicio sessions the cashier picks from.

use tracing::info;

use crate::error::SessionError;
use crate::route::Route;
use crate::session::{Condition, Session, SessionFilter, SessionService, SessionState, ENTRY_FIELDS};

/// Fetch Punto de Inicio sessions, ordered by lifecycle state then id.
pub async fn list_sessions<S: SessionService>(
    service: &S,
    include_closed: bool,
) -> Result<Vec<Session>, SessionError> {
    let mut filter = SessionFilter::punto_inicio();
    if !include_closed {
        filter = filter.and(Condition::StateNot(SessionState::Closed));
    }

    let mut sessions = service.fetch_sessions(&filter, ENTRY_FIELDS).await?;
    sessions.sort_by(|a, b| a.state.cmp(&b.state).then(a.id.cmp(&b.id)));
    info!("Listed {} Punto de Inicio sessions", sessions.len());
    Ok(sessions)
}

/// Where a dashboard row leads. Closed sessions lead nowhere.
pub fn next_route(session: &Session) -> Option<Route> {
    match session.state {
        SessionState::OpeningControl => Some(Route::CashOpening(session.id)),
        SessionState::Opened | SessionState::ClosingControl => {
            Some(Route::SessionDetail(session.id))
        }
        SessionState::Closed => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;

    fn session(id: u32, state: SessionState) -> Session {
        Session {
            id: SessionId::new(id).unwrap(),
            name: format!("POS/{:05}", id),
            config_id: None,
            start_at: None,
            state,
            cash_register_balance_start: 0.0,
            is_punto_inicio: true,
        }
    }

    #[test]
    fn test_next_route_by_state() {
        let id = SessionId::new(4).unwrap();
        assert_eq!(
            next_route(&session(4, SessionState::OpeningControl)),
            Some(Route::CashOpening(id))
        );
        assert_eq!(
            next_route(&session(4, SessionState::Opened)),
            Some(Route::SessionDetail(id))
        );
        assert_eq!(
            next_route(&session(4, SessionState::ClosingControl)),
            Some(Route::SessionDetail(id))
        );
        assert_eq!(next_route(&session(4, SessionState::Closed)), None);
    }
}
