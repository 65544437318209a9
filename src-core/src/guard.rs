//! Entry checks run before the cashier is sent into the cash opening page or
//! the session view.

use tracing::{info, warn};

use crate::error::SessionError;
use crate::session::{Session, SessionFilter, SessionId, SessionService, SessionState, ENTRY_FIELDS};

/// Which page the cashier is about to enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySurface {
    CashOpening,
    Ui,
}

/// Check that `raw_id` names a Punto de Inicio session the surface may show.
///
/// Returns the session as fetched for the check.
pub async fn check_entry<S: SessionService>(
    service: &S,
    raw_id: Option<&str>,
    surface: EntrySurface,
) -> Result<Session, SessionError> {
    let raw_id = raw_id.ok_or_else(|| {
        SessionError::InvalidReference("No session id was provided".to_string())
    })?;
    let session_id: SessionId = raw_id.parse().map_err(SessionError::InvalidReference)?;

    info!("Checking entry to {:?} for session {}", surface, session_id);
    let session = service
        .fetch_sessions(&SessionFilter::by_id(session_id), ENTRY_FIELDS)
        .await?
        .into_iter()
        .next()
        .ok_or(SessionError::NotFound(session_id))?;

    if !session.is_punto_inicio {
        warn!("Session {} is not a Punto de Inicio session", session_id);
        return Err(SessionError::NotPuntoInicio(session_id));
    }

    if surface == EntrySurface::Ui && session.state == SessionState::Closed {
        warn!("Session {} is already closed", session_id);
        return Err(SessionError::AlreadyClosed(session_id));
    }

    Ok(session)
}
