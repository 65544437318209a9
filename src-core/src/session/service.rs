use crate::error::Fault;

use super::filter::SessionFilter;
use super::types::{Session, SessionField, SessionId};

/// Remote capability that owns and mutates `pos.session` records.
///
/// Futures are not required to be `Send`: the browser host drives them with
/// `spawn_local` and the terminal host on a current-thread runtime.
#[allow(async_fn_in_trait)]
pub trait SessionService {
    /// Record the starting cash balance and opening notes.
    async fn set_cashbox_opening(
        &self,
        session_id: SessionId,
        cashbox_start: f64,
        notes: &str,
    ) -> Result<(), Fault>;

    /// `opening_control -> opened`.
    async fn open_session(&self, session_id: SessionId) -> Result<(), Fault>;

    /// `opened -> closing_control`.
    async fn begin_closing_control(&self, session_id: SessionId) -> Result<(), Fault>;

    async fn fetch_sessions(
        &self,
        filter: &SessionFilter,
        fields: &[SessionField],
    ) -> Result<Vec<Session>, Fault>;
}

impl<T: SessionService + ?Sized> SessionService for &T {
    async fn set_cashbox_opening(
        &self,
        session_id: SessionId,
        cashbox_start: f64,
        notes: &str,
    ) -> Result<(), Fault> {
        (**self)
            .set_cashbox_opening(session_id, cashbox_start, notes)
            .await
    }

    async fn open_session(&self, session_id: SessionId) -> Result<(), Fault> {
        (**self).open_session(session_id).await
    }

    async fn begin_closing_control(&self, session_id: SessionId) -> Result<(), Fault> {
        (**self).begin_closing_control(session_id).await
    }

    async fn fetch_sessions(
        &self,
        filter: &SessionFilter,
        fields: &[SessionField],
    ) -> Result<Vec<Session>, Fault> {
        (**self).fetch_sessions(filter, fields).await
    }
}
