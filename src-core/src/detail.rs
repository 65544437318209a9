//! Session detail view: load one session, show it, and let the cashier start
//! closing control or go back to the dashboard.

use std::cell::RefCell;

use tracing::{error, info, warn};

use crate::capability::{Confirmer, Navigator, NotificationLevel, Notifier};
use crate::error::SessionError;
use crate::route::{parse_session_id, Route};
use crate::session::{Session, SessionFilter, SessionId, SessionService, DETAIL_FIELDS};

pub const CLOSE_PROMPT: &str = "Are you sure you want to close this session?";

/// What the view currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Loading,
    Loaded(Session),
    Errored(SessionError),
}

/// Inputs to the display state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Fetched {
        session_id: SessionId,
        sessions: Vec<Session>,
    },
    Failed(SessionError),
}

impl DisplayState {
    /// Pure transition function. Only `Loading` reacts to events; `Loaded`
    /// and `Errored` are final for the lifetime of the view.
    pub fn apply(self, event: ViewEvent) -> DisplayState {
        match (self, event) {
            (DisplayState::Loading, ViewEvent::Fetched { session_id, sessions }) => {
                match sessions.into_iter().next() {
                    Some(session) => DisplayState::Loaded(session),
                    None => DisplayState::Errored(SessionError::NotFound(session_id)),
                }
            }
            (DisplayState::Loading, ViewEvent::Failed(err)) => DisplayState::Errored(err),
            (state, _) => state,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            DisplayState::Loaded(session) => Some(session),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SessionError> {
        match self {
            DisplayState::Errored(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Closing control started and the dashboard was requested.
    Closed,
    /// The cashier said no.
    Declined,
    /// No session is loaded.
    Unavailable,
}

pub struct SessionView<S, N, C, V> {
    service: S,
    notifier: N,
    confirmer: C,
    navigator: V,
    state: RefCell<DisplayState>,
}

impl<S, N, C, V> SessionView<S, N, C, V>
where
    S: SessionService,
    N: Notifier,
    C: Confirmer,
    V: Navigator,
{
    pub fn new(service: S, notifier: N, confirmer: C, navigator: V) -> Self {
        Self {
            service,
            notifier,
            confirmer,
            navigator,
            state: RefCell::new(DisplayState::Loading),
        }
    }

    /// Snapshot of the current display state.
    pub fn state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Load the session named by the `session_id` query parameter.
    ///
    /// Runs once; later calls return the current state unchanged.
    pub async fn mount(&self, query: &str) -> DisplayState {
        if !self.state.borrow().is_loading() {
            return self.state();
        }

        let event = self.load(query).await;
        let next = self.state.replace(DisplayState::Loading).apply(event);

        if let DisplayState::Errored(err) = &next {
            error!("Failed to load session: {}", err);
            self.notifier.notify(
                &format!("Failed to load the session: {}", err),
                NotificationLevel::Danger,
            );
        }

        *self.state.borrow_mut() = next.clone();
        next
    }

    /// Show a session the host already fetched, e.g. through the entry
    /// check, instead of loading it again.
    ///
    /// Like `mount`, only takes effect while the view is still loading.
    pub fn adopt(&self, session: Session) -> DisplayState {
        if !self.state.borrow().is_loading() {
            return self.state();
        }

        info!("Showing session {} fetched by the host", session.id);
        let event = ViewEvent::Fetched {
            session_id: session.id,
            sessions: vec![session],
        };
        let next = self.state.replace(DisplayState::Loading).apply(event);
        *self.state.borrow_mut() = next.clone();
        next
    }

    async fn load(&self, query: &str) -> ViewEvent {
        let session_id = match parse_session_id(query) {
            Ok(id) => id,
            Err(err) => return ViewEvent::Failed(err),
        };
        info!("Loading session {}", session_id);

        let sessions = match self
            .service
            .fetch_sessions(&SessionFilter::by_id(session_id), DETAIL_FIELDS)
            .await
        {
            Ok(sessions) => sessions,
            Err(fault) => return ViewEvent::Failed(SessionError::ServiceFailure(fault)),
        };

        if sessions.len() > 1 {
            warn!(
                "Lookup for session {} returned {} records, using the first",
                session_id,
                sessions.len()
            );
        }
        ViewEvent::Fetched {
            session_id,
            sessions,
        }
    }

    /// Ask for confirmation, then move the loaded session to closing control.
    ///
    /// On failure the stale snapshot stays on screen; it is not re-fetched.
    pub async fn close_session(&self) -> Result<CloseOutcome, SessionError> {
        let session_id = match self.state.borrow().session() {
            Some(session) => session.id,
            None => {
                warn!("Close requested with no session loaded");
                return Ok(CloseOutcome::Unavailable);
            }
        };

        if !self.confirmer.confirm(CLOSE_PROMPT) {
            info!("Closing session {} declined", session_id);
            return Ok(CloseOutcome::Declined);
        }

        info!("Starting closing control for session {}", session_id);
        match self.service.begin_closing_control(session_id).await {
            Ok(()) => {
                self.notifier
                    .notify("Session closed successfully", NotificationLevel::Success);
                self.navigator.navigate_to(&Route::Dashboard);
                Ok(CloseOutcome::Closed)
            }
            Err(fault) => {
                error!("Failed to close session {}: {}", session_id, fault);
                self.notifier.notify(
                    &format!("Failed to close the session: {}", fault),
                    NotificationLevel::Danger,
                );
                Err(SessionError::ServiceFailure(fault))
            }
        }
    }

    pub fn back_to_dashboard(&self) {
        self.navigator.navigate_to(&Route::Dashboard);
    }
}
