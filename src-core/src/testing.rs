//! In-memory collaborators for exercising the components without a server
//! or a UI.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::capability::{Confirmer, NotificationLevel, Notifier};
use crate::error::Fault;
use crate::session::{
    Session, SessionField, SessionFilter, SessionId, SessionService, SessionState,
};

pub use crate::capability::RecordingNavigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SetCashboxOpening,
    OpenSession,
    BeginClosingControl,
    FetchSessions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    SetCashboxOpening {
        session_id: SessionId,
        cashbox_start: f64,
        notes: String,
    },
    OpenSession(SessionId),
    BeginClosingControl(SessionId),
    FetchSessions {
        domain: Value,
        fields: Vec<SessionField>,
    },
}

impl RecordedCall {
    pub fn operation(&self) -> Operation {
        match self {
            RecordedCall::SetCashboxOpening { .. } => Operation::SetCashboxOpening,
            RecordedCall::OpenSession(_) => Operation::OpenSession,
            RecordedCall::BeginClosingControl(_) => Operation::BeginClosingControl,
            RecordedCall::FetchSessions { .. } => Operation::FetchSessions,
        }
    }
}

/// Session service holding records in memory.
///
/// Lifecycle calls only move a session one step forward, like the server.
/// Any operation can be scripted to fault.
#[derive(Debug, Default)]
pub struct FakeSessionService {
    sessions: RefCell<Vec<Session>>,
    calls: RefCell<Vec<RecordedCall>>,
    failures: RefCell<HashMap<Operation, Fault>>,
}

impl FakeSessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, session: Session) -> Self {
        self.sessions.borrow_mut().push(session);
        self
    }

    /// Make every later call of `operation` fail with `message`.
    pub fn fail(self, operation: Operation, message: &str) -> Self {
        self.failures
            .borrow_mut()
            .insert(operation, Fault::new(message));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Calls other than reads.
    pub fn mutations(&self) -> Vec<RecordedCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.operation() != Operation::FetchSessions)
            .cloned()
            .collect()
    }

    /// Server-side copy of a session.
    pub fn session(&self, session_id: SessionId) -> Option<Session> {
        self.sessions
            .borrow()
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }

    fn record(&self, call: RecordedCall) -> Result<(), Fault> {
        let operation = call.operation();
        self.calls.borrow_mut().push(call);
        match self.failures.borrow().get(&operation) {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    fn advance(&self, session_id: SessionId, target: SessionState) -> Result<(), Fault> {
        let mut sessions = self.sessions.borrow_mut();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| Fault::new(format!("Record pos.session({}) does not exist", session_id)))?;
        if !session.state.can_advance_to(target) {
            return Err(Fault::new(format!(
                "Session {} cannot go from {} to {}",
                session_id, session.state, target
            )));
        }
        session.state = target;
        Ok(())
    }
}

impl SessionService for FakeSessionService {
    async fn set_cashbox_opening(
        &self,
        session_id: SessionId,
        cashbox_start: f64,
        notes: &str,
    ) -> Result<(), Fault> {
        self.record(RecordedCall::SetCashboxOpening {
            session_id,
            cashbox_start,
            notes: notes.to_string(),
        })?;
        let mut sessions = self.sessions.borrow_mut();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| Fault::new(format!("Record pos.session({}) does not exist", session_id)))?;
        session.cash_register_balance_start = cashbox_start;
        Ok(())
    }

    async fn open_session(&self, session_id: SessionId) -> Result<(), Fault> {
        self.record(RecordedCall::OpenSession(session_id))?;
        self.advance(session_id, SessionState::Opened)
    }

    async fn begin_closing_control(&self, session_id: SessionId) -> Result<(), Fault> {
        self.record(RecordedCall::BeginClosingControl(session_id))?;
        self.advance(session_id, SessionState::ClosingControl)
    }

    async fn fetch_sessions(
        &self,
        filter: &SessionFilter,
        fields: &[SessionField],
    ) -> Result<Vec<Session>, Fault> {
        self.record(RecordedCall::FetchSessions {
            domain: filter.to_domain(),
            fields: fields.to_vec(),
        })?;
        Ok(self
            .sessions
            .borrow()
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<(String, NotificationLevel)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, NotificationLevel)> {
        self.messages.borrow().clone()
    }

    pub fn levels(&self) -> Vec<NotificationLevel> {
        self.messages.borrow().iter().map(|(_, l)| *l).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        self.messages.borrow_mut().push((message.to_string(), level));
    }
}

/// Confirmer with a fixed answer that records the prompts it saw.
#[derive(Debug)]
pub struct ScriptedConfirmer {
    answer: bool,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer
    }
}

/// A Punto de Inicio session record for tests.
pub fn sample_session(id: u32, state: SessionState) -> Session {
    Session {
        id: SessionId::new(id).unwrap_or_else(|| panic!("sample session id must be positive")),
        name: format!("PI/{:05}", id),
        config_id: Some(crate::session::ConfigRef {
            id: 1,
            name: "Front Counter".to_string(),
        }),
        start_at: None,
        state,
        cash_register_balance_start: 0.0,
        is_punto_inicio: true,
    }
}
