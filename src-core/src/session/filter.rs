use serde_json::{json, Value};

use super::types::{Session, SessionId, SessionState};

/// One clause of a session search. Clauses are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    IdEquals(SessionId),
    IsPuntoInicio(bool),
    StateNot(SessionState),
}

impl Condition {
    fn to_domain_leaf(&self) -> Value {
        match self {
            Condition::IdEquals(id) => json!(["id", "=", id.get()]),
            Condition::IsPuntoInicio(flag) => json!(["x_is_punto_inicio", "=", flag]),
            Condition::StateNot(state) => json!(["state", "!=", state.as_str()]),
        }
    }

    fn matches(&self, session: &Session) -> bool {
        match self {
            Condition::IdEquals(id) => session.id == *id,
            Condition::IsPuntoInicio(flag) => session.is_punto_inicio == *flag,
            Condition::StateNot(state) => session.state != *state,
        }
    }
}

/// Search filter for `pos.session`, serialized as a server-side domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFilter {
    conditions: Vec<Condition>,
}

impl SessionFilter {
    /// Exact identifier match.
    pub fn by_id(id: SessionId) -> Self {
        Self {
            conditions: vec![Condition::IdEquals(id)],
        }
    }

    /// Sessions created from a Punto de Inicio register.
    pub fn punto_inicio() -> Self {
        Self {
            conditions: vec![Condition::IsPuntoInicio(true)],
        }
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Implicit-AND domain, e.g. `[["id", "=", 42]]`.
    pub fn to_domain(&self) -> Value {
        Value::Array(self.conditions.iter().map(Condition::to_domain_leaf).collect())
    }

    /// Evaluate the filter locally against an already fetched record.
    pub fn matches(&self, session: &Session) -> bool {
        self.conditions.iter().all(|c| c.matches(session))
    }
}
