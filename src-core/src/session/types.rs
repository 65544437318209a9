use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Server-side datetime format used by `fields.Datetime` (always UTC).
const SERVER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifier of a `pos.session` record. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(NonZeroU32);

impl SessionId {
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Strict parse: surrounding whitespace is ignored, anything else that is
/// not a positive integer is rejected.
impl FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("No session id was provided".to_string());
        }
        let value: u32 = trimmed
            .parse()
            .map_err(|_| format!("'{}' is not a valid session id", trimmed))?;
        SessionId::new(value).ok_or_else(|| format!("'{}' is not a valid session id", trimmed))
    }
}

impl Serialize for SessionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.get())
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        SessionId::new(raw).ok_or_else(|| de::Error::custom("session id must be positive"))
    }
}

/// Lifecycle of a register session. Declaration order is lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    OpeningControl,
    Opened,
    ClosingControl,
    Closed,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::OpeningControl => "opening_control",
            SessionState::Opened => "opened",
            SessionState::ClosingControl => "closing_control",
            SessionState::Closed => "closed",
        }
    }

    /// Label shown to the cashier.
    pub fn label(self) -> &'static str {
        match self {
            SessionState::OpeningControl => "Opening Control",
            SessionState::Opened => "In Progress",
            SessionState::ClosingControl => "Closing Control",
            SessionState::Closed => "Closed & Posted",
        }
    }

    pub fn next(self) -> Option<SessionState> {
        match self {
            SessionState::OpeningControl => Some(SessionState::Opened),
            SessionState::Opened => Some(SessionState::ClosingControl),
            SessionState::ClosingControl => Some(SessionState::Closed),
            SessionState::Closed => None,
        }
    }

    /// Only single forward steps are valid transitions.
    pub fn can_advance_to(self, target: SessionState) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Many2one reference to the owning `pos.config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRef {
    pub id: i64,
    pub name: String,
}

/// A `pos.session` record as read by the client. A snapshot: it is never
/// updated in place after being fetched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    #[serde(deserialize_with = "deserialize_many2one")]
    pub config_id: Option<ConfigRef>,
    #[serde(deserialize_with = "deserialize_server_datetime")]
    pub start_at: Option<NaiveDateTime>,
    pub state: SessionState,
    pub cash_register_balance_start: f64,
    #[serde(rename = "x_is_punto_inicio", default)]
    pub is_punto_inicio: bool,
}

impl Session {
    pub fn config_name(&self) -> &str {
        self.config_id.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn start_at_display(&self) -> String {
        self.start_at
            .map(|t| t.format(SERVER_DATETIME_FORMAT).to_string())
            .unwrap_or_else(|| "Not started".to_string())
    }
}

/// Fields of `pos.session` the client knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Name,
    ConfigId,
    StartAt,
    State,
    CashRegisterBalanceStart,
    IsPuntoInicio,
}

impl SessionField {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionField::Name => "name",
            SessionField::ConfigId => "config_id",
            SessionField::StartAt => "start_at",
            SessionField::State => "state",
            SessionField::CashRegisterBalanceStart => "cash_register_balance_start",
            SessionField::IsPuntoInicio => "x_is_punto_inicio",
        }
    }
}

/// Fields requested by the session detail view.
pub const DETAIL_FIELDS: &[SessionField] = &[
    SessionField::Name,
    SessionField::ConfigId,
    SessionField::StartAt,
    SessionField::State,
    SessionField::CashRegisterBalanceStart,
];

/// Detail fields plus the Punto de Inicio marker, for entry checks and listings.
pub const ENTRY_FIELDS: &[SessionField] = &[
    SessionField::Name,
    SessionField::ConfigId,
    SessionField::StartAt,
    SessionField::State,
    SessionField::CashRegisterBalanceStart,
    SessionField::IsPuntoInicio,
];

/// Unset relational fields come back as `false` rather than `null`.
fn deserialize_many2one<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ConfigRef>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(false) | Value::Null => Ok(None),
        Value::Array(pair) => match pair.as_slice() {
            [Value::Number(id), Value::String(name)] => {
                let id = id
                    .as_i64()
                    .ok_or_else(|| de::Error::custom("many2one id must be an integer"))?;
                Ok(Some(ConfigRef {
                    id,
                    name: name.clone(),
                }))
            }
            _ => Err(de::Error::custom("many2one must be an [id, name] pair")),
        },
        other => Err(de::Error::custom(format!(
            "unexpected many2one value: {}",
            other
        ))),
    }
}

fn deserialize_server_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(false) | Value::Null => Ok(None),
        Value::String(raw) => NaiveDateTime::parse_from_str(&raw, SERVER_DATETIME_FORMAT)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid datetime '{}': {}", raw, e))),
        other => Err(de::Error::custom(format!(
            "unexpected datetime value: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_session_id_parse_rejects_zero_and_garbage() {
        assert_eq!("42".parse::<SessionId>().unwrap().get(), 42);
        assert_eq!(" 7 ".parse::<SessionId>().unwrap().get(), 7);
        assert!("0".parse::<SessionId>().is_err());
        assert!("-3".parse::<SessionId>().is_err());
        assert!("abc".parse::<SessionId>().is_err());
        assert!("".parse::<SessionId>().is_err());
        assert!("4.2".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_state_order_follows_lifecycle() {
        assert!(SessionState::OpeningControl < SessionState::Opened);
        assert!(SessionState::Opened < SessionState::ClosingControl);
        assert!(SessionState::ClosingControl < SessionState::Closed);
    }

    #[test]
    fn test_state_only_advances_one_step() {
        assert!(SessionState::OpeningControl.can_advance_to(SessionState::Opened));
        assert!(SessionState::Opened.can_advance_to(SessionState::ClosingControl));
        assert!(!SessionState::Opened.can_advance_to(SessionState::OpeningControl));
        assert!(!SessionState::OpeningControl.can_advance_to(SessionState::Closed));
        assert!(!SessionState::Closed.can_advance_to(SessionState::Closed));
    }

    #[test]
    fn test_deserialize_opened_session() {
        let raw = json!({
            "id": 42,
            "name": "POS/00042",
            "config_id": [3, "Front Counter"],
            "start_at": "2024-05-01 08:30:00",
            "state": "opened",
            "cash_register_balance_start": 150.5
        });
        let session: Session = serde_json::from_value(raw).unwrap();
        assert_eq!(session.id.get(), 42);
        assert_eq!(session.name, "POS/00042");
        assert_eq!(
            session.config_id,
            Some(ConfigRef {
                id: 3,
                name: "Front Counter".to_string()
            })
        );
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(session.start_at, Some(expected));
        assert_eq!(session.state, SessionState::Opened);
        assert_eq!(session.cash_register_balance_start, 150.5);
        assert!(!session.is_punto_inicio, "Marker defaults to false when not requested");
    }

    #[test]
    fn test_deserialize_unopened_session_with_false_fields() {
        let raw = json!({
            "id": 5,
            "name": "POS/00005",
            "config_id": false,
            "start_at": false,
            "state": "opening_control",
            "cash_register_balance_start": 0.0,
            "x_is_punto_inicio": true
        });
        let session: Session = serde_json::from_value(raw).unwrap();
        assert!(session.config_id.is_none());
        assert!(session.start_at.is_none());
        assert_eq!(session.start_at_display(), "Not started");
        assert!(session.is_punto_inicio);
    }

    #[test]
    fn test_deserialize_rejects_unknown_state() {
        let raw = json!({
            "id": 5,
            "name": "POS/00005",
            "config_id": false,
            "start_at": false,
            "state": "rescue",
            "cash_register_balance_start": 0.0
        });
        assert!(serde_json::from_value::<Session>(raw).is_err());
    }
}
