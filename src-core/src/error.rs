use thiserror::Error;

use crate::session::SessionId;

/// An error returned by a remote call, carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Fault {
    pub message: String,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for Fault {
    fn from(err: reqwest::Error) -> Self {
        Fault::new(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Invalid session reference: {0}")]
    InvalidReference(String),

    #[error("Session {0} not found")]
    NotFound(SessionId),

    #[error("{0}")]
    ServiceFailure(#[from] Fault),

    #[error("Session {0} does not belong to Punto de Inicio")]
    NotPuntoInicio(SessionId),

    #[error("Session {0} is already closed")]
    AlreadyClosed(SessionId),
}

/// Fieldless view of [`SessionError`] for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidReference,
    NotFound,
    ServiceFailure,
    NotPuntoInicio,
    AlreadyClosed,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::InvalidReference(_) => ErrorKind::InvalidReference,
            SessionError::NotFound(_) => ErrorKind::NotFound,
            SessionError::ServiceFailure(_) => ErrorKind::ServiceFailure,
            SessionError::NotPuntoInicio(_) => ErrorKind::NotPuntoInicio,
            SessionError::AlreadyClosed(_) => ErrorKind::AlreadyClosed,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Read(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config error: invalid server url: {0}")]
    ServerUrl(#[from] url::ParseError),

    #[error("Config error: {0} is not set")]
    Missing(&'static str),

    #[error("Keychain error: {0}")]
    Keychain(String),
}
