//! The `pos.session` record as the client sees it, the search filter used to
//! fetch it, and the remote service contract.

pub mod filter;
pub mod service;
pub mod types;

pub use filter::{Condition, SessionFilter};
pub use service::SessionService;
pub use types::{
    ConfigRef, Session, SessionField, SessionId, SessionState, DETAIL_FIELDS, ENTRY_FIELDS,
};
