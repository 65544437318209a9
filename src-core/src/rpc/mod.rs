//! Odoo JSON-RPC implementation of the session service.

pub mod client;
pub mod wire;

pub use client::OdooClient;
pub use wire::MethodCall;
