//! Nexus Bridge — a local HTTP bridge exposing a small set of filesystem and
//! status capabilities over a JSON-RPC-style protocol, gated by an
//! allow-listed set of filesystem paths.
//!
//! The library splits into the protocol envelope ([`protocol`]), the typed
//! error taxonomy ([`error`]), the path access guard ([`guard`]), the
//! capability handlers and dispatcher ([`capabilities`]), the configuration
//! layer ([`config`]), and the HTTP wiring ([`server`]). Integration tests
//! drive the dispatcher and the server through this crate directly.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod guard;
pub mod protocol;
pub mod server;

use std::sync::Arc;

use config::Settings;

/// Shared application state passed to every request handler.
pub struct AppContext {
    /// Configuration accessor — re-queried on every call, never cached.
    pub settings: Arc<dyn Settings>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(settings: Arc<dyn Settings>) -> Self {
        Self {
            settings,
            started_at: std::time::Instant::now(),
        }
    }
}
