//! Capability error taxonomy.
//!
//! Handlers fail with a typed kind; the dispatcher's envelope builder is the
//! only place these are lowered to wire `{code, message}` objects. Access
//! denial keeps its own kind internally but shares the internal-error wire
//! code — the protocol does not distinguish it.

use thiserror::Error;

use crate::protocol::{INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND};

#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The requested capability is not registered.
    #[error("Capability not found: {0}")]
    NotFound(String),

    /// A required argument is missing or has the wrong type.
    #[error("{0}")]
    InvalidParams(String),

    /// The resolved path is outside every allow-list entry.
    ///
    /// The message enumerates the attempted path and the effective allow-list.
    /// The caller is a trusted local peer, so leaking the list is acceptable
    /// and helps operators debug their configuration.
    #[error("Access to path '{path}' is not allowed. Allowed paths: {allowed}")]
    AccessDenied { path: String, allowed: String },

    /// Catch-all for I/O and environment failures, with the cause interpolated.
    #[error("{0}")]
    Internal(String),
}

impl CapabilityError {
    /// The JSON-RPC error code this kind maps to on the wire.
    pub fn code(&self) -> i32 {
        match self {
            CapabilityError::NotFound(_) => METHOD_NOT_FOUND,
            CapabilityError::InvalidParams(_) => INVALID_PARAMS,
            CapabilityError::AccessDenied { .. } => INTERNAL_ERROR,
            CapabilityError::Internal(_) => INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes() {
        assert_eq!(CapabilityError::NotFound("x".into()).code(), -32601);
        assert_eq!(CapabilityError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(
            CapabilityError::AccessDenied {
                path: "/p".into(),
                allowed: "/a".into()
            }
            .code(),
            -32603
        );
        assert_eq!(CapabilityError::Internal("x".into()).code(), -32603);
    }

    #[test]
    fn access_denied_message_names_path_and_allowlist() {
        let err = CapabilityError::AccessDenied {
            path: "/etc/passwd".into(),
            allowed: "/home/a, /home/b".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/passwd"));
        assert!(msg.contains("/home/a, /home/b"));
    }
}
