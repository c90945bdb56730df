/// JSON-RPC 2.0 wire types for the bridge endpoint.
///
/// The envelope carries `jsonrpc`, a caller-chosen `id` (echoed back verbatim,
/// never interpreted), and either `result` or `error` — never both. Capability
/// payloads use the uniform content-block shape so callers can treat all
/// results polymorphically.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CapabilityError;

pub const JSONRPC_VERSION: &str = "2.0";

// ─── Standard JSON-RPC error codes ────────────────────────────────────────────

pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// ─── Request ──────────────────────────────────────────────────────────────────

/// An inbound bridge request.
///
/// `method` is carried for wire compatibility but routing happens on
/// `params.capability`. A body missing `params` (or `params.capability`) is
/// not a valid request and is rejected at the transport with `INVALID_REQUEST`.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeRequest {
    #[serde(default)]
    pub jsonrpc: String,
    /// Opaque request identifier — string or integer, echoed in the response.
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub method: String,
    pub params: CallParams,
}

/// The capability invocation inside a request.
#[derive(Debug, Clone, Deserialize)]
pub struct CallParams {
    pub capability: String,
    /// Argument mapping; absent means no arguments.
    #[serde(default)]
    pub arguments: Option<Value>,
}

// ─── Response ─────────────────────────────────────────────────────────────────

/// A bridge response (success or error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl BridgeResponse {
    /// Construct a successful response.
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Construct an error response.
    pub fn error(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// ─── Content blocks ───────────────────────────────────────────────────────────

/// One typed block of capability output. Currently only text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// The uniform result payload for all capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityResult {
    pub content: Vec<ContentBlock>,
}

/// Wrap a text payload in the content-block result shape.
pub fn text_result(text: impl Into<String>) -> Value {
    let result = CapabilityResult {
        content: vec![ContentBlock::Text { text: text.into() }],
    };
    serde_json::to_value(&result).unwrap_or(Value::Null)
}

// ─── Envelope builder ─────────────────────────────────────────────────────────

/// Lower a dispatch outcome into the response envelope.
///
/// This is the single place that maps `CapabilityError` kinds to wire codes.
/// Total function — it always produces a well-formed response.
pub fn respond(id: Value, outcome: Result<Value, CapabilityError>) -> BridgeResponse {
    match outcome {
        Ok(result) => BridgeResponse::ok(id, result),
        Err(err) => BridgeResponse::error(id, RpcError::new(err.code(), err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn respond_echoes_id_on_success() {
        let resp = respond(json!("req-7"), Ok(json!({"content": []})));
        assert_eq!(resp.id, json!("req-7"));
        assert!(resp.result.is_some());
        assert!(resp.error.is_none());
    }

    #[test]
    fn respond_echoes_id_on_error() {
        let resp = respond(
            json!(42),
            Err(CapabilityError::NotFound("nope".to_string())),
        );
        assert_eq!(resp.id, json!(42));
        assert!(resp.result.is_none());
        let err = resp.error.expect("error present");
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert!(err.message.contains("nope"));
    }

    #[test]
    fn response_serializes_exactly_one_of_result_or_error() {
        let ok = serde_json::to_value(BridgeResponse::ok(json!(1), json!("x"))).unwrap();
        assert!(ok.get("result").is_some());
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(BridgeResponse::error(
            json!(1),
            RpcError::new(INTERNAL_ERROR, "boom"),
        ))
        .unwrap();
        assert!(err.get("result").is_none());
        assert!(err.get("error").is_some());
    }

    #[test]
    fn text_result_shape() {
        let v = text_result("hello");
        assert_eq!(v["content"][0]["type"], "text");
        assert_eq!(v["content"][0]["text"], "hello");
    }

    #[test]
    fn request_parses_without_arguments() {
        let req: BridgeRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": "a",
            "method": "tools/call",
            "params": { "capability": "get_system_info" }
        }))
        .unwrap();
        assert_eq!(req.params.capability, "get_system_info");
        assert!(req.params.arguments.is_none());
    }

    #[test]
    fn request_without_params_is_rejected() {
        let req = serde_json::from_value::<BridgeRequest>(json!({"id": 1}));
        assert!(req.is_err());
    }
}
