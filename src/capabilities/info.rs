/// Informational capability handlers.
///
/// Neither takes arguments nor touches storage; both always succeed and return
/// a pretty-printed key-value dump in a single text block.
use serde_json::{json, Value};

use crate::capabilities::CAPABILITIES;
use crate::config::Settings;
use crate::protocol::{text_result, JSONRPC_VERSION};

fn workspace_value(settings: &dyn Settings) -> Value {
    settings
        .workspace_root()
        .map(|p| Value::String(p.display().to_string()))
        .unwrap_or(Value::Null)
}

/// `get_system_info` — bridge identity plus live environment facts.
pub fn get_system_info(settings: &dyn Settings) -> Value {
    let info = json!({
        "name": "Nexus Bridge",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": JSONRPC_VERSION,
        "capabilities": CAPABILITIES,
        "workspace": workspace_value(settings),
    });
    text_result(serde_json::to_string_pretty(&info).unwrap_or_default())
}

/// `get_project_status` — static descriptive metadata plus the workspace root.
pub fn get_project_status(settings: &dyn Settings) -> Value {
    let status = json!({
        "name": "Nexus Bridge Project",
        "status": "active",
        "collaborators": ["nexus-tools"],
        "workspacePath": workspace_value(settings),
    });
    text_result(serde_json::to_string_pretty(&status).unwrap_or_default())
}
