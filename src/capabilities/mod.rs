/// Capability registry and dispatcher — routes invocations to handlers.
///
/// The six capabilities form a closed set known at build time, so dispatch is
/// a plain match over the name rather than any open registry. Handlers own all
/// side effects; the dispatcher itself is stateless per call.
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::CapabilityError;

pub mod fs;
pub mod info;

/// Every capability the bridge exposes, in catalogue order.
pub const CAPABILITIES: &[&str] = &[
    "get_system_info",
    "read_file",
    "write_file",
    "list_directory",
    "create_directory",
    "get_project_status",
];

/// Dispatch a capability invocation.
///
/// `capability` — the capability name from the request params.
/// `arguments`  — the argument mapping (callers default an absent mapping to
///                an empty object before calling).
///
/// Unknown names fail with `NotFound`; handler validation failures with
/// `InvalidParams`; guard rejections and I/O errors with their own kinds, all
/// lowered to wire codes by `protocol::respond`.
pub async fn dispatch(
    settings: &dyn Settings,
    capability: &str,
    arguments: Value,
) -> Result<Value, CapabilityError> {
    let result = match capability {
        "get_system_info" => info::get_system_info(settings),
        "get_project_status" => info::get_project_status(settings),
        "read_file" => fs::read_file(settings, &arguments).await?,
        "write_file" => fs::write_file(settings, &arguments).await?,
        "list_directory" => fs::list_directory(settings, &arguments).await?,
        "create_directory" => fs::create_directory(settings, &arguments).await?,
        other => {
            warn!(capability = other, "unknown capability requested");
            return Err(CapabilityError::NotFound(other.to_string()));
        }
    };

    info!(capability, "capability executed");
    Ok(result)
}
