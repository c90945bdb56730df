/// Filesystem capability handlers.
///
/// Each handler follows the same sequence: pull its required arguments out of
/// the mapping (failing `InvalidParams` with the field name), resolve the path
/// against the workspace root, consult the access guard, perform the
/// operation, and wrap the outcome in a text content block. Storage errors of
/// every flavor (missing file, permission denied, not-a-directory) surface as
/// internal errors with the underlying message interpolated.
use serde_json::Value;

use crate::config::Settings;
use crate::error::CapabilityError;
use crate::guard;
use crate::protocol::text_result;

/// Extract a required string argument, or fail naming the field.
fn require_str<'a>(args: &'a Value, field: &str) -> Result<&'a str, CapabilityError> {
    args.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| CapabilityError::InvalidParams(format!("Missing {field} parameter")))
}

/// `read_file` — full file contents, verbatim, as one text block.
pub async fn read_file(settings: &dyn Settings, args: &Value) -> Result<Value, CapabilityError> {
    let filepath = require_str(args, "filepath")?;

    let path = guard::resolve(settings, filepath);
    guard::verify(settings, &path)?;

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| CapabilityError::Internal(format!("Failed to read file: {e}")))?;

    Ok(text_result(contents))
}

/// `write_file` — create parent directories as needed, then write/overwrite.
///
/// `content` may be the empty string but must be present.
pub async fn write_file(settings: &dyn Settings, args: &Value) -> Result<Value, CapabilityError> {
    let filepath = require_str(args, "filepath")?;
    let content = require_str(args, "content")?;

    let path = guard::resolve(settings, filepath);
    guard::verify(settings, &path)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CapabilityError::Internal(format!("Failed to write file: {e}")))?;
    }
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| CapabilityError::Internal(format!("Failed to write file: {e}")))?;

    Ok(text_result(format!(
        "Successfully wrote to {}",
        path.display()
    )))
}

/// `list_directory` — immediate children only, one `[DIR] `/`[FILE] ` line
/// each, in whatever order the underlying enumeration yields them.
pub async fn list_directory(
    settings: &dyn Settings,
    args: &Value,
) -> Result<Value, CapabilityError> {
    let dirpath = require_str(args, "path")?;

    let path = guard::resolve(settings, dirpath);
    guard::verify(settings, &path)?;

    let io_err = |e: std::io::Error| CapabilityError::Internal(format!("Failed to list directory: {e}"));

    let mut entries = tokio::fs::read_dir(&path).await.map_err(io_err)?;
    let mut lines = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let file_type = entry.file_type().await.map_err(io_err)?;
        let prefix = if file_type.is_dir() { "[DIR]" } else { "[FILE]" };
        lines.push(format!("{prefix} {}", entry.file_name().to_string_lossy()));
    }

    Ok(text_result(lines.join("\n")))
}

/// `create_directory` — recursive, idempotent (no error when it exists).
pub async fn create_directory(
    settings: &dyn Settings,
    args: &Value,
) -> Result<Value, CapabilityError> {
    let dirpath = require_str(args, "dirpath")?;

    let path = guard::resolve(settings, dirpath);
    guard::verify(settings, &path)?;

    tokio::fs::create_dir_all(&path)
        .await
        .map_err(|e| CapabilityError::Internal(format!("Failed to create directory: {e}")))?;

    Ok(text_result(format!(
        "Successfully created directory: {}",
        path.display()
    )))
}
