//! Path access control for filesystem capabilities.
//!
//! Every filesystem handler resolves its path argument with [`resolve`] and
//! then consults [`verify`] before touching storage. The effective allow-list
//! is computed fresh from the [`Settings`] accessor on each check — config
//! edits apply to the very next request.
//!
//! Containment is a path-segment boundary check (`Path::starts_with`) over
//! lexically normalized paths, not a raw string prefix. So allow-root
//! `/home/a/proj` does not admit `/home/a/proj-evil`, and `..` components are
//! collapsed before the check rather than trusted.

use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::error::CapabilityError;

/// Resolve a request path against the workspace root.
///
/// Absolute candidates pass through; relative ones are joined onto the
/// workspace root (or left as-is when no root is configured — they will then
/// fail the containment check, since the allow-list holds absolute prefixes).
/// The result is lexically normalized.
pub fn resolve(settings: &dyn Settings, candidate: &str) -> PathBuf {
    let candidate = Path::new(candidate);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else if let Some(root) = settings.workspace_root() {
        root.join(candidate)
    } else {
        candidate.to_path_buf()
    };
    normalize_path(&joined)
}

/// Check that `path` is contained under at least one allow-list entry.
///
/// The effective allow-list is the configured one, or `[workspace_root]` when
/// nothing is configured. First match short-circuits. Pure decision function —
/// no filesystem access, no side effects.
pub fn verify(settings: &dyn Settings, path: &Path) -> Result<(), CapabilityError> {
    let mut allowed = settings.allowed_paths();
    if allowed.is_empty() {
        if let Some(root) = settings.workspace_root() {
            allowed.push(root);
        }
    }

    let allowed: Vec<PathBuf> = allowed.iter().map(|p| normalize_path(p)).collect();
    if allowed.iter().any(|root| path.starts_with(root)) {
        return Ok(());
    }

    Err(CapabilityError::AccessDenied {
        path: path.display().to_string(),
        allowed: allowed
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Normalize a path by resolving `.` and `..` components without requiring
/// the path to exist on disk (unlike std::fs::canonicalize).
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
                // Ignore .. at root
            }
            Component::CurDir => {
                // Skip .
            }
            other => components.push(other),
        }
    }
    components.iter().collect()
}
