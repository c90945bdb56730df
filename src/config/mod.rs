use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;

const DEFAULT_PORT: u16 = 3000;

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP bridge port (default: 3000).
    port: Option<u16>,
    /// Start serving when invoked with no subcommand (default: true).
    start_on_launch: Option<bool>,
    /// Absolute path prefixes filesystem capabilities may touch.
    /// Empty or absent = only the workspace root is allowed.
    allowed_paths: Option<Vec<PathBuf>>,
    /// Base root relative request paths are resolved against.
    workspace_root: Option<PathBuf>,
    /// Log level filter string, e.g. "debug", "info,nexus_bridge=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured).
    log_format: Option<String>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── BridgeConfig ─────────────────────────────────────────────────────────────

/// Startup configuration for the bridge daemon.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    /// Serve when invoked with no subcommand. The explicit `serve` subcommand
    /// ignores this flag.
    pub start_on_launch: bool,
    /// Base root for relative paths; None if neither CLI, TOML, nor the
    /// current directory yields one.
    pub workspace_root: Option<PathBuf>,
    pub log: String,
    /// "pretty" (default) | "json".
    pub log_format: String,
}

impl BridgeConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        workspace: Option<PathBuf>,
        log: Option<String>,
        log_format: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let start_on_launch = toml.start_on_launch.unwrap_or(true);
        let workspace_root = workspace
            .or(toml.workspace_root)
            .or_else(|| std::env::current_dir().ok());
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());
        let log_format = log_format
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        Self {
            port,
            data_dir,
            start_on_launch,
            workspace_root,
            log,
            log_format,
        }
    }
}

// ─── Settings accessor ────────────────────────────────────────────────────────

/// Per-call view of the externally supplied configuration.
///
/// Handlers and the access guard never touch config files or globals directly;
/// they go through this accessor so the backing store can change between
/// requests. Implementations must answer with the *current* values on every
/// call — the guard re-reads the allow-list on each check.
pub trait Settings: Send + Sync {
    /// The base root relative paths resolve against, if any.
    fn workspace_root(&self) -> Option<PathBuf>;
    /// Configured absolute path prefixes. Empty means "workspace root only".
    fn allowed_paths(&self) -> Vec<PathBuf>;
}

/// Production settings: re-reads `{data_dir}/config.toml` on every call.
///
/// No caching and no file watcher — a low-volume local bridge can afford the
/// read, and allow-list edits take effect on the very next request without a
/// restart.
pub struct FileSettings {
    data_dir: PathBuf,
    /// Workspace root used when config.toml does not set one (from CLI/cwd).
    fallback_root: Option<PathBuf>,
}

impl FileSettings {
    pub fn new(data_dir: PathBuf, fallback_root: Option<PathBuf>) -> Self {
        Self {
            data_dir,
            fallback_root,
        }
    }
}

impl Settings for FileSettings {
    fn workspace_root(&self) -> Option<PathBuf> {
        load_toml(&self.data_dir)
            .and_then(|t| t.workspace_root)
            .or_else(|| self.fallback_root.clone())
    }

    fn allowed_paths(&self) -> Vec<PathBuf> {
        load_toml(&self.data_dir)
            .and_then(|t| t.allowed_paths)
            .unwrap_or_default()
    }
}

/// Fixed in-memory settings — for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    pub workspace_root: Option<PathBuf>,
    pub allowed_paths: Vec<PathBuf>,
}

impl StaticSettings {
    /// Settings with the given workspace root and an empty allow-list.
    pub fn rooted(root: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            workspace_root: Some(root.into()),
            allowed_paths: vec![],
        })
    }
}

impl Settings for StaticSettings {
    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.clone()
    }

    fn allowed_paths(&self) -> Vec<PathBuf> {
        self.allowed_paths.clone()
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/nexus-bridge
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("nexus-bridge");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/nexus-bridge or ~/.local/share/nexus-bridge
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("nexus-bridge");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("nexus-bridge");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\nexus-bridge
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("nexus-bridge");
        }
    }
    // Fallback
    PathBuf::from(".nexus-bridge")
}
