use anyhow::Result;
use clap::{Parser, Subcommand};
use nexus_bridge::{
    config::{BridgeConfig, FileSettings, Settings},
    server, AppContext,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "nexus-bridge",
    about = "Nexus Bridge — local HTTP bridge exposing filesystem capabilities over JSON-RPC",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP bridge port
    #[arg(long, env = "NEXUS_PORT")]
    port: Option<u16>,

    /// Data directory holding config.toml
    #[arg(long, env = "NEXUS_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Workspace root relative request paths resolve against (default: current directory)
    #[arg(long, env = "NEXUS_WORKSPACE")]
    workspace: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NEXUS_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "NEXUS_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,

    /// Log output format: "pretty" (default) or "json"
    #[arg(long, env = "NEXUS_LOG_FORMAT")]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the bridge server, ignoring the start_on_launch config flag.
    ///
    /// With no subcommand the bridge serves only when `start_on_launch`
    /// (config.toml, default true) permits it.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = BridgeConfig::new(
        args.port,
        args.data_dir,
        args.workspace,
        args.log,
        args.log_format,
    );

    let _log_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    let forced = matches!(args.command, Some(Command::Serve));
    if !forced && !config.start_on_launch {
        info!("start_on_launch is disabled — exiting (use `nexus-bridge serve` to force)");
        return Ok(());
    }

    let settings: Arc<dyn Settings> = Arc::new(FileSettings::new(
        config.data_dir.clone(),
        config.workspace_root.clone(),
    ));
    let ctx = Arc::new(AppContext::new(settings));

    info!(
        port = config.port,
        workspace = %config
            .workspace_root
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string()),
        "starting nexus-bridge"
    );

    server::start_server(ctx, config.port).await
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("nexus-bridge.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stdout-only — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
