//! solard - binary entry point.
//!
//! The host editor runs `solard [workspace-root]` in place of `solargraph`.
//! On startup the supervisor resolves the right invocation (bundled through
//! the project's bundler wrapper, or global) and launches the server sharing
//! our stdio, so the editor's LSP transport flows straight through. SIGHUP
//! reloads the settings and restarts the client; SIGTERM or Ctrl-C tears it
//! down.
//!
//! Logs go to stderr only — stdout belongs to the LSP stream.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use solard_core::{
    LogNotifier, Resolver, Settings, StdioClientFactory, Supervisor, TokioCommandRunner, Workspace,
};

type ProductionSupervisor = Supervisor<TokioCommandRunner, StdioClientFactory, LogNotifier>;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn workspace_root() -> PathBuf {
    env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// File settings with environment overrides on top.
fn load_settings(root: &Path) -> Settings {
    let mut settings = Settings::load(root);
    if let Ok(path) = env::var("SOLARD_SERVER_PATH")
        && !path.is_empty()
    {
        settings.server_path = Some(path);
    }
    if env::var_os("SOLARD_DEBUG").is_some() {
        settings.debug = true;
    }
    settings
}

#[cfg(unix)]
async fn run(supervisor: &mut ProductionSupervisor, root: &Path) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = terminate.recv() => break,
            _ = hangup.recv() => {
                tracing::info!("reloading settings");
                let settings = load_settings(root);
                supervisor.start(settings.server_path.as_deref()).await;
            }
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn run(_supervisor: &mut ProductionSupervisor, _root: &Path) -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let root = workspace_root();
    let settings = load_settings(&root);
    tracing::debug!(root = %root.display(), ?settings, "activating");

    let resolver = Resolver::new(Workspace::new(&root), TokioCommandRunner);
    let notifier = LogNotifier::new(Settings::user_config_path());
    let mut supervisor = Supervisor::new(resolver, StdioClientFactory, notifier, settings.debug);

    supervisor.start(settings.server_path.as_deref()).await;

    run(&mut supervisor, &root).await?;

    supervisor.deactivate().await;
    Ok(())
}
