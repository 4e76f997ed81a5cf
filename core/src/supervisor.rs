//! Client supervision — at most one live language-server client.
//!
//! Every `start` fully stops and releases the previous client before
//! resolving and launching the next one. All transitions take `&mut self`,
//! so overlapping starts cannot interleave and a stale resolution can never
//! commit over a newer one; the single client slot is the only shared
//! mutable state.

use std::path::PathBuf;

use crate::client::{ClientConfig, LanguageClient, LanguageClientFactory};
use crate::notify::{MissingServerNotice, NotificationCenter, NoticeResponse};
use crate::probe::CommandRunner;
use crate::resolver::{Resolution, Resolver, SERVER_COMMAND};

/// Arguments the server is started with, before resolution prefixes.
pub const DEFAULT_SERVER_ARGS: [&str; 2] = [SERVER_COMMAND, "stdio"];

/// Owns the single client and restarts it when the server path changes.
pub struct Supervisor<R, F: LanguageClientFactory, N> {
    resolver: Resolver<R>,
    factory: F,
    notifier: N,
    client: Option<F::Client>,
    notified: bool,
    debug: bool,
}

impl<R, F, N> Supervisor<R, F, N>
where
    R: CommandRunner,
    F: LanguageClientFactory,
    N: NotificationCenter,
{
    pub fn new(resolver: Resolver<R>, factory: F, notifier: N, debug: bool) -> Self {
        Self {
            resolver,
            factory,
            notifier,
            client: None,
            notified: false,
            debug,
        }
    }

    /// Whether a client is currently live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.client.is_some()
    }

    /// Start (or restart) the client for the given server path.
    ///
    /// An empty or unset path defaults to the workspace bundler wrapper.
    /// Resolution failure notifies the user once per session and leaves the
    /// supervisor stopped; a client that fails to launch is logged and
    /// likewise leaves it stopped. Neither failure propagates to the caller.
    pub async fn start(&mut self, path: Option<&str>) {
        self.stop().await;

        let wrapper: PathBuf = match path {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => self.resolver.workspace().default_wrapper_path(),
        };

        let base = DEFAULT_SERVER_ARGS.iter().map(ToString::to_string).collect();
        let line = match self.resolver.resolve(base, &wrapper).await {
            Resolution::Command(line) => line,
            Resolution::NotFound => {
                self.notify_missing().await;
                return;
            }
        };

        let config = match ClientConfig::ruby_from_command_line(line) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "cannot build client configuration");
                return;
            }
        };

        match self.factory.launch(&config).await {
            Ok(client) => {
                tracing::debug!(wrapper = %wrapper.display(), "language client running");
                self.client = Some(client);
            }
            Err(err) => {
                // Likely an invalid server path; the host stays up either way.
                if self.debug {
                    tracing::error!(error = %err, "language client failed to start");
                } else {
                    tracing::debug!(error = %err, "language client failed to start");
                }
            }
        }
    }

    /// Stop the client if one is live. Idempotent.
    pub async fn stop(&mut self) {
        if let Some(client) = self.client.take() {
            client.stop().await;
        }
    }

    /// Tear down for shutdown.
    pub async fn deactivate(&mut self) {
        self.stop().await;
    }

    async fn notify_missing(&mut self) {
        if self.notified {
            return;
        }
        let notice = MissingServerNotice::solargraph();
        if self.notifier.present(&notice).await == NoticeResponse::Help {
            self.notifier.open_settings();
        }
        self.notified = true;
    }
}
