//! Language-client port and the stdio-backed implementation.
//!
//! The launcher never speaks the Language Server Protocol itself. The
//! production client spawns the resolved command with inherited stdio, so
//! the host editor talks to the server directly through our own standard
//! streams; stopping the client kills the child.

use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, Command};

/// Transport used between the host and the server. Always standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
}

/// How to launch the server executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub path: String,
    pub args: Vec<String>,
    pub transport: Transport,
}

/// Which documents the client applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub syntaxes: Vec<String>,
}

/// Full configuration for one language-server client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub id: String,
    pub display_name: String,
    pub server: ServerOptions,
    pub client: ClientOptions,
}

impl ClientConfig {
    /// Build the Ruby client configuration from a resolved command line.
    /// The first token becomes the executable path, the rest its arguments.
    pub fn ruby_from_command_line(mut line: Vec<String>) -> Result<Self, ClientError> {
        if line.is_empty() {
            return Err(ClientError::EmptyCommand);
        }
        let path = line.remove(0);
        Ok(Self {
            id: "ruby".to_string(),
            display_name: "Ruby Language Server".to_string(),
            server: ServerOptions {
                path,
                args: line,
                transport: Transport::Stdio,
            },
            client: ClientOptions {
                syntaxes: vec!["ruby".to_string()],
            },
        })
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("language server command line is empty")]
    EmptyCommand,
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// A live language-server client. Dropping it kills the server process;
/// [`stop`](LanguageClient::stop) does so deliberately and waits for exit.
#[allow(async_fn_in_trait)]
pub trait LanguageClient {
    async fn stop(self);
}

/// Port for constructing and starting clients. Construction is
/// initialization: a returned client is already running.
#[allow(async_fn_in_trait)]
pub trait LanguageClientFactory {
    type Client: LanguageClient;

    async fn launch(&self, config: &ClientConfig) -> Result<Self::Client, ClientError>;
}

/// Production factory: spawns the server as a child sharing our stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioClientFactory;

#[derive(Debug)]
pub struct StdioClient {
    id: String,
    child: Child,
}

impl LanguageClientFactory for StdioClientFactory {
    type Client = StdioClient;

    async fn launch(&self, config: &ClientConfig) -> Result<StdioClient, ClientError> {
        let child = Command::new(&config.server.path)
            .args(&config.server.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ClientError::Spawn {
                command: config.server.path.clone(),
                source,
            })?;

        tracing::info!(
            client = %config.id,
            command = %config.server.path,
            args = ?config.server.args,
            "language client started"
        );

        Ok(StdioClient {
            id: config.id.clone(),
            child,
        })
    }
}

impl LanguageClient for StdioClient {
    async fn stop(mut self) {
        if let Err(err) = self.child.start_kill() {
            // Already exited on its own; wait below still reaps it.
            tracing::debug!(client = %self.id, error = %err, "kill on stop");
        }
        let _ = self.child.wait().await;
        tracing::info!(client = %self.id, "language client stopped");
    }
}
