//! Core logic for the Solargraph launcher.
//!
//! The launcher answers one question — how should `solargraph` be invoked in
//! this workspace? — and then keeps exactly one language-server client alive
//! with that answer. [`Resolver`] probes the candidate invocation strategies
//! (bundled through the project's bundler wrapper, or resolved globally from
//! the environment); [`Supervisor`] owns the single client and restarts it
//! when the configured server path changes.
//!
//! Host-facing concerns (process spawning, client startup, user
//! notifications) sit behind ports so the decision logic is testable without
//! a real language server installed.

pub mod client;
pub mod notify;
pub mod probe;
pub mod resolver;
pub mod settings;
pub mod supervisor;
pub mod workspace;

pub use client::{
    ClientConfig, ClientError, LanguageClient, LanguageClientFactory, StdioClientFactory,
};
pub use notify::{LogNotifier, MissingServerNotice, NotificationCenter, NoticeResponse};
pub use probe::{CommandRunner, ProbeOutput, TokioCommandRunner};
pub use resolver::{InvocationStrategy, Resolution, Resolver};
pub use settings::Settings;
pub use supervisor::Supervisor;
pub use workspace::Workspace;
