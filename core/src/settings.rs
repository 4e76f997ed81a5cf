//! Launcher settings — where the server path comes from.
//!
//! A workspace-local `.solard.toml` overrides the user-level
//! `solard/config.toml`; environment overrides are applied by the binary on
//! top of whatever the files said.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Workspace-local settings file name.
pub const WORKSPACE_FILE: &str = ".solard.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Path to the bundler wrapper used for bundled invocation. Unset means
    /// the workspace default (`bin/bundle`).
    #[serde(default)]
    pub server_path: Option<String>,
    /// Log client-start failures at error level instead of debug.
    #[serde(default)]
    pub debug: bool,
}

impl Settings {
    /// Load settings for a workspace: user-level file first, then the
    /// workspace file on top. Missing files are fine; unreadable or
    /// malformed files are logged and skipped.
    #[must_use]
    pub fn load(workspace_root: &Path) -> Self {
        let mut settings = Self::user_config_path()
            .and_then(|path| Self::from_file(&path))
            .unwrap_or_default();

        if let Some(local) = Self::from_file(&workspace_root.join(WORKSPACE_FILE)) {
            settings.merge(local);
        }

        settings
    }

    /// User-level settings file, under the platform config directory.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("solard").join("config.toml"))
    }

    fn from_file(path: &Path) -> Option<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot read settings");
                return None;
            }
        };
        match toml::from_str(&raw) {
            Ok(settings) => Some(settings),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot parse settings");
                None
            }
        }
    }

    fn merge(&mut self, other: Self) {
        if other.server_path.is_some() {
            self.server_path = other.server_path;
        }
        self.debug |= other.debug;
    }
}
