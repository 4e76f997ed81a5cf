//! Workspace model — the project root the launcher operates in.

use std::path::{Path, PathBuf};

/// Files at the workspace root that indicate the project manages its gems
/// through bundler. If none of these exist there is no point probing the
/// bundler wrapper at all.
pub const BUNDLER_MARKERS: [&str; 3] = ["Gemfile", "gems.rb", "bin/bundle"];

/// Relative path of the bundler wrapper inside a managed project.
pub const BUNDLER_WRAPPER: &str = "bin/bundle";

/// A project workspace, identified by its root directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a workspace-relative path exists.
    #[must_use]
    pub fn contains(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }

    /// Whether any bundler marker file is present at the root.
    #[must_use]
    pub fn has_bundler_manifest(&self) -> bool {
        BUNDLER_MARKERS.iter().any(|marker| self.contains(marker))
    }

    /// Default bundler-wrapper path, used when no server path is configured.
    /// Most users run inside a managed project, so the wrapper is the
    /// expected entry point.
    #[must_use]
    pub fn default_wrapper_path(&self) -> PathBuf {
        self.root.join(BUNDLER_WRAPPER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn contains_checks_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Gemfile"), "source 'https://rubygems.org'").unwrap();

        let ws = Workspace::new(dir.path());
        assert!(ws.contains("Gemfile"));
        assert!(!ws.contains("gems.rb"));
    }

    #[test]
    fn manifest_detected_through_any_marker() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        assert!(!ws.has_bundler_manifest());

        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin/bundle"), "#!/usr/bin/env ruby").unwrap();
        assert!(ws.has_bundler_manifest());
    }

    #[test]
    fn default_wrapper_is_workspace_relative() {
        let ws = Workspace::new("/proj");
        assert_eq!(ws.default_wrapper_path(), PathBuf::from("/proj/bin/bundle"));
    }
}
