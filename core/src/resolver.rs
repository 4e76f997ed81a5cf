//! Invocation resolution — decides how `solargraph` gets launched.
//!
//! Two candidate strategies are probed by shelling out and checking exit
//! status: through the project's bundler wrapper (`bin/bundle exec`), or
//! directly via environment lookup (`/usr/bin/env`). Bundled resolution is
//! always attempted first so a project-pinned server version takes
//! precedence over whatever is installed globally.
//!
//! Probe results are memoized for the lifetime of the resolver; there is no
//! explicit invalidation short of restarting the process.

use std::path::Path;

use crate::probe::CommandRunner;
use crate::workspace::Workspace;

/// The server command probed and launched.
pub const SERVER_COMMAND: &str = "solargraph";

/// Launcher token prepended to every resolved command line, so wrapper
/// paths and bare commands alike are resolved by environment lookup.
pub const ENV_LAUNCHER: &str = "/usr/bin/env";

const BUNDLER_EXEC: &str = "exec";
const VERSION_FLAG: &str = "--version";

/// How the server should be invoked in this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStrategy {
    /// Through the project's bundler wrapper, inside the managed gem set.
    Bundled,
    /// Resolved from the environment search path.
    Global,
    /// Neither probe succeeded.
    NotFound,
}

/// Outcome of [`Resolver::resolve`]: a full command line, or nothing to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Command(Vec<String>),
    NotFound,
}

/// Probes and caches the invocation strategy for one workspace session.
pub struct Resolver<R> {
    runner: R,
    workspace: Workspace,
    bundled: Option<bool>,
    global: Option<bool>,
}

impl<R: CommandRunner> Resolver<R> {
    pub fn new(workspace: Workspace, runner: R) -> Self {
        Self {
            runner,
            workspace,
            bundled: None,
            global: None,
        }
    }

    #[must_use]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Whether `solargraph` runs successfully through the bundler wrapper.
    ///
    /// Fast path: a workspace with no bundler manifest resolves `false`
    /// without spawning anything. Otherwise the wrapper is asked to run
    /// `exec solargraph --version` in the workspace root.
    pub async fn check_bundled(&mut self, wrapper: &Path) -> bool {
        if let Some(cached) = self.bundled {
            return cached;
        }

        if !self.workspace.has_bundler_manifest() {
            self.bundled = Some(false);
            return false;
        }

        let probe = self
            .runner
            .run(
                &wrapper.to_string_lossy(),
                &[BUNDLER_EXEC, SERVER_COMMAND, VERSION_FLAG],
                self.workspace.root(),
            )
            .await;
        if probe.success {
            tracing::info!("Found Solargraph {} (Bundled)", probe.stdout);
        }
        self.bundled = Some(probe.success);
        probe.success
    }

    /// Whether `solargraph` resolves from the environment search path.
    pub async fn check_global(&mut self) -> bool {
        if let Some(cached) = self.global {
            return cached;
        }

        let probe = self
            .runner
            .run(
                ENV_LAUNCHER,
                &[SERVER_COMMAND, VERSION_FLAG],
                self.workspace.root(),
            )
            .await;
        if probe.success {
            tracing::info!("Found Solargraph {} (Global)", probe.stdout);
        }
        self.global = Some(probe.success);
        probe.success
    }

    /// Determine the invocation strategy, probing as needed.
    ///
    /// A workspace whose bundler probe fails (missing lock, missing gem)
    /// falls through to the global check rather than failing outright; a
    /// broken project bundle silently degrades to the global server.
    pub async fn strategy(&mut self, wrapper: &Path) -> InvocationStrategy {
        if self.check_bundled(wrapper).await {
            InvocationStrategy::Bundled
        } else if self.check_global().await {
            InvocationStrategy::Global
        } else {
            InvocationStrategy::NotFound
        }
    }

    /// Build the full command line for `base_args`, or report that no
    /// command should be run.
    ///
    /// The bundled strategy prepends `<wrapper> exec`; both success paths
    /// prepend [`ENV_LAUNCHER`] so the shell's environment lookup does the
    /// final path resolution.
    pub async fn resolve(&mut self, base_args: Vec<String>, wrapper: &Path) -> Resolution {
        let mut args = base_args;
        match self.strategy(wrapper).await {
            InvocationStrategy::Bundled => {
                args.splice(
                    0..0,
                    [wrapper.to_string_lossy().into_owned(), BUNDLER_EXEC.into()],
                );
            }
            InvocationStrategy::Global => {}
            InvocationStrategy::NotFound => return Resolution::NotFound,
        }
        args.insert(0, ENV_LAUNCHER.to_string());
        Resolution::Command(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeOutput;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;

    /// Scripted runner: pops one outcome per invocation and records calls.
    #[derive(Default)]
    struct ScriptedRunner {
        outcomes: RefCell<Vec<ProbeOutput>>,
        calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl ScriptedRunner {
        fn with_outcomes(outcomes: Vec<ProbeOutput>) -> Self {
            Self {
                outcomes: RefCell::new(outcomes),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn ok(version: &str) -> ProbeOutput {
            ProbeOutput {
                success: true,
                stdout: version.to_string(),
            }
        }

        fn fail() -> ProbeOutput {
            ProbeOutput::default()
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl CommandRunner for ScriptedRunner {
        async fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> ProbeOutput {
            self.calls.borrow_mut().push((
                program.to_string(),
                args.iter().map(ToString::to_string).collect(),
            ));
            let mut outcomes = self.outcomes.borrow_mut();
            if outcomes.is_empty() {
                ProbeOutput::default()
            } else {
                outcomes.remove(0)
            }
        }
    }

    fn bundled_workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Gemfile"), "gem 'solargraph'").unwrap();
        let ws = Workspace::new(dir.path());
        (dir, ws)
    }

    fn bare_workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        (dir, ws)
    }

    fn base_args() -> Vec<String> {
        vec![SERVER_COMMAND.to_string(), "stdio".to_string()]
    }

    #[tokio::test]
    async fn no_manifest_resolves_false_without_spawning() {
        let (_dir, ws) = bare_workspace();
        let mut resolver = Resolver::new(ws, ScriptedRunner::default());

        assert!(!resolver.check_bundled(Path::new("/proj/bin/bundle")).await);
        assert_eq!(resolver.runner.call_count(), 0);
    }

    #[tokio::test]
    async fn bundled_probe_success_is_cached() {
        let (_dir, ws) = bundled_workspace();
        let runner = ScriptedRunner::with_outcomes(vec![ScriptedRunner::ok("0.49.0")]);
        let mut resolver = Resolver::new(ws, runner);
        let wrapper = PathBuf::from("/proj/bin/bundle");

        assert!(resolver.check_bundled(&wrapper).await);
        assert!(resolver.check_bundled(&wrapper).await);
        assert_eq!(resolver.runner.call_count(), 1);
    }

    #[tokio::test]
    async fn bundled_probe_runs_wrapper_with_exec() {
        let (_dir, ws) = bundled_workspace();
        let runner = ScriptedRunner::with_outcomes(vec![ScriptedRunner::ok("0.49.0")]);
        let mut resolver = Resolver::new(ws, runner);

        resolver.check_bundled(Path::new("/proj/bin/bundle")).await;

        let calls = resolver.runner.calls.borrow();
        assert_eq!(calls[0].0, "/proj/bin/bundle");
        assert_eq!(calls[0].1, vec!["exec", "solargraph", "--version"]);
    }

    #[tokio::test]
    async fn global_probe_is_cached_independently() {
        let (_dir, ws) = bare_workspace();
        let runner = ScriptedRunner::with_outcomes(vec![ScriptedRunner::ok("0.49.0")]);
        let mut resolver = Resolver::new(ws, runner);

        assert!(resolver.check_global().await);
        assert!(resolver.check_global().await);
        assert_eq!(resolver.runner.call_count(), 1);
        // Bundled cache untouched by the global probe.
        assert_eq!(resolver.bundled, None);
    }

    #[tokio::test]
    async fn bundled_resolution_prepends_wrapper_and_exec() {
        let (_dir, ws) = bundled_workspace();
        let runner = ScriptedRunner::with_outcomes(vec![ScriptedRunner::ok("0.49.0")]);
        let mut resolver = Resolver::new(ws, runner);

        let resolved = resolver
            .resolve(base_args(), Path::new("/proj/bin/bundle"))
            .await;
        assert_eq!(
            resolved,
            Resolution::Command(vec![
                "/usr/bin/env".to_string(),
                "/proj/bin/bundle".to_string(),
                "exec".to_string(),
                "solargraph".to_string(),
                "stdio".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn global_resolution_has_no_bundler_prefix() {
        let (_dir, ws) = bare_workspace();
        let runner = ScriptedRunner::with_outcomes(vec![ScriptedRunner::ok("0.49.0")]);
        let mut resolver = Resolver::new(ws, runner);

        let resolved = resolver
            .resolve(base_args(), Path::new("/proj/bin/bundle"))
            .await;
        assert_eq!(
            resolved,
            Resolution::Command(vec![
                "/usr/bin/env".to_string(),
                "solargraph".to_string(),
                "stdio".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn broken_bundle_falls_through_to_global() {
        let (_dir, ws) = bundled_workspace();
        let runner = ScriptedRunner::with_outcomes(vec![
            ScriptedRunner::fail(),
            ScriptedRunner::ok("0.49.0"),
        ]);
        let mut resolver = Resolver::new(ws, runner);

        let strategy = resolver.strategy(Path::new("/proj/bin/bundle")).await;
        assert_eq!(strategy, InvocationStrategy::Global);
        assert_eq!(resolver.runner.call_count(), 2);
    }

    #[tokio::test]
    async fn both_probes_failing_yields_not_found() {
        let (_dir, ws) = bare_workspace();
        let runner = ScriptedRunner::with_outcomes(vec![ScriptedRunner::fail()]);
        let mut resolver = Resolver::new(ws, runner);

        let resolved = resolver
            .resolve(base_args(), Path::new("/proj/bin/bundle"))
            .await;
        assert_eq!(resolved, Resolution::NotFound);
    }

    #[tokio::test]
    async fn not_found_is_cached_across_resolves() {
        let (_dir, ws) = bare_workspace();
        let runner = ScriptedRunner::with_outcomes(vec![ScriptedRunner::fail()]);
        let mut resolver = Resolver::new(ws, runner);
        let wrapper = PathBuf::from("/proj/bin/bundle");

        assert_eq!(resolver.resolve(base_args(), &wrapper).await, Resolution::NotFound);
        assert_eq!(resolver.resolve(base_args(), &wrapper).await, Resolution::NotFound);
        // One global probe total; no-manifest fast path never spawned for
        // bundled, and the failure was memoized.
        assert_eq!(resolver.runner.call_count(), 1);
    }
}
