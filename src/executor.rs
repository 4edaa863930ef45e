//! Mutating actions: installing a cask through Homebrew and removing stale
//! version directories.
//!
//! Both actions report an [`ActionOutcome`] instead of failing, so the caller
//! can tell the user and carry on with the next cask.

use log::{debug, info};

use crate::cask::CaskRepository;
use crate::runtime::Runtime;

/// Result of one install or removal.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ActionExecutor {
    /// Force-install the current release of a cask.
    fn install(&self, cask: &str) -> ActionOutcome;

    /// Recursively delete one installed version of a cask.
    fn remove_version(&self, cask: &str, version: &str) -> ActionOutcome;
}

/// Arguments passed to `brew` to force-install a cask.
pub fn install_args(cask: &str) -> Vec<String> {
    ["install", "--cask", "--force", cask]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Executor backed by the `brew` command and the Caskroom on disk.
pub struct BrewExecutor<'a, R: Runtime> {
    runtime: &'a R,
    brew: String,
    repo: CaskRepository<'a, R>,
}

impl<'a, R: Runtime> BrewExecutor<'a, R> {
    pub fn new(runtime: &'a R, brew: impl Into<String>, repo: CaskRepository<'a, R>) -> Self {
        Self {
            runtime,
            brew: brew.into(),
            repo,
        }
    }
}

impl<R: Runtime> ActionExecutor for BrewExecutor<'_, R> {
    #[tracing::instrument(skip(self))]
    fn install(&self, cask: &str) -> ActionOutcome {
        let args = install_args(cask);
        let command = format!("{} {}", self.brew, args.join(" "));
        debug!("Running {}", command);

        match self.runtime.command_status(&self.brew, &args) {
            Ok(output) if output.success => {
                info!("Installed {}", cask);
                ActionOutcome::success(format!("installed {}", cask))
            }
            Ok(output) => ActionOutcome::failure(match output.code {
                Some(code) => format!("`{}` exited with status {}", command, code),
                None => format!("`{}` was terminated by a signal", command),
            }),
            Err(e) => ActionOutcome::failure(format!("{:#}", e)),
        }
    }

    #[tracing::instrument(skip(self))]
    fn remove_version(&self, cask: &str, version: &str) -> ActionOutcome {
        let version_dir = self.repo.version_dir(cask, version);
        if !self.runtime.exists(&version_dir) {
            return ActionOutcome::failure(format!("{} does not exist", version_dir.display()));
        }

        match self.runtime.remove_dir_all(&version_dir) {
            Ok(()) => {
                info!("Removed {:?}", version_dir);
                ActionOutcome::success(format!("removed {}", version_dir.display()))
            }
            Err(e) => ActionOutcome::failure(format!("{:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{CommandOutput, MockRuntime};
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn executor(runtime: &MockRuntime) -> BrewExecutor<'_, MockRuntime> {
        BrewExecutor::new(
            runtime,
            "brew",
            CaskRepository::new(runtime, PathBuf::from("/caskroom")),
        )
    }

    #[test]
    fn test_install_args() {
        assert_eq!(
            install_args("firefox"),
            vec!["install", "--cask", "--force", "firefox"]
        );
    }

    #[test]
    fn test_install_success() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_command_status()
            .withf(|program, args| {
                program == "brew"
                    && args
                        .iter()
                        .map(String::as_str)
                        .eq(["install", "--cask", "--force", "firefox"])
            })
            .times(1)
            .returning(|_, _| {
                Ok(CommandOutput {
                    success: true,
                    code: Some(0),
                    ..Default::default()
                })
            });

        let outcome = executor(&runtime).install("firefox");
        assert!(outcome.success);
    }

    #[test]
    fn test_install_nonzero_exit_is_reported() {
        let mut runtime = MockRuntime::new();
        runtime.expect_command_status().returning(|_, _| {
            Ok(CommandOutput {
                success: false,
                code: Some(1),
                ..Default::default()
            })
        });

        let outcome = executor(&runtime).install("firefox");
        assert!(!outcome.success);
        assert!(outcome.message.contains("exited with status 1"));
        assert!(outcome.message.contains("brew install --cask --force firefox"));
    }

    #[test]
    fn test_install_spawn_failure_is_reported() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_command_status()
            .returning(|_, _| Err(anyhow::anyhow!("Failed to run brew")));

        let outcome = executor(&runtime).install("firefox");
        assert!(!outcome.success);
        assert!(outcome.message.contains("Failed to run brew"));
    }

    #[test]
    fn test_remove_version() {
        let mut runtime = MockRuntime::new();
        let version_dir = PathBuf::from("/caskroom/firefox/127.0");

        runtime
            .expect_exists()
            .with(eq(version_dir.clone()))
            .returning(|_| true);
        runtime
            .expect_remove_dir_all()
            .with(eq(version_dir))
            .times(1)
            .returning(|_| Ok(()));

        let outcome = executor(&runtime).remove_version("firefox", "127.0");
        assert!(outcome.success);
    }

    #[test]
    fn test_remove_version_missing_dir() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_remove_dir_all().never();

        let outcome = executor(&runtime).remove_version("firefox", "127.0");
        assert!(!outcome.success);
        assert!(outcome.message.contains("does not exist"));
    }

    #[test]
    fn test_remove_version_failure_is_reported() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_remove_dir_all()
            .returning(|_| Err(anyhow::anyhow!("Operation not permitted")));

        let outcome = executor(&runtime).remove_version("firefox", "127.0");
        assert!(!outcome.success);
        assert!(outcome.message.contains("Operation not permitted"));
    }
}
