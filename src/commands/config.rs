use anyhow::{Context, Result, bail};
use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Default package manager program.
pub const DEFAULT_BREW: &str = "brew";

/// Metadata roots relative to the Homebrew repository, highest priority first.
const DEFAULT_METADATA_ROOTS: &[&str] = &[
    "Library/Taps/homebrew/homebrew-cask/Casks",
    "Library/Taps/homebrew/homebrew-cask-versions/Casks",
];

/// Locations the tool works on, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Installed-versions root: `<caskroom>/<cask>/<version>`
    pub caskroom: PathBuf,
    /// Directories holding `<cask>.rb` definitions; the first is required
    pub metadata_roots: Vec<PathBuf>,
    /// Package manager program used for installs
    pub brew: String,
}

/// Values given on the command line, each replacing one discovery step.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub prefix: Option<PathBuf>,
    pub repository: Option<PathBuf>,
    pub caskroom: Option<PathBuf>,
    pub metadata_roots: Vec<PathBuf>,
    pub brew: Option<String>,
}

/// Options for the `upgrade` command
#[derive(Debug, Clone)]
pub struct UpgradeOptions {
    /// Act without asking for confirmation
    pub yes: bool,
    /// Report only, never prompt or change anything
    pub dry_run: bool,
    /// Offer to remove superseded versions
    pub prune: bool,
}

impl Default for UpgradeOptions {
    fn default() -> Self {
        Self {
            yes: false,
            dry_run: false,
            prune: true,
        }
    }
}

impl Config {
    /// Work out the Caskroom and metadata roots.
    ///
    /// Overrides win. Otherwise the Homebrew prefix comes from
    /// `HOMEBREW_PREFIX` or `brew --prefix`, and the repository from
    /// `HOMEBREW_REPOSITORY` or `brew --repository`. `brew` is only run when
    /// something is still missing.
    #[tracing::instrument(skip(runtime))]
    pub fn resolve<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let brew = overrides.brew.unwrap_or_else(|| DEFAULT_BREW.to_string());

        let caskroom = match overrides.caskroom {
            Some(path) => path,
            None => {
                let prefix =
                    homebrew_dir(runtime, overrides.prefix, "HOMEBREW_PREFIX", &brew, "--prefix")?;
                prefix.join("Caskroom")
            }
        };

        let metadata_roots = if overrides.metadata_roots.is_empty() {
            let repository = homebrew_dir(
                runtime,
                overrides.repository,
                "HOMEBREW_REPOSITORY",
                &brew,
                "--repository",
            )?;
            default_metadata_roots(&repository)
        } else {
            overrides.metadata_roots
        };

        debug!("Caskroom: {:?}", caskroom);
        debug!("Metadata roots: {:?}", metadata_roots);

        Ok(Self {
            caskroom,
            metadata_roots,
            brew,
        })
    }

    /// Startup checks.
    ///
    /// The Caskroom and the primary metadata root must exist. Secondary roots
    /// that do not exist are dropped.
    pub fn validate<R: Runtime>(mut self, runtime: &R) -> Result<Self> {
        if !runtime.is_dir(&self.caskroom) {
            bail!(
                "{} does not exist, are you sure Homebrew Cask is installed?",
                self.caskroom.display()
            );
        }

        let Some((primary, rest)) = self.metadata_roots.split_first() else {
            bail!("No metadata root configured");
        };
        if !runtime.is_dir(primary) {
            bail!(
                "{} does not exist, are you sure Homebrew Cask is installed?",
                primary.display()
            );
        }

        let mut metadata_roots = vec![primary.clone()];
        for root in rest {
            if runtime.is_dir(root) {
                metadata_roots.push(root.clone());
            } else {
                debug!("Ignoring missing metadata root {:?}", root);
            }
        }
        self.metadata_roots = metadata_roots;

        Ok(self)
    }

    #[cfg(test)]
    pub fn for_test(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            caskroom: root.join("Caskroom"),
            metadata_roots: vec![root.join("Casks")],
            brew: DEFAULT_BREW.to_string(),
        }
    }
}

pub fn default_metadata_roots(repository: &Path) -> Vec<PathBuf> {
    DEFAULT_METADATA_ROOTS
        .iter()
        .map(|relative| repository.join(relative))
        .collect()
}

/// Flag, then environment variable, then `brew <query>`.
fn homebrew_dir<R: Runtime>(
    runtime: &R,
    flag: Option<PathBuf>,
    env_key: &str,
    brew: &str,
    query: &str,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }

    if let Ok(value) = runtime.env_var(env_key)
        && !value.trim().is_empty()
    {
        debug!("Using {}={}", env_key, value);
        return Ok(PathBuf::from(value.trim()));
    }

    let output = runtime
        .command_output(brew, &[query.to_string()])
        .with_context(|| {
            format!(
                "Could not locate Homebrew; set {} or pass it on the command line",
                env_key
            )
        })?;

    let path = output.stdout.trim();
    if !output.success || path.is_empty() {
        bail!("`{} {}` failed: {}", brew, query, output.stderr.trim());
    }

    Ok(PathBuf::from(path))
}
