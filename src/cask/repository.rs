//! Installed cask state in the Caskroom.
//!
//! Layout: `<caskroom>/<cask>/<version>/...` plus a `.metadata` directory
//! per cask that Homebrew keeps for itself.

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use super::version::Version;
use crate::runtime::Runtime;

/// Homebrew's bookkeeping directory inside each cask directory.
pub const METADATA_DIR: &str = ".metadata";

/// Installed versions of one cask.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledVersions {
    /// Highest installed version
    pub latest: Version,
    /// Every other installed version, highest first
    pub old: Vec<Version>,
}

impl InstalledVersions {
    /// Split a set of versions into the highest and the rest.
    ///
    /// Returns `None` for an empty set.
    pub fn from_versions(mut versions: Vec<Version>) -> Option<Self> {
        versions.sort_by(|a, b| b.cmp(a));
        let mut iter = versions.into_iter();
        let latest = iter.next()?;
        Some(Self {
            latest,
            old: iter.collect(),
        })
    }
}

/// Read access to the Caskroom.
pub struct CaskRepository<'a, R: Runtime> {
    runtime: &'a R,
    caskroom: PathBuf,
}

impl<'a, R: Runtime> CaskRepository<'a, R> {
    pub fn new(runtime: &'a R, caskroom: PathBuf) -> Self {
        Self { runtime, caskroom }
    }

    /// Returns: `<caskroom>/<cask>`
    pub fn cask_dir(&self, cask: &str) -> PathBuf {
        self.caskroom.join(cask)
    }

    /// Returns: `<caskroom>/<cask>/<version>`
    pub fn version_dir(&self, cask: &str, version: &str) -> PathBuf {
        self.cask_dir(cask).join(version)
    }

    /// Whether `<caskroom>/<cask>` is a directory.
    pub fn is_cask(&self, cask: &str) -> bool {
        self.runtime.is_dir(&self.cask_dir(cask))
    }

    /// Names of all cask directories, in directory listing order.
    ///
    /// Stray files in the Caskroom are skipped.
    #[tracing::instrument(skip(self))]
    pub fn find_all(&self) -> Result<Vec<String>> {
        let mut casks = Vec::new();
        for entry in self.runtime.read_dir(&self.caskroom)? {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if self.runtime.is_dir(&entry) {
                casks.push(name.to_string());
            } else {
                debug!("Skipping non-directory {:?}", entry);
            }
        }
        Ok(casks)
    }

    /// Inspect the installed versions of a cask.
    ///
    /// Every subdirectory except `.metadata` is an installed version.
    /// Returns `Ok(None)` when there is none.
    #[tracing::instrument(skip(self))]
    pub fn installed_versions(&self, cask: &str) -> Result<Option<InstalledVersions>> {
        let cask_dir = self.cask_dir(cask);

        let mut versions = Vec::new();
        for entry in self.runtime.read_dir(&cask_dir)? {
            if let Some(name) = entry.file_name().and_then(|n| n.to_str())
                && name != METADATA_DIR
                && self.runtime.is_dir(&entry)
            {
                versions.push(Version::parse(name));
            }
        }

        debug!("{}: {} installed version(s)", cask, versions.len());
        Ok(InstalledVersions::from_versions(versions))
    }
}
