//! Prune check - identifies superseded versions of a cask.

use std::path::PathBuf;

use anyhow::Result;

use crate::cask::{CaskRepository, InstalledVersions, Version};
use crate::runtime::Runtime;

/// Versions of a cask that can be removed
#[derive(Debug, Clone, PartialEq)]
pub struct PruneInfo {
    /// Cask name
    pub cask: String,
    /// Current version (kept)
    pub current_version: Version,
    /// Versions to be pruned, highest first
    pub versions_to_prune: Vec<Version>,
}

impl PruneInfo {
    pub fn from_installed(cask: &str, installed: &InstalledVersions) -> Self {
        Self {
            cask: cask.to_string(),
            current_version: installed.latest.clone(),
            versions_to_prune: installed.old.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.versions_to_prune.is_empty()
    }
}

/// Prune action - identifies versions to remove
pub struct PruneAction<'a, R: Runtime> {
    cask_repo: CaskRepository<'a, R>,
}

impl<'a, R: Runtime> PruneAction<'a, R> {
    pub fn new(runtime: &'a R, caskroom: PathBuf) -> Self {
        Self {
            cask_repo: CaskRepository::new(runtime, caskroom),
        }
    }

    /// Re-read the Caskroom and find prunable versions of a cask.
    ///
    /// Returns `None` if no version of the cask is installed.
    pub fn find_prunable(&self, cask: &str) -> Result<Option<PruneInfo>> {
        Ok(self
            .cask_repo
            .installed_versions(cask)?
            .map(|installed| PruneInfo::from_installed(cask, &installed)))
    }
}
