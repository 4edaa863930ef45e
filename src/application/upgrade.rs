//! Upgrade check - compares installed and declared versions of a cask.

use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::cask::{CaskMetadata, CaskRepository, InstalledVersions, MetadataScanner, Version};
use crate::runtime::Runtime;

/// Where a cask stands after comparing the Caskroom with its definition.
#[derive(Debug, Clone)]
pub enum CaskStatus {
    /// The cask directory holds no version directories
    NotInstalled,
    /// Installed, but no usable definition was found
    Unknown { installed: InstalledVersions },
    /// The installed version is the latest declared one (or newer)
    UpToDate {
        installed: InstalledVersions,
        metadata: CaskMetadata,
    },
    /// A newer version is declared
    Outdated {
        installed: InstalledVersions,
        metadata: CaskMetadata,
    },
}

/// Whether `latest` (declared) warrants upgrading from `installed`.
///
/// A declared `latest` is always due unless `latest` is what is installed.
pub fn upgrade_due(latest: &Version, installed: &Version) -> bool {
    if latest.is_latest() {
        !installed.is_latest()
    } else {
        latest > installed
    }
}

/// Upgrade check for single casks.
pub struct UpgradeAction<'a, R: Runtime> {
    cask_repo: CaskRepository<'a, R>,
    scanner: MetadataScanner<'a, R>,
}

impl<'a, R: Runtime> UpgradeAction<'a, R> {
    pub fn new(runtime: &'a R, caskroom: PathBuf, metadata_roots: &'a [PathBuf]) -> Self {
        Self {
            cask_repo: CaskRepository::new(runtime, caskroom),
            scanner: MetadataScanner::new(runtime, metadata_roots),
        }
    }

    pub fn cask_repo(&self) -> &CaskRepository<'a, R> {
        &self.cask_repo
    }

    /// Classify a cask.
    ///
    /// The Caskroom is inspected first; the definition is only looked up
    /// when something is installed.
    #[tracing::instrument(skip(self))]
    pub fn check(&self, cask: &str) -> Result<CaskStatus> {
        let Some(installed) = self.cask_repo.installed_versions(cask)? else {
            return Ok(CaskStatus::NotInstalled);
        };

        let Some(metadata) = self.scanner.locate(cask)? else {
            return Ok(CaskStatus::Unknown { installed });
        };

        let due = upgrade_due(&metadata.latest, &installed.latest);
        debug!(
            "{}: installed {}, latest {}, upgrade due: {}",
            cask, installed.latest, metadata.latest, due
        );

        Ok(if due {
            CaskStatus::Outdated {
                installed,
                metadata,
            }
        } else {
            CaskStatus::UpToDate {
                installed,
                metadata,
            }
        })
    }
}
