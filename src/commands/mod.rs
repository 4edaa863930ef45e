//! Command handlers behind the CLI.

use anyhow::Result;
use log::warn;

use crate::cask::CaskRepository;
use crate::runtime::Runtime;

pub mod config;
mod list;
mod outdated;
mod upgrade;

pub use list::list;
pub use outdated::{OutdatedCask, OutdatedReport, outdated};
pub use upgrade::{UpgradeSummary, upgrade};

/// Casks to work on: the named ones that are installed, in the given order,
/// or every cask in the Caskroom when none are named.
pub(crate) fn select_casks<R: Runtime>(
    repo: &CaskRepository<'_, R>,
    casks: &[String],
) -> Result<Vec<String>> {
    if casks.is_empty() {
        return repo.find_all();
    }

    Ok(casks
        .iter()
        .filter(|cask| {
            let installed = repo.is_cask(cask);
            if !installed {
                warn!("{} is not installed", cask);
            }
            installed
        })
        .cloned()
        .collect())
}
