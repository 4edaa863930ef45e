use anyhow::Result;
use log::{debug, warn};

use crate::application::{CaskStatus, PruneAction, PruneInfo, UpgradeAction};
use crate::cask::{CaskMetadata, CaskRepository, InstalledVersions};
use crate::executor::{ActionExecutor, BrewExecutor, install_args};
use crate::runtime::Runtime;

use super::config::{Config, UpgradeOptions};
use super::select_casks;

/// What happened over a whole run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpgradeSummary {
    /// Casks that were looked at
    pub processed: usize,
    /// Casks reported as outdated
    pub outdated: usize,
    /// Successful installs
    pub upgraded: usize,
    /// Version directories removed
    pub pruned: usize,
    /// Installs or removals that failed
    pub failures: usize,
    /// Some cask had no installed version
    pub updates_required: bool,
}

impl UpgradeSummary {
    /// End-of-run tally, or `None` when nothing was attempted.
    pub fn report(&self) -> Option<String> {
        if self.upgraded + self.pruned + self.failures == 0 {
            return None;
        }

        let mut report = format!(
            "Checked {} cask(s): {} upgraded, {} old version(s) removed",
            self.processed, self.upgraded, self.pruned
        );
        if self.failures > 0 {
            report.push_str(&format!(", {} action(s) failed", self.failures));
        }
        report.push('.');
        Some(report)
    }
}

/// Upgrade outdated casks and prune superseded versions
#[tracing::instrument(skip(runtime, config, options))]
pub fn upgrade<R: Runtime>(
    runtime: R,
    config: Config,
    casks: Vec<String>,
    options: UpgradeOptions,
) -> Result<()> {
    let config = config.validate(&runtime)?;
    let executor = BrewExecutor::new(
        &runtime,
        config.brew.clone(),
        CaskRepository::new(&runtime, config.caskroom.clone()),
    );

    let summary = run_upgrade(&runtime, &config, &executor, &casks, &options)?;
    debug!("{:?}", summary);

    if let Some(report) = summary.report() {
        println!("{}", report);
    }
    if !summary.updates_required {
        println!("All casks are currently up to date.");
    }

    Ok(())
}

/// Walk the selected casks one at a time. A failure with one cask is
/// reported and never stops the run.
pub(crate) fn run_upgrade<R: Runtime, E: ActionExecutor>(
    runtime: &R,
    config: &Config,
    executor: &E,
    casks: &[String],
    options: &UpgradeOptions,
) -> Result<UpgradeSummary> {
    let action = UpgradeAction::new(runtime, config.caskroom.clone(), &config.metadata_roots);
    let prune_action = PruneAction::new(runtime, config.caskroom.clone());

    let planner = Planner {
        runtime,
        action: &action,
        prune_action: &prune_action,
        executor,
        options,
    };

    let mut summary = UpgradeSummary::default();
    for cask in select_casks(action.cask_repo(), casks)? {
        summary.processed += 1;
        if let Err(e) = planner.process(&cask, &mut summary) {
            warn!("Skipping {}: {:#}", cask, e);
        }
    }

    Ok(summary)
}

struct Planner<'p, 'a, R: Runtime, E: ActionExecutor> {
    runtime: &'a R,
    action: &'p UpgradeAction<'a, R>,
    prune_action: &'p PruneAction<'a, R>,
    executor: &'p E,
    options: &'p UpgradeOptions,
}

impl<R: Runtime, E: ActionExecutor> Planner<'_, '_, R, E> {
    fn process(&self, cask: &str, summary: &mut UpgradeSummary) -> Result<()> {
        let installed = match self.action.check(cask)? {
            CaskStatus::NotInstalled => {
                debug!("{}: no versions installed", cask);
                summary.updates_required = true;
                return Ok(());
            }
            CaskStatus::Unknown { .. } => {
                debug!("{}: no metadata, skipping", cask);
                return Ok(());
            }
            CaskStatus::UpToDate { installed, .. } => installed,
            CaskStatus::Outdated {
                installed,
                metadata,
            } => {
                summary.outdated += 1;
                self.upgrade(cask, installed, &metadata, summary)?
            }
        };

        if self.options.prune {
            self.prune(&PruneInfo::from_installed(cask, &installed), summary)?;
        }
        Ok(())
    }

    /// Report, confirm and install. Returns the installed versions to prune
    /// against: re-read from disk after a successful install, otherwise the
    /// ones passed in.
    fn upgrade(
        &self,
        cask: &str,
        installed: InstalledVersions,
        metadata: &CaskMetadata,
        summary: &mut UpgradeSummary,
    ) -> Result<InstalledVersions> {
        println!("{} is outdated:", cask);
        println!("- Installed version: {}", installed.latest);
        println!("- Latest version: {}", metadata.latest);
        if metadata.auto_updates {
            println!(
                "- Note: {} updates itself, the installed copy may already be newer",
                cask
            );
        }

        if self.options.dry_run {
            println!("Would run: brew {}", install_args(cask).join(" "));
            return Ok(installed);
        }

        if !self.approved(&format!("Upgrade {}?", cask))? {
            println!("Skipped.");
            return Ok(installed);
        }

        let outcome = self.executor.install(cask);
        if !outcome.success {
            summary.failures += 1;
            eprintln!("Failed to upgrade {}: {}", cask, outcome.message);
            return Ok(installed);
        }
        summary.upgraded += 1;

        // The install changed the Caskroom, so read it again.
        Ok(self
            .prune_action
            .find_prunable(cask)?
            .map_or(installed, |info| InstalledVersions {
                latest: info.current_version,
                old: info.versions_to_prune,
            }))
    }

    fn prune(&self, info: &PruneInfo, summary: &mut UpgradeSummary) -> Result<()> {
        if info.is_empty() {
            return Ok(());
        }

        println!("{} has old versions installed:", info.cask);
        for version in &info.versions_to_prune {
            println!("- {}", version);
        }

        if self.options.dry_run {
            println!("Would remove {} old version(s).", info.versions_to_prune.len());
            return Ok(());
        }

        if !self.approved(&format!("Remove old versions of {}?", info.cask))? {
            println!("Skipped.");
            return Ok(());
        }

        for version in &info.versions_to_prune {
            let outcome = self.executor.remove_version(&info.cask, version.as_str());
            if outcome.success {
                summary.pruned += 1;
            } else {
                summary.failures += 1;
                eprintln!(
                    "Failed to remove {} {}: {}",
                    info.cask, version, outcome.message
                );
            }
        }
        Ok(())
    }

    fn approved(&self, prompt: &str) -> Result<bool> {
        if self.options.yes {
            return Ok(true);
        }
        self.runtime.confirm(prompt)
    }
}
