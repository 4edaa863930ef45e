use anyhow::Result;
use log::warn;
use serde::Serialize;

use crate::application::{CaskStatus, UpgradeAction};
use crate::cask::Version;
use crate::runtime::Runtime;

use super::config::Config;
use super::select_casks;

/// One outdated cask, as printed by `outdated`
#[derive(Debug, Clone, Serialize)]
pub struct OutdatedCask {
    pub name: String,
    pub installed: Version,
    pub latest: Version,
    pub auto_updates: bool,
    pub old_versions: Vec<Version>,
}

/// Result of checking a set of casks
#[derive(Debug, Clone, Default)]
pub struct OutdatedReport {
    pub casks: Vec<OutdatedCask>,
    /// Some cask had no installed version
    pub updates_required: bool,
}

/// Report outdated casks without changing anything
#[tracing::instrument(skip(runtime, config))]
pub fn outdated<R: Runtime>(runtime: R, config: Config, casks: Vec<String>, json: bool) -> Result<()> {
    let config = config.validate(&runtime)?;
    let report = find_outdated(&runtime, &config, &casks)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.casks)?);
        return Ok(());
    }

    if report.casks.is_empty() && !report.updates_required {
        println!("All casks are currently up to date.");
        return Ok(());
    }

    for entry in &report.casks {
        print!("{} {} -> {}", entry.name, entry.installed, entry.latest);
        if entry.auto_updates {
            print!(" (auto-updates)");
        }
        println!();
        if !entry.old_versions.is_empty() {
            let old: Vec<&str> = entry.old_versions.iter().map(Version::as_str).collect();
            println!("  old versions: {}", old.join(", "));
        }
    }

    Ok(())
}

pub(crate) fn find_outdated<R: Runtime>(
    runtime: &R,
    config: &Config,
    casks: &[String],
) -> Result<OutdatedReport> {
    let action = UpgradeAction::new(runtime, config.caskroom.clone(), &config.metadata_roots);

    let mut report = OutdatedReport::default();
    for cask in select_casks(action.cask_repo(), casks)? {
        match action.check(&cask) {
            Ok(CaskStatus::NotInstalled) => report.updates_required = true,
            Ok(CaskStatus::Outdated {
                installed,
                metadata,
            }) => report.casks.push(OutdatedCask {
                name: cask,
                installed: installed.latest,
                latest: metadata.latest,
                auto_updates: metadata.auto_updates,
                old_versions: installed.old,
            }),
            Ok(_) => {}
            Err(e) => warn!("Skipping {}: {:#}", cask, e),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_find_outdated() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for (cask, versions, declared) in [
            ("firefox", &["127.0", "126.0"][..], "version \"128.0.3\"\nauto_updates true\n"),
            ("iterm2", &["3.5.0"][..], "version \"3.5.0\"\n"),
            ("nightly", &["latest"][..], "version :latest\n"),
        ] {
            for version in versions {
                fs::create_dir_all(root.join("Caskroom").join(cask).join(version)).unwrap();
            }
            fs::create_dir_all(root.join("Casks")).unwrap();
            fs::write(root.join("Casks").join(format!("{}.rb", cask)), declared).unwrap();
        }

        let config = Config::for_test(root);
        let report = find_outdated(&RealRuntime, &config, &[]).unwrap();

        assert!(!report.updates_required);
        assert_eq!(report.casks.len(), 1);
        let firefox = &report.casks[0];
        assert_eq!(firefox.name, "firefox");
        assert_eq!(firefox.installed.as_str(), "127.0");
        assert_eq!(firefox.latest.as_str(), "128.0.3");
        assert!(firefox.auto_updates);
        assert_eq!(firefox.old_versions, vec![Version::parse("126.0")]);

        let json = serde_json::to_value(&report.casks).unwrap();
        assert_eq!(json[0]["installed"], "127.0");
        assert_eq!(json[0]["old_versions"][0], "126.0");
    }

    #[test]
    fn test_cask_without_versions_is_flagged() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Caskroom/empty/.metadata")).unwrap();
        fs::create_dir_all(root.join("Casks")).unwrap();
        fs::write(root.join("Casks/empty.rb"), "version '1.0'\n").unwrap();

        let config = Config::for_test(root);
        let report = find_outdated(&RealRuntime, &config, &[]).unwrap();

        assert!(report.casks.is_empty());
        assert!(report.updates_required);
    }
}
