use anyhow::Result;
use log::{debug, warn};

use crate::cask::{CaskRepository, Version};
use crate::runtime::Runtime;

use super::config::Config;

/// List installed casks with their current and superseded versions
#[tracing::instrument(skip(runtime, config))]
pub fn list<R: Runtime>(runtime: R, config: Config) -> Result<()> {
    let config = config.validate(&runtime)?;
    for line in list_lines(&runtime, &config)? {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn list_lines<R: Runtime>(runtime: &R, config: &Config) -> Result<Vec<String>> {
    let repo = CaskRepository::new(runtime, config.caskroom.clone());
    let casks = repo.find_all()?;
    debug!("Found {} cask(s)", casks.len());

    let mut lines = Vec::new();
    for cask in casks {
        match repo.installed_versions(&cask) {
            Ok(Some(installed)) if installed.old.is_empty() => {
                lines.push(format!("{} {}", cask, installed.latest));
            }
            Ok(Some(installed)) => {
                let old: Vec<&str> = installed.old.iter().map(Version::as_str).collect();
                lines.push(format!(
                    "{} {} (old: {})",
                    cask,
                    installed.latest,
                    old.join(", ")
                ));
            }
            Ok(None) => lines.push(format!("{} (no versions installed)", cask)),
            Err(e) => warn!("Skipping {}: {:#}", cask, e),
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    #[test]
    fn test_list_lines() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_dir()
            .with(eq(PathBuf::from("/brew/Caskroom")))
            .returning(|p| Ok(vec![p.join("firefox"), p.join("empty"), p.join("iterm2")]));
        runtime
            .expect_read_dir()
            .with(eq(PathBuf::from("/brew/Caskroom/firefox")))
            .returning(|p| Ok(vec![p.join("127.0"), p.join("128.0"), p.join(".metadata")]));
        runtime
            .expect_read_dir()
            .with(eq(PathBuf::from("/brew/Caskroom/empty")))
            .returning(|p| Ok(vec![p.join(".metadata")]));
        runtime
            .expect_read_dir()
            .with(eq(PathBuf::from("/brew/Caskroom/iterm2")))
            .returning(|p| Ok(vec![p.join("3.5.0")]));
        runtime.expect_is_dir().returning(|_| true);

        let lines = list_lines(&runtime, &Config::for_test("/brew")).unwrap();
        assert_eq!(
            lines,
            vec![
                "firefox 128.0 (old: 127.0)",
                "empty (no versions installed)",
                "iterm2 3.5.0",
            ]
        );
    }
}
