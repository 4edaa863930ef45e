//! Cask definition lookup and scanning.
//!
//! Definitions are Ruby files owned by Homebrew. They are not parsed; the
//! scanner only pulls `version` declarations and the `auto_updates true`
//! flag out of them line by line, so an odd or newer file format degrades to
//! "no metadata" instead of an error.

use anyhow::Result;
use log::debug;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::version::Version;
use crate::runtime::Runtime;

/// File extension of cask definition files.
pub const DEFINITION_EXTENSION: &str = "rb";

// `version "1.2.3"`, `  version :latest`, `version '2.0,100'`
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\W*version (\S+)").unwrap());

static AUTO_UPDATES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\W*auto_updates true\b").unwrap());

/// Raw facts extracted from a definition file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionScan {
    /// Declared version tokens in file order, quotes and colons stripped
    pub versions: Vec<String>,
    /// Whether the cask updates itself
    pub auto_updates: bool,
}

/// Scan definition file contents.
pub fn parse_definition(content: &str) -> DefinitionScan {
    let versions = VERSION_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_decoration(m.as_str()).to_string())
        .collect();

    DefinitionScan {
        versions,
        auto_updates: AUTO_UPDATES_RE.is_match(content),
    }
}

fn strip_decoration(token: &str) -> &str {
    token.trim_matches(|c| matches!(c, '\'' | '"' | ':'))
}

/// Pick the latest of the declared versions.
///
/// A `latest` token wins outright and ends the scan. Otherwise the maximum
/// wins; among equal versions the first declared one is kept.
pub fn latest_declared(tokens: &[String]) -> Option<Version> {
    let mut latest: Option<Version> = None;
    for token in tokens {
        let version = Version::parse(token);
        if version.is_latest() {
            return Some(version);
        }
        if latest.as_ref().is_none_or(|current| version > *current) {
            latest = Some(version);
        }
    }
    latest
}

/// Everything known about a cask from its definition file.
#[derive(Debug, Clone)]
pub struct CaskMetadata {
    /// Latest declared version
    pub latest: Version,
    /// Whether the cask updates itself outside of Homebrew
    pub auto_updates: bool,
}

/// Looks up cask definitions across an ordered list of metadata roots.
pub struct MetadataScanner<'a, R: Runtime> {
    runtime: &'a R,
    roots: &'a [PathBuf],
}

impl<'a, R: Runtime> MetadataScanner<'a, R> {
    pub fn new(runtime: &'a R, roots: &'a [PathBuf]) -> Self {
        Self { runtime, roots }
    }

    /// Find the definition file for a cask.
    ///
    /// Roots are tried in order and the first root holding a file wins.
    /// Inside a root the file may sit directly in it or in a one-letter
    /// shard directory (`Casks/f/firefox.rb`).
    pub fn definition_path(&self, cask: &str) -> Option<PathBuf> {
        let file_name = format!("{}.{}", cask, DEFINITION_EXTENSION);
        self.roots
            .iter()
            .find_map(|root| self.find_in_root(root, cask, &file_name))
    }

    fn find_in_root(&self, root: &Path, cask: &str, file_name: &str) -> Option<PathBuf> {
        let direct = root.join(file_name);
        if self.runtime.is_file(&direct) {
            return Some(direct);
        }

        let shard = cask.chars().next()?;
        let sharded = root.join(shard.to_string()).join(file_name);
        if self.runtime.is_file(&sharded) {
            return Some(sharded);
        }

        None
    }

    /// Locate and scan the definition of a cask.
    ///
    /// Returns `Ok(None)` when no root has a definition, or when the
    /// definition that was found declares no version at all. Roots after the
    /// one holding the file are never consulted.
    #[tracing::instrument(skip(self))]
    pub fn locate(&self, cask: &str) -> Result<Option<CaskMetadata>> {
        let Some(path) = self.definition_path(cask) else {
            debug!("No definition found for {}", cask);
            return Ok(None);
        };

        let content = self.runtime.read_to_string(&path)?;
        let scan = parse_definition(&content);

        let Some(latest) = latest_declared(&scan.versions) else {
            debug!("No version declared in {:?}", path);
            return Ok(None);
        };

        debug!(
            "{}: declared {:?}, latest {}, auto_updates={}",
            cask, scan.versions, latest, scan.auto_updates
        );

        Ok(Some(CaskMetadata {
            latest,
            auto_updates: scan.auto_updates,
        }))
    }
}
