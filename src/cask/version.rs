//! Loosely structured version strings.
//!
//! Cask versions are free-form: `1.2.3`, `4.0b2`, `2024.01,abc123`, `latest`.
//! A [`Version`] keeps the original string and a list of components obtained
//! by splitting it into runs of ASCII digits and ASCII letters. Everything
//! else (`.`, `-`, `_`, `,`, ...) only separates components.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Version string meaning "always the current release".
pub const LATEST: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    /// Digits with leading zeros stripped ("0" for all zeros)
    Numeric(String),
    Text(String),
}

impl Component {
    fn numeric(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Component::Numeric("0".to_string())
        } else {
            Component::Numeric(trimmed.to_string())
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Component::Numeric(s) | Component::Text(s) => s,
        }
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // No integer parsing, so arbitrarily long build numbers still compare.
            (Component::Numeric(a), Component::Numeric(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            // Mixed pairs compare as strings. ASCII digits sort before ASCII
            // letters, so numbers always come before words.
            _ => self.as_str().cmp(other.as_str()),
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parsed, comparable version.
///
/// Ordering compares components pairwise; when one version is a prefix of
/// the other, the longer one is greater (`1.0 < 1.0.1`). Two versions that
/// differ only in separators are equal (`1.0-2 == 1_0.2`).
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: Vec<Component>,
}

impl Version {
    /// Parse a version string. Never fails; a string without any letters or
    /// digits simply has no components and sorts below everything else.
    pub fn parse(raw: &str) -> Self {
        let mut components = Vec::new();
        let mut rest = raw;

        while let Some(start) = rest.find(|c: char| c.is_ascii_alphanumeric()) {
            rest = &rest[start..];
            let is_digit = rest.starts_with(|c: char| c.is_ascii_digit());
            let end = rest
                .find(|c: char| {
                    if is_digit {
                        !c.is_ascii_digit()
                    } else {
                        !c.is_ascii_alphabetic()
                    }
                })
                .unwrap_or(rest.len());

            let token = &rest[..end];
            components.push(if is_digit {
                Component::numeric(token)
            } else {
                Component::Text(token.to_string())
            });
            rest = &rest[end..];
        }

        Self {
            raw: raw.to_string(),
            components,
        }
    }

    /// The original version string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this is the `latest` sentinel.
    pub fn is_latest(&self) -> bool {
        self.raw == LATEST
    }

    /// Number of parsed components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
