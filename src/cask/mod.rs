//! Cask domain: versions, definitions and the Caskroom.

pub mod metadata;
pub mod repository;
pub mod version;

pub use metadata::{CaskMetadata, MetadataScanner, latest_declared, parse_definition};
pub use repository::{CaskRepository, InstalledVersions};
pub use version::Version;
