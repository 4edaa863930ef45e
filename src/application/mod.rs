//! Application layer - use cases built on the cask domain.
//!
//! These actions only read state and classify it; printing, prompting and
//! mutating live in the command layer.

mod prune;
mod upgrade;

pub use prune::{PruneAction, PruneInfo};
pub use upgrade::{CaskStatus, UpgradeAction, upgrade_due};
