//! Core configuration for scenery-animation-core.

use serde::{Deserialize, Serialize};

/// Sizing hints for the engine. Keep this small; it only shapes allocation and
/// how much per-tick bookkeeping is retained.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity for the instance list.
    pub instances_capacity: usize,
    /// Initial capacity for the per-tick change list.
    pub changes_capacity: usize,
    /// Maximum events retained per tick; further events are dropped with a warning.
    pub max_events_per_tick: usize,
    /// Record every applied property in [`crate::Outputs::changes`].
    pub record_changes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instances_capacity: 16,
            changes_capacity: 256,
            max_events_per_tick: 1024,
            record_changes: true,
        }
    }
}
