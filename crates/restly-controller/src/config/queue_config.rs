use crate::config::default_sync_on_write;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue file override (None = `<config-root>/restly/commands/queue.jsonl`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Call `sync_data` after every appended record.
    #[serde(default = "default_sync_on_write")]
    pub sync_on_write: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            path: None,
            sync_on_write: default_sync_on_write(),
        }
    }
}
