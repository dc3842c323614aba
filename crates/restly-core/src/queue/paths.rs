use crate::{CoreResult, QueueError};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use error_location::ErrorLocation;

const APP_DIR: &str = "restly";
const COMMANDS_DIR: &str = "commands";
const QUEUE_FILE: &str = "queue.jsonl";

/// Well-known queue location: `<config-root>/restly/commands/queue.jsonl`.
///
/// On Linux the config root is `$XDG_CONFIG_HOME` or `~/.config`.
#[track_caller]
pub fn default_queue_path() -> CoreResult<PathBuf> {
    let base = BaseDirs::new().ok_or_else(|| QueueError::NoConfigDir {
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(queue_path_in(base.config_dir()))
}

/// Queue location below an explicit config root.
pub fn queue_path_in(config_root: &Path) -> PathBuf {
    config_root
        .join(APP_DIR)
        .join(COMMANDS_DIR)
        .join(QUEUE_FILE)
}
