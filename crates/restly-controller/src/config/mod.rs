mod logging_config;
#[allow(clippy::module_inception)]
mod config;
mod queue_config;
mod server_config;
mod session_config;

pub(crate) use {
    config::{Config, ConfigOrigin}, logging_config::LoggingConfig, queue_config::QueueConfig,
    server_config::ServerConfig, session_config::SessionConfig,
};

use restly_core::{DEFAULT_SESSION_MINUTES, DEFAULT_SESSION_TYPE};

pub(crate) const DEFAULT_PORT: u16 = 7879;
pub(crate) const DEFAULT_SYNC_ON_WRITE: bool = true;
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";
pub(crate) const DEFAULT_LOG_TO_FILE: bool = true;
pub(crate) const DEFAULT_RESCHEDULE_PROMPT: &str = "Reschedule my break for after this Zoom call";

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_sync_on_write() -> bool {
    DEFAULT_SYNC_ON_WRITE
}

pub(crate) fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub(crate) fn default_log_to_file() -> bool {
    DEFAULT_LOG_TO_FILE
}

pub(crate) fn default_deep_work_minutes() -> u32 {
    DEFAULT_SESSION_MINUTES
}

pub(crate) fn default_deep_work_type() -> String {
    DEFAULT_SESSION_TYPE.to_string()
}

pub(crate) fn default_reschedule_prompt() -> String {
    DEFAULT_RESCHEDULE_PROMPT.to_string()
}
