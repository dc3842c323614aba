use crate::config::{default_deep_work_minutes, default_deep_work_type, default_reschedule_prompt};

use serde::{Deserialize, Serialize};

/// Quick actions offered by the tray menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Length of the "Start Deep Work" session.
    #[serde(default = "default_deep_work_minutes")]
    pub deep_work_minutes: u32,

    /// Session type sent with "Start Deep Work".
    #[serde(default = "default_deep_work_type")]
    pub deep_work_type: String,

    /// Text prefilled in the prompt opened by "Reschedule Break…".
    #[serde(default = "default_reschedule_prompt")]
    pub reschedule_prompt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            deep_work_minutes: default_deep_work_minutes(),
            deep_work_type: default_deep_work_type(),
            reschedule_prompt: default_reschedule_prompt(),
        }
    }
}
