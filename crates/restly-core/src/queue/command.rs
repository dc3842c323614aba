use crate::queue::Action;

use serde::{Deserialize, Serialize};

/// Default focus-session length offered by the tray menu.
pub const DEFAULT_SESSION_MINUTES: u32 = 45;

/// Default focus-session type offered by the tray menu.
pub const DEFAULT_SESSION_TYPE: &str = "deep_work";

/// Parameters of a `set_session` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Session length in minutes.
    pub duration_minutes: u32,
    /// Session kind, e.g. `deep_work`.
    #[serde(rename = "type")]
    pub session_type: String,
}

impl SessionParams {
    /// Session of `duration_minutes` with the given type tag.
    pub fn new(duration_minutes: u32, session_type: impl Into<String>) -> Self {
        Self {
            duration_minutes,
            session_type: session_type.into(),
        }
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_MINUTES, DEFAULT_SESSION_TYPE)
    }
}

/// Parameters of an `nl_command` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlCommandParams {
    /// User-entered text, never rewritten.
    pub text: String,
}

/// A user command with typed parameters.
///
/// Each variant maps to exactly one queue record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `set_session` with duration and type.
    SetSession(SessionParams),
    /// `toggle_pause`, no parameters.
    TogglePause,
    /// `summarize_day`, no parameters.
    SummarizeDay,
    /// `nl_command` with the raw text.
    NlCommand(NlCommandParams),
}

impl Command {
    /// Natural-language command carrying `text` as-is.
    pub fn nl(text: impl Into<String>) -> Self {
        Command::NlCommand(NlCommandParams { text: text.into() })
    }

    /// Action tag this command is recorded under.
    pub fn action(&self) -> Action {
        match self {
            Command::SetSession(_) => Action::SetSession,
            Command::TogglePause => Action::TogglePause,
            Command::SummarizeDay => Action::SummarizeDay,
            Command::NlCommand(_) => Action::NlCommand,
        }
    }
}
