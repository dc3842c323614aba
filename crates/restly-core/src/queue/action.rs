use std::fmt;

/// The fixed action vocabulary understood by the queue consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start a focus session of a given length and type.
    SetSession,
    /// Pause a running session, or resume a paused one.
    TogglePause,
    /// Ask the backend for a summary of the day.
    SummarizeDay,
    /// Free-form natural-language command, forwarded verbatim.
    NlCommand,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Action; 4] = [
        Action::SetSession,
        Action::TogglePause,
        Action::SummarizeDay,
        Action::NlCommand,
    ];

    /// Wire tag written to the `action` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::SetSession => "set_session",
            Action::TogglePause => "toggle_pause",
            Action::SummarizeDay => "summarize_day",
            Action::NlCommand => "nl_command",
        }
    }

    /// Look up an action by its wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == tag)
    }
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
