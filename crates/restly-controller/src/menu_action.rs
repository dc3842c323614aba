/// User gestures offered by the tray menu and the control page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Start the configured deep work session.
    StartDeepWork,
    /// Open the command prompt prefilled with the reschedule text.
    RescheduleBreak,
    /// Pause or resume the running session.
    TogglePause,
    /// Ask for a summary of the day.
    SummarizeDay,
    /// Open the empty command prompt.
    CommandPalette,
    /// Stop the controller.
    Quit,
}

impl MenuAction {
    /// Actions that enqueue directly, addressable as `POST /actions/{slug}`.
    pub const QUICK: [MenuAction; 3] = [
        MenuAction::StartDeepWork,
        MenuAction::TogglePause,
        MenuAction::SummarizeDay,
    ];

    /// URL slug for quick actions.
    pub fn slug(self) -> Option<&'static str> {
        match self {
            MenuAction::StartDeepWork => Some("deep_work"),
            MenuAction::TogglePause => Some("toggle_pause"),
            MenuAction::SummarizeDay => Some("summarize_day"),
            _ => None,
        }
    }

    /// Quick action for a URL slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::QUICK
            .into_iter()
            .find(|action| action.slug() == Some(slug))
    }

    /// Menu and button label.
    pub fn label(self, deep_work_minutes: u32) -> String {
        match self {
            MenuAction::StartDeepWork => format!("Start Deep Work ({}m)", deep_work_minutes),
            MenuAction::RescheduleBreak => "Reschedule Break…".to_string(),
            MenuAction::TogglePause => "Pause/Resume".to_string(),
            MenuAction::SummarizeDay => "Summarize Day".to_string(),
            MenuAction::CommandPalette => "Command…".to_string(),
            MenuAction::Quit => "Quit Controller".to_string(),
        }
    }
}
