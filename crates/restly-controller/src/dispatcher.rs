//! Turns user gestures into queue records.
//!
//! Every gesture resolves to at most one `enqueue`. Prompts are opened in the
//! browser through a [`PromptOpener`] so the mapping can be tested without a
//! desktop session.

use crate::{AppResult, MenuAction};

use restly_core::{Action, Command, CommandQueue, SessionParams};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Path of the prompt prefilled with the reschedule text.
pub(crate) const RESCHEDULE_PATH: &str = "/reschedule";

/// Opens a URL for the user.
pub trait PromptOpener: Send + Sync + 'static {
    /// Open `url`, typically in the default browser.
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserOpener;

impl PromptOpener for BrowserOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }
}

/// What a gesture resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// One record was appended under this action.
    Enqueued(Action),
    /// Empty text was submitted; nothing was written.
    Skipped,
    /// The command prompt was opened.
    PromptOpened,
    /// The controller should stop.
    ShuttingDown,
}

/// Maps [`MenuAction`]s and prompt text onto the command queue.
pub struct Dispatcher {
    queue: CommandQueue,
    deep_work: SessionParams,
    prompt_url: String,
    opener: Box<dyn PromptOpener>,
}

impl Dispatcher {
    /// Dispatcher writing to `queue` and opening prompts below `prompt_url`.
    pub fn new(
        queue: CommandQueue,
        deep_work: SessionParams,
        prompt_url: impl Into<String>,
        opener: impl PromptOpener,
    ) -> Self {
        Self {
            queue,
            deep_work,
            prompt_url: prompt_url.into(),
            opener: Box::new(opener),
        }
    }

    /// Carry out a gesture.
    ///
    /// # Errors
    ///
    /// Returns error if the record cannot be written or the prompt cannot be
    /// opened.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn dispatch(&self, action: MenuAction) -> AppResult<DispatchOutcome> {
        match action {
            MenuAction::StartDeepWork => {
                self.submit(&Command::SetSession(self.deep_work.clone()))
            }
            MenuAction::TogglePause => self.submit(&Command::TogglePause),
            MenuAction::SummarizeDay => self.submit(&Command::SummarizeDay),
            MenuAction::RescheduleBreak => self.open_prompt(RESCHEDULE_PATH),
            MenuAction::CommandPalette => self.open_prompt("/"),
            MenuAction::Quit => Ok(DispatchOutcome::ShuttingDown),
        }
    }

    /// Record prompt text as an `nl_command`.
    ///
    /// Surrounding whitespace is trimmed; blank input records nothing.
    /// Everything else is forwarded untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the record cannot be written.
    #[track_caller]
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn submit_text(&self, text: &str) -> AppResult<DispatchOutcome> {
        let text = text.trim();
        if text.is_empty() {
            info!("Empty command text, nothing sent");
            return Ok(DispatchOutcome::Skipped);
        }

        self.submit(&Command::nl(text))
    }

    #[track_caller]
    fn submit(&self, command: &Command) -> AppResult<DispatchOutcome> {
        let command_id = Uuid::new_v4();
        let action = command.action();

        debug!(command_id = %command_id, action = %action, queue = ?self.queue.path(), "Recording command");
        self.queue.submit(command)?;

        info!(command_id = %command_id, action = %action, "Command recorded");

        Ok(DispatchOutcome::Enqueued(action))
    }

    #[track_caller]
    fn open_prompt(&self, path: &str) -> AppResult<DispatchOutcome> {
        let url = format!("{}{}", self.prompt_url, path);
        self.opener.open(&url)?;

        info!(url = %url, "Opened command prompt");

        Ok(DispatchOutcome::PromptOpened)
    }
}
