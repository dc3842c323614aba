use crate::{AppResult, DispatchOutcome, MenuAction};

use tokio::sync::oneshot;

/// Reply channel carrying the outcome of a dispatched command.
pub type Reply = oneshot::Sender<AppResult<DispatchOutcome>>;

/// Commands sent from the control page to the main application loop.
#[derive(Debug)]
pub enum AppCommand {
    /// Run a menu action as if picked from the tray.
    Trigger {
        /// Action to run.
        action: MenuAction,
        /// Where to send the outcome.
        reply: Reply,
    },
    /// Record prompt text as a natural-language command.
    SubmitText {
        /// Text as typed by the user.
        text: String,
        /// Where to send the outcome.
        reply: Reply,
    },
    /// Request application shutdown.
    Shutdown,
}
