use crate::TrayIconState;

use tao::event_loop::EventLoopProxy;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    /// Update the tray icon to a new state.
    SetState(TrayIconState),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}

/// Delivers [`TrayCommand`]s to whoever owns the tray.
pub trait TrayNotifier: Send + 'static {
    /// Best-effort delivery; a closed UI thread is not an error.
    fn notify(&self, command: TrayCommand);
}

impl TrayNotifier for EventLoopProxy<TrayCommand> {
    fn notify(&self, command: TrayCommand) {
        let _ = self.send_event(command);
    }
}

impl TrayNotifier for std::sync::mpsc::Sender<TrayCommand> {
    fn notify(&self, command: TrayCommand) {
        let _ = self.send(command);
    }
}
