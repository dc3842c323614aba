use crate::{
    AppCommand, AppError, AppResult, DispatchOutcome, Dispatcher, MenuAction, MenuBindings,
    TrayCommand, TrayIconState, TrayNotifier,
};

use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// Main application state.
///
/// Runs on the async runtime thread and is the only place that writes to the
/// command queue. Tray clicks and control page requests are handled one at a
/// time, in arrival order. Tray icon updates go back to the main thread via
/// `tray` because `TrayIcon` is `!Send` and must remain on the UI thread.
pub struct App<T: TrayNotifier> {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) tray: T,
    pub(crate) menu: Option<MenuBindings>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<T: TrayNotifier> App<T> {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Restly controller starting");

        // Tray event forwarding via single persistent blocking task.
        //
        // MenuEvent::receiver() returns a crossbeam_channel::Receiver which
        // HAS blocking recv() -- zero polling, instant response, one thread.
        //
        // Shutdown: when tray_event_rx is dropped (main loop breaks),
        // tray_event_tx.blocking_send() fails, breaking the blocking loop.
        // Without a tray the sender is dropped at once and the branch idles.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel::<MenuEvent>(32);
        let tray_handle = self.menu.is_some().then(|| {
            tokio::task::spawn_blocking(move || {
                let receiver = MenuEvent::receiver();
                while let Ok(event) = receiver.recv() {
                    if tray_event_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
            })
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    let Some(action) = self.menu.as_ref().and_then(|m| m.resolve(&event.id)) else {
                        warn!(menu_id = ?event.id, "Unknown tray menu item");
                        continue;
                    };
                    if matches!(self.handle_action(action), Ok(DispatchOutcome::ShuttingDown)) {
                        break;
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Trigger { action, reply } => {
                            let result = self.handle_action(action);
                            let stop = matches!(result, Ok(DispatchOutcome::ShuttingDown));
                            let _ = reply.send(result);
                            if stop {
                                break;
                            }
                        }
                        AppCommand::SubmitText { text, reply } => {
                            let result = self.dispatcher.submit_text(&text);
                            self.report(&result);
                            let _ = reply.send(result);
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        if let Some(tray_handle) = tray_handle {
            match tokio::time::timeout(std::time::Duration::from_secs(1), tray_handle).await {
                Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
                Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
                Err(_) => info!(
                    "Tray event forwarder did not stop within timeout, \
                         will be cleaned up on exit"
                ),
            }
        }

        let _ = self.shutdown_tx.send(true);
        self.tray.notify(TrayCommand::Shutdown);
        info!("Restly controller shut down successfully");

        Ok(())
    }

    /// Dispatch one gesture and reflect its outcome in the tray.
    #[instrument(skip(self))]
    fn handle_action(&self, action: MenuAction) -> AppResult<DispatchOutcome> {
        let result = self.dispatcher.dispatch(action);
        self.report(&result);
        result
    }

    /// Log failures; queue failures also flip the tray icon.
    fn report(&self, result: &AppResult<DispatchOutcome>) {
        match result {
            Ok(DispatchOutcome::Enqueued(_)) => {
                self.tray.notify(TrayCommand::SetState(TrayIconState::Ready));
            }
            Ok(DispatchOutcome::ShuttingDown) => info!("Quit requested"),
            Ok(_) => {}
            Err(e @ AppError::Queue { .. }) => {
                error!(error = ?e, "Failed to record command");
                self.tray.notify(TrayCommand::SetState(TrayIconState::Failed));
            }
            Err(e) => error!(error = ?e, "Failed to handle command"),
        }
    }
}
