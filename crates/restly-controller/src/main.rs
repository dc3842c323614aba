//! Restly Controller: tray menu that records productivity commands to the
//! Restly command queue.

mod app;
mod app_command;
mod config;
mod control_page;
mod control_server;
mod dispatcher;
mod error;
mod logging;
mod menu_action;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    dispatcher::{BrowserOpener, DispatchOutcome, Dispatcher, PromptOpener},
    error::{AppError, Result as AppResult},
    menu_action::MenuAction,
    tray_command::{TrayCommand, TrayNotifier},
    tray_icon_state::TrayIconState,
    tray_manager::{MenuBindings, TrayManager},
};

use crate::{
    config::{Config, ConfigOrigin, LoggingConfig},
    control_server::ControlState,
};

use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Everything the async runtime thread needs, handed over once at startup.
struct Startup {
    config: Config,
    dispatcher: Dispatcher,
    menu: Option<MenuBindings>,
    tray_proxy: EventLoopProxy<TrayCommand>,
}

/// Application entry point.
fn main() {
    // Loaded before the subscriber exists; the outcome is logged below.
    let loaded = Config::path()
        .and_then(|path| Config::load_with_origin(&path).map(|loaded| (path, loaded)));

    let logging = loaded
        .as_ref()
        .map(|(_, (c, _))| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    init_logging(logging);

    let config = match loaded {
        Ok((path, (c, ConfigOrigin::Created))) => {
            info!(config_path = ?path, "No config found, wrote defaults");
            c
        }
        Ok((path, (c, ConfigOrigin::Existing))) => {
            info!(config_path = ?path, "Configuration loaded");
            c
        }
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let queue = match config.command_queue() {
        Ok(q) => q,
        Err(e) => {
            error!("Failed to resolve command queue: {:?}", e);
            std::process::exit(1);
        }
    };
    info!(queue = ?queue.path(), "Command queue ready");

    let dispatcher = Dispatcher::new(
        queue,
        config.deep_work_session(),
        config.server_url(),
        BrowserOpener,
    );

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    // Without a tray the control page doubles as the controller window.
    let mut tray_manager = match TrayManager::new(config.session.deep_work_minutes) {
        Ok(tm) => Some(tm),
        Err(e) => {
            warn!(error = ?e, "No system tray available, falling back to the control page");
            None
        }
    };

    let mut startup = Some(Startup {
        menu: tray_manager.as_ref().map(TrayManager::bindings),
        tray_proxy: event_loop.create_proxy(),
        config,
        dispatcher,
    });

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                TrayCommand::SetState(state) => {
                    if let Some(tray_manager) = tray_manager.as_mut() {
                        if let Err(e) = tray_manager.update_state(state) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                }
                TrayCommand::Shutdown => {
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(tao::event::StartCause::Init) => {
                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                if let Some(startup) = startup.take() {
                    // Spawn tokio runtime on separate thread.
                    // TrayManager stays on the main thread.
                    std::thread::spawn(move || run_runtime(startup));
                }
            }
            _ => {}
        }
    });
}

fn init_logging(logging: LoggingConfig) {
    let log_dir = match Config::log_dir() {
        Ok(dir) => dir,
        Err(_) => std::env::temp_dir(),
    };

    if let Err(e) = logging::init_logging(&logging, &log_dir) {
        eprintln!("restly-controller: {}", e);
    }
}

/// Body of the async runtime thread: control page, app loop and Ctrl+C.
fn run_runtime(startup: Startup) {
    let Startup {
        config,
        dispatcher,
        menu,
        tray_proxy,
    } = startup;

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            tray_proxy.notify(TrayCommand::Shutdown);
            return;
        }
    };

    rt.block_on(async move {
        let listener = match control_server::bind(config.server.port).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = ?e, "Control page unavailable");
                tray_proxy.notify(TrayCommand::Shutdown);
                return;
            }
        };

        if menu.is_none() {
            let url = config.server_url();
            match BrowserOpener.open(&url) {
                Ok(()) => info!(url = %url, "Opened control page"),
                Err(e) => warn!(url = %url, error = ?e, "Open the control page manually"),
            }
        }

        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let router = control_server::router(ControlState::new(
            command_tx.clone(),
            config.session.deep_work_minutes,
            &config.session.reschedule_prompt,
            config.server.port,
        ));

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl+C received");
                let _ = command_tx.send(AppCommand::Shutdown).await;
            }
        });

        let app = App {
            dispatcher,
            tray: tray_proxy,
            menu,
            command_rx,
            shutdown_tx,
        };

        tokio::join!(
            async {
                if let Err(e) = control_server::serve(listener, router, shutdown_rx).await {
                    error!(error = ?e, "Control page error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );
    });
}
