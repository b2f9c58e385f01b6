//! Grammaringer: system-wide grammar correction behind a global hotkey.

mod app;
mod app_command;
mod clipboard_bridge;
mod config;
mod copy_keystroke;
mod error;
mod hotkey_handler;
mod logging;
mod notification;
mod submission_status;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_icon_state;
mod tray_manager;
mod ui;

pub(crate) use {
    app::App,
    app_command::{AppCommand, SubmitOrigin},
    clipboard_bridge::{ClipboardBridge, SelectionSource},
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    submission_status::SubmissionStatus,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::{
    config::Config,
    ui::{EditorContext, EditorSnapshot},
};

use std::sync::{Arc, atomic::AtomicUsize};

use global_hotkey::GlobalHotKeyManager;
use grammaringer_core::{AppState, CorrectionClient};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Application entry point.
fn main() {
    // Held until process exit so buffered log lines are flushed.
    let _log_guard = match Config::log_dir().and_then(|dir| logging::init(&dir)) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_stdout_only();
            warn!(error = ?e, "File logging unavailable, logging to stdout only");
            None
        }
    };

    let config = match Config::load().and_then(|c| c.validate().map(|()| c)) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Persists across event loop iterations; dropping it unregisters the hotkey.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;
    let mut config = Some(config);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::SetState(state) => {
                        if let Err(e) = tray_manager.update_state(state) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let Some(config) = config.take() else {
                    return;
                };

                let client = match CorrectionClient::new(config.service_settings()) {
                    Ok(client) => Arc::new(client),
                    Err(e) => {
                        error!("Failed to create CorrectionClient: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                // Register hotkey on the main thread: tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                // Failure is surfaced but not fatal; manual submit still works.
                let hotkey_id = match hotkey_handler::register_hotkey(&config.hotkey.chord) {
                    Ok((manager, id)) => {
                        hotkey_manager = Some(manager);
                        Some(id)
                    }
                    Err(e) => {
                        error!(error = ?e, "Failed to register hotkey, manual submit only");
                        notification::notify(
                            "Grammaringer hotkey unavailable",
                            &format!(
                                "{} could not be registered. Use the editor's Submit button instead.",
                                config.hotkey.chord
                            ),
                        );
                        None
                    }
                };

                // Relay tray commands from the runtime to the event loop.
                let (tray_tx, tray_rx) = std::sync::mpsc::channel::<TrayCommand>();
                let tray_proxy = tray_proxy.clone();
                std::thread::spawn(move || {
                    while let Ok(cmd) = tray_rx.recv() {
                        if tray_proxy.send_event(cmd).is_err() {
                            break;
                        }
                    }
                });

                let open_editor_menu_id = tray_manager.open_editor_item_id().clone();
                let exit_menu_id = tray_manager.exit_item_id().clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(run_services(
                        config,
                        client,
                        hotkey_id,
                        tray_tx,
                        open_editor_menu_id,
                        exit_menu_id,
                    ));
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}

/// Wire the hotkey handler, application loop and editor server together and
/// run them until shutdown.
async fn run_services(
    config: Config,
    client: Arc<CorrectionClient>,
    hotkey_id: Option<u32>,
    tray_tx: std::sync::mpsc::Sender<TrayCommand>,
    open_editor_menu_id: tray_icon::menu::MenuId,
    exit_menu_id: tray_icon::menu::MenuId,
) {
    let state = AppState::new(config.prompt.template.clone());
    let status = SubmissionStatus::Idle;

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (snapshot_tx, snapshot_rx) = watch::channel(EditorSnapshot::new(&state, &status));
    let editor_connections = Arc::new(AtomicUsize::new(0));

    let editor = EditorContext {
        command_tx: command_tx.clone(),
        snapshot_rx,
        connections: Arc::clone(&editor_connections),
    };

    let hotkey_handler = hotkey_id.map(|id| {
        let mut handler = HotkeyHandler::new(id, ClipboardBridge::new(config.hotkey.settle_delay()));
        handler.subscribe(command_tx.clone());
        handler
    });

    let app = App {
        state,
        status,
        in_flight: 0,
        corrections_applied: 0,
        corrector: client,
        tray_tx,
        command_tx,
        command_rx,
        snapshot_tx,
        shutdown_tx,
        editor_url: config.editor_url(),
        editor_connections,
        reveal_editor_on_hotkey: config.behavior.reveal_editor_on_hotkey,
        open_editor_menu_id,
        exit_menu_id,
    };

    info!(editor_url = %config.editor_url(), "Editor available");

    let server_shutdown = shutdown_rx.clone();

    tokio::join!(
        async {
            if let Some(handler) = hotkey_handler {
                if let Err(e) = handler.run(shutdown_rx).await {
                    error!(error = ?e, "Hotkey handler error");
                }
            }
        },
        async {
            if let Err(e) = ui::serve(config.server.port, editor, server_shutdown).await {
                error!(error = ?e, "Editor server error");
                notification::notify(
                    "Grammaringer editor unavailable",
                    &format!("The editor could not start on port {}.", config.server.port),
                );
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );
}
