// Prevents additional console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Clockwatch Desktop Application
//!
//! Thin Tauri shell over clockwatch-core: a tray icon, a settings/dashboard
//! window, and a background poll loop. All approval logic lives in the core
//! library, shared with the CLI binary.

use tauri::Manager;
use tracing_subscriber::EnvFilter;

mod bridge;
mod notifier;
mod tray;
mod window;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            app.manage(bridge::PollerState::new(app.handle().clone()));
            tray::setup(app)?;
            bridge::spawn_poll_loop(app.handle().clone());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Credential + poll commands
            bridge::cmd_save_api_key,
            bridge::cmd_get_api_key,
            bridge::cmd_clear_api_key,
            bridge::cmd_validate_key,
            bridge::cmd_poll_now,
            bridge::cmd_last_status,
            // Config commands
            bridge::cmd_config_get,
            bridge::cmd_config_set,
            bridge::cmd_config_list,
            bridge::cmd_get_env,
            // Window commands
            window::cmd_open_window,
            window::cmd_close_window,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| {
            eprintln!("Tauri application error: {e}");
            std::process::exit(1);
        });
}
