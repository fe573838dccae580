//! Window commands exposed to the settings/dashboard page.

use tauri::{AppHandle, Manager};

#[tauri::command]
pub fn cmd_open_window(app: AppHandle) -> Result<(), String> {
    let win = app
        .get_webview_window("main")
        .ok_or_else(|| "main window not found".to_string())?;
    win.unminimize().map_err(|e| e.to_string())?;
    win.show().map_err(|e| e.to_string())?;
    win.set_focus().map_err(|e| e.to_string())
}

/// Hide rather than destroy -- the tray keeps the app alive.
#[tauri::command]
pub fn cmd_close_window(app: AppHandle) -> Result<(), String> {
    let win = app
        .get_webview_window("main")
        .ok_or_else(|| "main window not found".to_string())?;
    win.hide().map_err(|e| e.to_string())
}
