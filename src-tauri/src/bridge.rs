//! Tauri commands bridging the webview to clockwatch-core, plus the
//! background poll loop.

use chrono::Utc;
use clockwatch_core::{
    presenter, ApprovalPoller, Config, CredentialStore, KeyringStore, PollScheduler,
};
use serde::Serialize;
use serde_json::Value;
use tauri::{AppHandle, Emitter, Manager, State};
use tokio::sync::Mutex;

use crate::notifier::DesktopNotifier;

/// The poller, shared between commands and the poll loop. A tokio mutex so
/// a lock may be held across the HTTP await; this also serializes polls
/// with button-triggered validations.
pub struct PollerState(pub Mutex<ApprovalPoller<KeyringStore, DesktopNotifier>>);

impl PollerState {
    pub fn new(app: AppHandle) -> Self {
        let poller = ApprovalPoller::new(
            Config::load_or_default(),
            KeyringStore,
            DesktopNotifier::new(app),
        );
        Self(Mutex::new(poller))
    }
}

/// Everything the dashboard renders, pre-mapped by the presenter.
#[derive(Serialize)]
pub struct DashboardView {
    pub key: presenter::StatusDisplay,
    pub approval: presenter::StatusDisplay,
    pub date_range: Option<String>,
    pub status_info: Option<String>,
}

// ── Credential + poll commands ──────────────────────────────────────

#[tauri::command]
pub async fn cmd_save_api_key(
    state: State<'_, PollerState>,
    key: String,
) -> Result<Value, String> {
    let mut poller = state.0.lock().await;
    let validation = poller.validate(&key).await.map_err(|e| e.to_string())?;
    serde_json::to_value(presenter::key_display(validation)).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cmd_get_api_key(state: State<'_, PollerState>) -> Result<Option<String>, String> {
    let poller = state.0.lock().await;
    poller.store().get().map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cmd_clear_api_key(state: State<'_, PollerState>) -> Result<(), String> {
    let mut poller = state.0.lock().await;
    poller.clear_key().map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cmd_validate_key(state: State<'_, PollerState>) -> Result<Value, String> {
    let mut poller = state.0.lock().await;
    let validation = poller.validate_stored().await.map_err(|e| e.to_string())?;
    serde_json::to_value(presenter::key_display(validation)).map_err(|e| e.to_string())
}

/// Manual "check now" from the UI; always forced past the weekday gate.
#[tauri::command]
pub async fn cmd_poll_now(state: State<'_, PollerState>) -> Result<Value, String> {
    let mut poller = state.0.lock().await;
    let outcome = poller.poll(&chrono::Local::now(), true).await;
    serde_json::to_value(outcome).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cmd_last_status(state: State<'_, PollerState>) -> Result<Value, String> {
    let poller = state.0.lock().await;
    let session = poller.session();
    let view = DashboardView {
        key: presenter::key_display(session.validation),
        approval: presenter::status_display(&session.last_status),
        date_range: session.last_period.as_ref().map(presenter::format_period),
        status_info: session.last_info.as_ref().map(presenter::format_status_info),
    };
    serde_json::to_value(view).map_err(|e| e.to_string())
}

// ── Config commands ─────────────────────────────────────────────────

#[tauri::command]
pub fn cmd_config_get(key: String) -> Result<Value, String> {
    let config = Config::load_or_default();
    match config.get(&key) {
        Some(value) => Ok(Value::String(value)),
        None => Err(format!("unknown key: {key}")),
    }
}

#[tauri::command]
pub fn cmd_config_set(key: String, value: String) -> Result<(), String> {
    let mut config = Config::load_or_default();
    config.set(&key, &value).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cmd_config_list() -> Result<Value, String> {
    let config = Config::load_or_default();
    serde_json::to_value(config).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cmd_get_env(key: String) -> Option<String> {
    std::env::var(key).ok()
}

// ── Background poll loop ────────────────────────────────────────────

/// Validate the stored key once, then tick the scheduler forever. Polls are
/// strictly sequential: the next tick is consumed only after the previous
/// poll released the lock.
pub fn spawn_poll_loop(handle: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let state = handle.state::<PollerState>();

        {
            let mut poller = state.0.lock().await;
            if let Err(e) = poller.validate_stored().await {
                tracing::warn!("startup key validation failed: {e}");
            }
        }

        let interval = {
            let poller = state.0.lock().await;
            poller.config().polling.interval_seconds
        };
        let mut scheduler = PollScheduler::new(interval);
        tracing::info!(interval_seconds = interval, "poll loop started");

        loop {
            let now = Utc::now();
            if scheduler.due(now) {
                let outcome = {
                    let mut poller = state.0.lock().await;
                    poller.poll(&chrono::Local::now(), false).await
                };
                if let Err(e) = handle.emit("approval-status-changed", &outcome) {
                    tracing::warn!("status event emit failed: {e}");
                }
                scheduler.mark_ran(Utc::now());
            }
            let pause = scheduler.sleep_duration(Utc::now());
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
    });
}
