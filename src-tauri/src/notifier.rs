//! Native notification + modal popup notifier.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clockwatch_core::notify::{Notifier, NOTIFICATION_BODY, NOTIFICATION_TITLE};
use tauri::AppHandle;
use tauri_plugin_dialog::DialogExt;
use tauri_plugin_notification::NotificationExt;

/// Fires a native notification on every call and opens a modal popup,
/// keeping at most one popup outstanding: while a popup is open, further
/// calls only fire the notification. The notification itself is
/// deliberately not deduplicated.
pub struct DesktopNotifier {
    app: AppHandle,
    dialog_pending: Arc<AtomicBool>,
}

impl DesktopNotifier {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            dialog_pending: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self) {
        if let Err(e) = self
            .app
            .notification()
            .builder()
            .title(NOTIFICATION_TITLE)
            .body(NOTIFICATION_BODY)
            .show()
        {
            tracing::warn!("native notification failed: {e}");
        }

        if self.dialog_pending.swap(true, Ordering::SeqCst) {
            // Previous popup still open.
            return;
        }
        let pending = Arc::clone(&self.dialog_pending);
        self.app
            .dialog()
            .message(NOTIFICATION_BODY)
            .title(NOTIFICATION_TITLE)
            .show(move |_| {
                pending.store(false, Ordering::SeqCst);
            });
    }
}
