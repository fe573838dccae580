//! Notification seam between the poller and the platform shells.

/// Title shown on popups and native notifications.
pub const NOTIFICATION_TITLE: &str = "Clockwatch";

/// Fixed message fired when the timesheet was not submitted.
pub const NOTIFICATION_BODY: &str = "Houla! Ta feuille de temps n'est pas soumise";

/// Fired by the poller whenever a poll resolves to "not submitted".
/// Firing is not deduplicated across polls; shells are responsible for
/// their own re-entry rules (the desktop dialog keeps at most one open).
pub trait Notifier: Send + Sync {
    fn notify(&self);
}

/// Notifier that only writes to the log. Used by the CLI `status` command
/// and as a fallback when native notifications are disabled.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self) {
        tracing::warn!("{NOTIFICATION_BODY}");
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self) {
        (**self).notify()
    }
}
