//! Per-process session state owned by the poller.
//!
//! Everything the dashboard needs lives here: the credential's validation
//! state, the workspace/user identity cached at validation time, and the
//! outcome of the last real poll. There is deliberately no module-level
//! mutable state; the poller passes this struct around explicitly.

use serde::{Deserialize, Serialize};

use crate::approval::{ApprovalStatus, ReportingPeriod, StatusInfo};

/// Whether the stored credential has been confirmed against the remote
/// service. Polling is only permitted in the `Valid` state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    #[default]
    Unvalidated,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub validation: ValidationState,
    /// The validated key, cached so polls need no store read.
    /// Skipped in snapshots -- the key never leaves the core.
    #[serde(skip)]
    api_key: Option<String>,
    pub workspace_id: Option<String>,
    pub user_id: Option<String>,
    pub last_status: ApprovalStatus,
    pub last_period: Option<ReportingPeriod>,
    pub last_info: Option<StatusInfo>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Re-entry on every key save: `Valid -> Unvalidated` until the identity
    /// call settles.
    pub(crate) fn begin_validation(&mut self) {
        self.validation = ValidationState::Unvalidated;
        self.api_key = None;
        self.workspace_id = None;
        self.user_id = None;
    }

    pub(crate) fn mark_valid(&mut self, api_key: &str, workspace_id: String, user_id: String) {
        self.validation = ValidationState::Valid;
        self.api_key = Some(api_key.to_string());
        self.workspace_id = Some(workspace_id);
        self.user_id = Some(user_id);
    }

    pub(crate) fn mark_invalid(&mut self) {
        self.validation = ValidationState::Invalid;
        self.api_key = None;
        self.workspace_id = None;
        self.user_id = None;
    }

    /// Record the outcome of a completed poll attempt for display.
    pub(crate) fn record(
        &mut self,
        status: ApprovalStatus,
        period: Option<ReportingPeriod>,
        info: Option<StatusInfo>,
    ) {
        self.last_status = status;
        self.last_period = period;
        self.last_info = info;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_never_contains_the_api_key() {
        let mut session = SessionState::new();
        session.mark_valid("ck_secret", "w1".into(), "u1".into());
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("ck_secret"));
        assert!(json.contains("w1"));
    }

    #[test]
    fn begin_validation_drops_cached_identity() {
        let mut session = SessionState::new();
        session.mark_valid("ck_secret", "w1".into(), "u1".into());
        session.begin_validation();
        assert_eq!(session.validation, ValidationState::Unvalidated);
        assert!(session.api_key().is_none());
        assert!(session.workspace_id.is_none());
        assert!(session.user_id.is_none());
    }
}
