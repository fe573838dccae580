//! The approval poller: key validation, the weekday gate, and the one GET
//! per poll against the approval-status endpoint.
//!
//! ## Validation state machine
//!
//! ```text
//! Unvalidated --validate ok--> Valid
//! Unvalidated --validate err--> Invalid   (stored key is cleared)
//! Valid --save new key--> Unvalidated     (re-entry)
//! ```
//!
//! A poll runs only when `now` falls on the validation weekday (or `forced`
//! is set) and the session is `Valid`. Anything that goes wrong on the wire
//! is logged and collapses to `Unknown` -- no retry, no backoff, never fatal.

use chrono::{DateTime, TimeZone};

use crate::approval::{
    compute_period_start, is_validation_day, ApprovalStatus, ReportingPeriod, StatusInfo,
};
use crate::clockify::{ApprovalStatusResponse, ClockifyClient};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::CredentialError;
use crate::notify::Notifier;
use crate::session::{SessionState, ValidationState};
use serde::Serialize;

/// What one poll attempt resolved to. `Unknown` with empty fields when the
/// poll was skipped or failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollOutcome {
    pub status: ApprovalStatus,
    pub period: Option<ReportingPeriod>,
    pub info: Option<StatusInfo>,
}

impl PollOutcome {
    fn unknown() -> Self {
        Self {
            status: ApprovalStatus::Unknown,
            period: None,
            info: None,
        }
    }
}

pub struct ApprovalPoller<S: CredentialStore, N: Notifier> {
    config: Config,
    client: ClockifyClient,
    store: S,
    notifier: N,
    session: SessionState,
}

impl<S: CredentialStore, N: Notifier> ApprovalPoller<S, N> {
    pub fn new(config: Config, store: S, notifier: N) -> Self {
        let client = ClockifyClient::new(&config.api.base_url, &config.api.app_base_url);
        Self {
            config,
            client,
            store,
            notifier,
            session: SessionState::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Startup path: validate whatever key the store holds. With no stored
    /// key the session simply stays `Unvalidated`.
    pub async fn validate_stored(&mut self) -> Result<ValidationState, CredentialError> {
        match self.store.get()? {
            Some(key) => self.validate(&key).await,
            None => {
                self.session.begin_validation();
                Ok(ValidationState::Unvalidated)
            }
        }
    }

    /// Validate a key against the identity endpoint.
    ///
    /// Success persists the key and caches the workspace/user identity for
    /// later polls. Any non-success response or transport failure yields
    /// `Invalid` and clears the stored key -- single attempt, no retry.
    /// Store failures propagate.
    pub async fn validate(&mut self, api_key: &str) -> Result<ValidationState, CredentialError> {
        self.session.begin_validation();
        match self.client.current_user(api_key).await {
            Ok(user) => {
                self.store.save(api_key)?;
                tracing::info!(
                    workspace_id = %user.default_workspace,
                    user_id = %user.id,
                    "API key validated"
                );
                self.session
                    .mark_valid(api_key, user.default_workspace, user.id);
                Ok(ValidationState::Valid)
            }
            Err(e) => {
                tracing::warn!("API key validation failed: {e}");
                self.store.clear()?;
                self.session.mark_invalid();
                Ok(ValidationState::Invalid)
            }
        }
    }

    /// Drop the stored key and fall back to `Unvalidated`.
    /// Store failures propagate.
    pub fn clear_key(&mut self) -> Result<(), CredentialError> {
        self.store.clear()?;
        self.session.begin_validation();
        Ok(())
    }

    /// The weekday gate: `forced` or the configured validation day, and a
    /// validated credential.
    pub fn should_poll<Tz: TimeZone>(&self, now: &DateTime<Tz>, forced: bool) -> bool {
        (forced || is_validation_day(self.config.polling.validation_day, now))
            && self.session.validation == ValidationState::Valid
    }

    /// Run one poll attempt. Never fails: skipped and failed polls both
    /// resolve to `Unknown`. A `NotSubmitted` result signals the notifier
    /// exactly once per poll (re-notification across polls is deliberate).
    pub async fn poll<Tz: TimeZone>(&mut self, now: &DateTime<Tz>, forced: bool) -> PollOutcome {
        if !self.should_poll(now, forced) {
            tracing::debug!(forced, "poll skipped");
            return PollOutcome::unknown();
        }

        // should_poll guarantees Valid, which implies a cached identity.
        let (Some(key), Some(workspace_id), Some(user_id)) = (
            self.session.api_key().map(str::to_owned),
            self.session.workspace_id.clone(),
            self.session.user_id.clone(),
        ) else {
            tracing::warn!("valid session without cached identity, skipping poll");
            return PollOutcome::unknown();
        };

        let start = compute_period_start(self.config.polling.custom_start_date, now);
        let outcome = match self
            .client
            .approval_status(&key, &workspace_id, &user_id, &start)
            .await
        {
            Ok(resp) => self.resolve(resp, start),
            Err(e) => {
                tracing::warn!("approval status poll failed: {e}");
                PollOutcome::unknown()
            }
        };

        if outcome.status == ApprovalStatus::NotSubmitted && self.config.notifications.enabled {
            self.notifier.notify();
        }
        self.session.record(
            outcome.status.clone(),
            outcome.period.clone(),
            outcome.info.clone(),
        );
        outcome
    }

    fn resolve(
        &self,
        resp: ApprovalStatusResponse,
        computed_start: chrono::DateTime<chrono::Utc>,
    ) -> PollOutcome {
        let status = ApprovalStatus::classify(resp.status.as_deref());
        let period = match resp.date_range {
            Some(range) => ReportingPeriod {
                start: range.start,
                end: range.end,
            },
            None => ReportingPeriod {
                start: computed_start,
                end: None,
            },
        };
        let info = if resp.total.is_some()
            || resp.approved_count.is_some()
            || resp.entries_count.is_some()
        {
            Some(StatusInfo {
                total: resp.total.unwrap_or_else(|| "0".to_string()),
                approved_count: resp.approved_count.unwrap_or(0),
                entries_count: resp.entries_count.unwrap_or(0),
            })
        } else {
            None
        };
        tracing::info!(status = ?status, "poll resolved");
        PollOutcome {
            status,
            period: Some(period),
            info,
        }
    }
}
