//! Clockify REST client -- the two endpoints the watcher needs.
//!
//! One GET against the identity endpoint to validate a key and learn the
//! workspace/user ids, and one GET against the approval-status endpoint per
//! poll. No retry, no backoff; the client-default timeout applies.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{CoreError, Result};

const API_KEY_HEADER: &str = "X-Api-Key";

/// Identity response. The workspace and user ids are cached by the poller
/// for the lifetime of a validated key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub default_workspace: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDateRange {
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

/// Approval-status response. `status` is `null` when no approval request
/// exists for the period; the remaining fields are optional summaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_range: Option<RemoteDateRange>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub approved_count: Option<u32>,
    #[serde(default)]
    pub entries_count: Option<u32>,
}

pub struct ClockifyClient {
    http: Client,
    /// Identity endpoint base, e.g. `https://api.clockify.me/api/v1`.
    api_base: String,
    /// Approval endpoint base, e.g. `https://app.clockify.me/api`.
    app_base: String,
}

impl ClockifyClient {
    pub fn new(api_base: impl Into<String>, app_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: trim_base(api_base.into()),
            app_base: trim_base(app_base.into()),
        }
    }

    /// `GET /user` -- succeeds iff the key is accepted and the body carries
    /// the id fields.
    pub async fn current_user(&self, api_key: &str) -> Result<UserInfo> {
        let url = format!("{}/user", self.api_base);
        let resp = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(CoreError::Api {
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// `GET /workspaces/{w}/users/{u}/approval-requests/status?start=...`
    pub async fn approval_status(
        &self,
        api_key: &str,
        workspace_id: &str,
        user_id: &str,
        period_start: &DateTime<Utc>,
    ) -> Result<ApprovalStatusResponse> {
        let url = format!(
            "{}/workspaces/{}/users/{}/approval-requests/status",
            self.app_base, workspace_id, user_id
        );
        let start = period_start.to_rfc3339_opts(SecondsFormat::Millis, true);
        let resp = self
            .http
            .get(&url)
            .query(&[("start", start.as_str())])
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(CoreError::Api {
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
