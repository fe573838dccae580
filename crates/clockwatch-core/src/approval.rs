//! Approval-status domain types and the reporting-period rule.
//!
//! The reporting window is the "Sunday before last": find the most recent
//! Sunday relative to `now` (counting `now` itself as a full week back when
//! `now` is a Sunday), then step back seven more days. The result is always
//! a Sunday at local midnight.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a timesheet approval request, derived from the remote
/// `status` field on every poll. Never persisted; the last value is held in
/// memory for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// No poll has run, or the last poll failed or was skipped.
    #[default]
    Unknown,
    /// The remote reported a `null` status: no approval request exists.
    NotSubmitted,
    /// Approval request submitted, awaiting review.
    Pending,
    /// Approval request accepted.
    Approved,
    /// Any other status string the remote may introduce.
    Other(String),
}

impl ApprovalStatus {
    /// Map the `status` field of a successful response. `None` here means
    /// the field was `null` -- the timesheet was never submitted.
    pub fn classify(remote: Option<&str>) -> Self {
        match remote {
            None => ApprovalStatus::NotSubmitted,
            Some("PENDING") => ApprovalStatus::Pending,
            Some("APPROVED") => ApprovalStatus::Approved,
            Some(other) => ApprovalStatus::Other(other.to_string()),
        }
    }
}

/// The week-long window whose approval status is queried.
/// `end` is absent when the remote response omits its date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// Entry totals reported alongside the approval status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub total: String,
    pub approved_count: u32,
    pub entries_count: u32,
}

/// Compute the start of the reporting window.
///
/// A fixed override wins unconditionally and is normalized to midnight UTC.
/// Otherwise: `diff_to_last_sunday` is 7 when `now` is a Sunday, else the
/// weekday index; the start is `now - 7 - diff_to_last_sunday` days at local
/// midnight, converted to UTC for the wire.
pub fn compute_period_start<Tz: TimeZone>(
    custom: Option<NaiveDate>,
    now: &DateTime<Tz>,
) -> DateTime<Utc> {
    if let Some(date) = custom {
        return Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    }

    let day = i64::from(now.weekday().num_days_from_sunday());
    let diff_to_last_sunday = if day == 0 { 7 } else { day };
    let start_date = now.date_naive() - Duration::days(7 + diff_to_last_sunday);
    let midnight = start_date.and_time(NaiveTime::MIN);

    match now.timezone().from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // DST fold: take the earlier instant.
        LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&midnight),
    }
}

/// Whether `now` falls on the configured validation weekday (0 = Sunday).
pub fn is_validation_day<Tz: TimeZone>(validation_day: u8, now: &DateTime<Tz>) -> bool {
    now.weekday().num_days_from_sunday() == u32::from(validation_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn classify_covers_remote_statuses() {
        assert_eq!(ApprovalStatus::classify(None), ApprovalStatus::NotSubmitted);
        assert_eq!(
            ApprovalStatus::classify(Some("PENDING")),
            ApprovalStatus::Pending
        );
        assert_eq!(
            ApprovalStatus::classify(Some("APPROVED")),
            ApprovalStatus::Approved
        );
        assert_eq!(
            ApprovalStatus::classify(Some("WITHDRAWN")),
            ApprovalStatus::Other("WITHDRAWN".into())
        );
    }

    #[test]
    fn custom_start_date_wins_and_is_utc_midnight() {
        let custom = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        for now in ["2024-01-03T15:30:00Z", "2023-05-02T00:00:00Z"] {
            let start = compute_period_start(Some(custom), &utc(now));
            assert_eq!(start, utc("2023-05-01T00:00:00Z"));
        }
    }

    #[test]
    fn wednesday_maps_to_sunday_ten_days_back() {
        // 2024-01-17 is a Wednesday; diff_to_last_sunday = 3, so the period
        // starts 10 days earlier on Sunday 2024-01-07.
        let now = utc("2024-01-17T09:00:00Z");
        assert_eq!(now.weekday(), Weekday::Wed);
        let start = compute_period_start(None, &now);
        assert_eq!(start, utc("2024-01-07T00:00:00Z"));
    }

    #[test]
    fn sunday_steps_back_two_full_weeks() {
        let now = utc("2024-01-14T12:00:00Z");
        assert_eq!(now.weekday(), Weekday::Sun);
        let start = compute_period_start(None, &now);
        assert_eq!(start, utc("2023-12-31T00:00:00Z"));
    }

    #[test]
    fn validation_day_matches_weekday_index() {
        let monday = utc("2024-01-15T08:00:00Z");
        assert!(is_validation_day(1, &monday));
        assert!(!is_validation_day(0, &monday));
        assert!(!is_validation_day(2, &monday));
    }

    proptest! {
        #[test]
        fn period_start_is_a_past_sunday(days in 0i64..20_000, secs in 0i64..86_400) {
            let now = utc("1995-01-01T00:00:00Z")
                + Duration::days(days)
                + Duration::seconds(secs);
            let start = compute_period_start(None, &now);
            prop_assert_eq!(start.weekday(), Weekday::Sun);
            prop_assert!(start <= now - Duration::days(7));
            prop_assert_eq!(start.time(), NaiveTime::MIN);
            // Idempotent for a fixed `now`.
            prop_assert_eq!(start, compute_period_start(None, &now));
        }
    }
}
