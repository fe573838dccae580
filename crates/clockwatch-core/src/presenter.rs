//! Pure mapping from poll results to display strings and CSS classes.
//! No network, no state -- the shells render whatever comes out of here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::approval::{ApprovalStatus, ReportingPeriod, StatusInfo};
use crate::session::ValidationState;

/// One display cell: the CSS class the dashboard attaches and the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub css_class: &'static str,
    pub label: String,
}

impl StatusDisplay {
    fn new(css_class: &'static str, label: impl Into<String>) -> Self {
        Self {
            css_class,
            label: label.into(),
        }
    }
}

/// Every [`ApprovalStatus`] variant maps to exactly one class/label pair.
pub fn status_display(status: &ApprovalStatus) -> StatusDisplay {
    match status {
        ApprovalStatus::Unknown => StatusDisplay::new("status-unknown", "UNKNOWN"),
        ApprovalStatus::NotSubmitted => StatusDisplay::new("status-null", "NOT SUBMITTED"),
        ApprovalStatus::Pending => StatusDisplay::new("status-pending", "PENDING APPROVAL"),
        ApprovalStatus::Approved => StatusDisplay::new("status-approved", "APPROVED"),
        ApprovalStatus::Other(s) if s.is_empty() => StatusDisplay::new("status-other", "UNKNOWN"),
        ApprovalStatus::Other(s) => StatusDisplay::new("status-other", s.clone()),
    }
}

/// API key line on the settings page.
pub fn key_display(state: ValidationState) -> StatusDisplay {
    match state {
        ValidationState::Unvalidated => StatusDisplay::new("status-unknown", "Checking API key..."),
        ValidationState::Valid => StatusDisplay::new("status-valid", "API key is valid"),
        ValidationState::Invalid => StatusDisplay::new("status-invalid", "API key is invalid"),
    }
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y %H:%M").to_string()
}

/// Human date range, e.g. `Period: Jan 1, 2023 00:00 - Jan 7, 2023 23:59`.
/// The end is omitted when the remote response had none.
pub fn format_period(period: &ReportingPeriod) -> String {
    match &period.end {
        Some(end) => format!(
            "Period: {} - {}",
            format_timestamp(&period.start),
            format_timestamp(end)
        ),
        None => format!("Period: {}", format_timestamp(&period.start)),
    }
}

/// Summary line, e.g. `Total Hours: 40H | Approved Entries: 5/5`.
pub fn format_status_info(info: &StatusInfo) -> String {
    format!(
        "Total Hours: {} | Approved Entries: {}/{}",
        info.total, info.approved_count, info.entries_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_maps_to_one_pair() {
        let cases = [
            (ApprovalStatus::Unknown, "status-unknown", "UNKNOWN"),
            (ApprovalStatus::NotSubmitted, "status-null", "NOT SUBMITTED"),
            (ApprovalStatus::Pending, "status-pending", "PENDING APPROVAL"),
            (ApprovalStatus::Approved, "status-approved", "APPROVED"),
            (
                ApprovalStatus::Other("WITHDRAWN".into()),
                "status-other",
                "WITHDRAWN",
            ),
        ];
        for (status, class, label) in cases {
            let display = status_display(&status);
            assert_eq!(display.css_class, class);
            assert_eq!(display.label, label);
        }
    }

    #[test]
    fn empty_other_status_falls_back_to_unknown_label() {
        let display = status_display(&ApprovalStatus::Other(String::new()));
        assert_eq!(display.css_class, "status-other");
        assert_eq!(display.label, "UNKNOWN");
    }

    #[test]
    fn key_display_covers_all_validation_states() {
        assert_eq!(
            key_display(ValidationState::Unvalidated).label,
            "Checking API key..."
        );
        assert_eq!(
            key_display(ValidationState::Valid),
            StatusDisplay::new("status-valid", "API key is valid")
        );
        assert_eq!(
            key_display(ValidationState::Invalid).css_class,
            "status-invalid"
        );
    }

    #[test]
    fn period_formats_with_and_without_end() {
        let period = ReportingPeriod {
            start: "2023-01-01T00:00:00Z".parse().unwrap(),
            end: Some("2023-01-07T23:59:59Z".parse().unwrap()),
        };
        assert_eq!(
            format_period(&period),
            "Period: Jan 1, 2023 00:00 - Jan 7, 2023 23:59"
        );

        let open = ReportingPeriod {
            start: period.start,
            end: None,
        };
        assert_eq!(format_period(&open), "Period: Jan 1, 2023 00:00");
    }

    #[test]
    fn status_info_summary_line() {
        let info = StatusInfo {
            total: "40H".into(),
            approved_count: 5,
            entries_count: 5,
        };
        assert_eq!(
            format_status_info(&info),
            "Total Hours: 40H | Approved Entries: 5/5"
        );
    }
}
