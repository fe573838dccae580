//! Integration tests for the approval poller against a mocked Clockify API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use clockwatch_core::{
    ApprovalPoller, ApprovalStatus, Config, CredentialStore, MemoryStore, Notifier,
    ValidationState,
};
use mockito::{Matcher, Server, ServerGuard};

#[derive(Default)]
struct CountingNotifier(AtomicUsize);

impl CountingNotifier {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Notifier for CountingNotifier {
    fn notify(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    server: ServerGuard,
    poller: ApprovalPoller<Arc<MemoryStore>, Arc<CountingNotifier>>,
    store: Arc<MemoryStore>,
    notifier: Arc<CountingNotifier>,
}

async fn harness(tune: impl FnOnce(&mut Config)) -> Harness {
    let server = Server::new_async().await;
    let mut config = Config::default();
    config.api.base_url = server.url();
    config.api.app_base_url = server.url();
    tune(&mut config);

    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(CountingNotifier::default());
    let poller = ApprovalPoller::new(config, Arc::clone(&store), Arc::clone(&notifier));
    Harness {
        server,
        poller,
        store,
        notifier,
    }
}

fn user_body() -> &'static str {
    r#"{"id": "user-1", "defaultWorkspace": "ws-1", "email": "dev@example.com"}"#
}

/// 2024-01-15 was a Monday, the default validation day.
fn monday() -> DateTime<Utc> {
    "2024-01-15T09:00:00Z".parse().unwrap()
}

fn tuesday() -> DateTime<Utc> {
    "2024-01-16T09:00:00Z".parse().unwrap()
}

#[tokio::test]
async fn validate_success_caches_identity_and_persists_key() {
    let mut h = harness(|_| {}).await;
    let mock = h
        .server
        .mock("GET", "/user")
        .match_header("x-api-key", "ck_good")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_body())
        .create_async()
        .await;

    let state = h.poller.validate("ck_good").await.unwrap();
    mock.assert_async().await;

    assert_eq!(state, ValidationState::Valid);
    assert_eq!(h.store.get().unwrap().as_deref(), Some("ck_good"));
    let session = h.poller.session();
    assert_eq!(session.workspace_id.as_deref(), Some("ws-1"));
    assert_eq!(session.user_id.as_deref(), Some("user-1"));
}

#[tokio::test]
async fn validate_rejection_clears_the_stored_key() {
    let mut h = harness(|_| {}).await;
    h.store.save("ck_stale").unwrap();
    let _mock = h
        .server
        .mock("GET", "/user")
        .with_status(401)
        .with_body(r#"{"message": "Api key does not exist"}"#)
        .create_async()
        .await;

    let state = h.poller.validate("bad-key").await.unwrap();

    assert_eq!(state, ValidationState::Invalid);
    assert_eq!(h.store.get().unwrap(), None);
    assert!(h.poller.session().workspace_id.is_none());
}

#[tokio::test]
async fn validate_stored_with_empty_store_stays_unvalidated() {
    let mut h = harness(|_| {}).await;
    let state = h.poller.validate_stored().await.unwrap();
    assert_eq!(state, ValidationState::Unvalidated);
    assert!(!h.poller.should_poll(&monday(), true));
}

async fn validated(h: &mut Harness) {
    let _mock = h
        .server
        .mock("GET", "/user")
        .with_status(200)
        .with_body(user_body())
        .create_async()
        .await;
    let state = h.poller.validate("ck_good").await.unwrap();
    assert_eq!(state, ValidationState::Valid);
}

#[tokio::test]
async fn null_status_notifies_once_and_resolves_not_submitted() {
    let mut h = harness(|_| {}).await;
    validated(&mut h).await;

    let mock = h
        .server
        .mock("GET", "/workspaces/ws-1/users/user-1/approval-requests/status")
        .match_query(Matcher::Any)
        .match_header("x-api-key", "ck_good")
        .with_status(200)
        .with_body(r#"{"status": null}"#)
        .create_async()
        .await;

    let outcome = h.poller.poll(&monday(), false).await;
    mock.assert_async().await;

    assert_eq!(outcome.status, ApprovalStatus::NotSubmitted);
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.poller.session().last_status, ApprovalStatus::NotSubmitted);
    // The computed period is reported even when the remote omits its range.
    assert!(outcome.period.is_some());
    assert!(outcome.info.is_none());
}

#[tokio::test]
async fn repeated_not_submitted_polls_renotify() {
    let mut h = harness(|_| {}).await;
    validated(&mut h).await;

    let _mock = h
        .server
        .mock("GET", "/workspaces/ws-1/users/user-1/approval-requests/status")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": null}"#)
        .expect(2)
        .create_async()
        .await;

    h.poller.poll(&monday(), false).await;
    h.poller.poll(&monday(), false).await;
    assert_eq!(h.notifier.count(), 2);
}

#[tokio::test]
async fn off_day_poll_makes_no_network_call() {
    let mut h = harness(|_| {}).await;
    validated(&mut h).await;

    let mock = h
        .server
        .mock("GET", "/workspaces/ws-1/users/user-1/approval-requests/status")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let outcome = h.poller.poll(&tuesday(), false).await;
    mock.assert_async().await;

    assert_eq!(outcome.status, ApprovalStatus::Unknown);
    assert!(outcome.period.is_none());
    assert!(outcome.info.is_none());
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn forced_poll_ignores_the_weekday_gate() {
    let mut h = harness(|_| {}).await;
    validated(&mut h).await;

    let _mock = h
        .server
        .mock("GET", "/workspaces/ws-1/users/user-1/approval-requests/status")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "APPROVED"}"#)
        .create_async()
        .await;

    let outcome = h.poller.poll(&tuesday(), true).await;
    assert_eq!(outcome.status, ApprovalStatus::Approved);
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn pending_response_carries_period_and_totals() {
    let mut h = harness(|_| {}).await;
    validated(&mut h).await;

    let _mock = h
        .server
        .mock("GET", "/workspaces/ws-1/users/user-1/approval-requests/status")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "status": "PENDING",
                "dateRange": {"start": "2024-01-07T00:00:00Z", "end": "2024-01-13T23:59:59Z"},
                "total": "40H",
                "approvedCount": 3,
                "entriesCount": 5
            }"#,
        )
        .create_async()
        .await;

    let outcome = h.poller.poll(&monday(), false).await;

    assert_eq!(outcome.status, ApprovalStatus::Pending);
    let period = outcome.period.unwrap();
    assert_eq!(period.start, "2024-01-07T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    assert!(period.end.is_some());
    let info = outcome.info.unwrap();
    assert_eq!(info.total, "40H");
    assert_eq!(info.approved_count, 3);
    assert_eq!(info.entries_count, 5);
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn server_error_collapses_to_unknown_without_retry() {
    let mut h = harness(|_| {}).await;
    validated(&mut h).await;

    let mock = h
        .server
        .mock("GET", "/workspaces/ws-1/users/user-1/approval-requests/status")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let outcome = h.poller.poll(&monday(), false).await;
    mock.assert_async().await;

    assert_eq!(outcome.status, ApprovalStatus::Unknown);
    assert!(outcome.period.is_none());
    assert_eq!(h.poller.session().last_status, ApprovalStatus::Unknown);
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn custom_start_date_is_sent_as_utc_midnight() {
    let mut h = harness(|cfg| {
        cfg.polling.custom_start_date = NaiveDate::from_ymd_opt(2023, 5, 1);
    })
    .await;
    validated(&mut h).await;

    let mock = h
        .server
        .mock("GET", "/workspaces/ws-1/users/user-1/approval-requests/status")
        .match_query(Matcher::UrlEncoded(
            "start".into(),
            "2023-05-01T00:00:00.000Z".into(),
        ))
        .with_status(200)
        .with_body(r#"{"status": "APPROVED"}"#)
        .create_async()
        .await;

    let outcome = h.poller.poll(&monday(), false).await;
    mock.assert_async().await;
    assert_eq!(outcome.status, ApprovalStatus::Approved);
}

#[tokio::test]
async fn should_poll_matrix_over_all_weekdays() {
    for day in 0u8..7 {
        let mut h = harness(|cfg| {
            cfg.polling.validation_day = day;
        })
        .await;
        validated(&mut h).await;

        // 2024-01-14 was a Sunday; walk one full week.
        for offset in 0..7 {
            let now = "2024-01-14T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
                + Duration::days(offset);
            let matches = now.weekday().num_days_from_sunday() == u32::from(day);
            assert_eq!(h.poller.should_poll(&now, false), matches);
            assert!(h.poller.should_poll(&now, true));
        }
    }
}

#[tokio::test]
async fn disabled_notifications_suppress_the_notifier() {
    let mut h = harness(|cfg| {
        cfg.notifications.enabled = false;
    })
    .await;
    validated(&mut h).await;

    let _mock = h
        .server
        .mock("GET", "/workspaces/ws-1/users/user-1/approval-requests/status")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": null}"#)
        .create_async()
        .await;

    let outcome = h.poller.poll(&monday(), false).await;
    assert_eq!(outcome.status, ApprovalStatus::NotSubmitted);
    assert_eq!(h.notifier.count(), 0);
}
