//! # Clockwatch Core Library
//!
//! Core logic for Clockwatch, a tray companion that checks whether the
//! week's Clockify timesheet approval request was submitted and nags when
//! it wasn't. All operations are available through a standalone CLI binary;
//! the Tauri desktop application is a thin shell over this same library.
//!
//! ## Key components
//!
//! - [`Config`]: TOML configuration with environment overrides
//! - [`CredentialStore`]: OS-keyring persistence for the single API key
//! - [`ApprovalPoller`]: validation state machine and the weekly poll
//! - [`PollScheduler`]: wall-clock tick source driven by the caller
//! - [`presenter`]: pure status-to-display mapping for the dashboard

pub mod approval;
pub mod clockify;
pub mod config;
pub mod credentials;
pub mod error;
pub mod notify;
pub mod poller;
pub mod presenter;
pub mod scheduler;
pub mod session;

pub use approval::{
    compute_period_start, is_validation_day, ApprovalStatus, ReportingPeriod, StatusInfo,
};
pub use clockify::{ApprovalStatusResponse, ClockifyClient, UserInfo};
pub use config::Config;
pub use credentials::{CredentialStore, KeyringStore, MemoryStore};
pub use error::{ConfigError, CoreError, CredentialError, Result};
pub use notify::{LogNotifier, Notifier};
pub use poller::{ApprovalPoller, PollOutcome};
pub use scheduler::PollScheduler;
pub use session::{SessionState, ValidationState};
