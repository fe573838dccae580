use chrono::Utc;
use clap::Args;
use clockwatch_core::{
    presenter, ApprovalPoller, Config, KeyringStore, LogNotifier, PollScheduler, ValidationState,
};

#[derive(Args)]
pub struct WatchArgs {
    /// Poll immediately on startup even off the validation day;
    /// later ticks respect the weekday gate again
    #[arg(long)]
    pub force_first: bool,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    super::block_on(async {
        let config = Config::load_or_default();
        let mut poller = ApprovalPoller::new(config, KeyringStore, LogNotifier);

        let state = poller.validate_stored().await?;
        if state != ValidationState::Valid {
            return Err::<(), Box<dyn std::error::Error>>(
                format!(
                    "{} -- run `clockwatch-cli auth login --key <KEY>`",
                    presenter::key_display(state).label
                )
                .into(),
            );
        }

        let mut scheduler = PollScheduler::new(poller.config().polling.interval_seconds);
        tracing::info!(
            interval_seconds = poller.config().polling.interval_seconds,
            "watch loop started"
        );

        // One tick at a time: the next tick is not consumed until the
        // previous poll has completed.
        let mut first_tick = true;
        loop {
            let now = Utc::now();
            if scheduler.due(now) {
                let forced = first_tick && args.force_first;
                first_tick = false;
                let outcome = poller.poll(&chrono::Local::now(), forced).await;
                tracing::info!(
                    status = %presenter::status_display(&outcome.status).label,
                    "tick"
                );
                scheduler.mark_ran(Utc::now());
            }
            let pause = scheduler.sleep_duration(Utc::now());
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
    })?
}
