use clap::Args;
use clockwatch_core::{
    presenter, ApprovalPoller, Config, KeyringStore, LogNotifier, ValidationState,
};

#[derive(Args)]
pub struct StatusArgs {
    /// Poll even when today is not the validation day
    #[arg(long)]
    pub force: bool,
    /// Print the raw poll outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    super::block_on(async {
        let mut poller = ApprovalPoller::new(Config::load_or_default(), KeyringStore, LogNotifier);

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

        let outcome = poller.poll(&chrono::Local::now(), args.force).await;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            println!("{}", presenter::status_display(&outcome.status).label);
            if let Some(period) = &outcome.period {
                println!("{}", presenter::format_period(period));
            }
            if let Some(info) = &outcome.info {
                println!("{}", presenter::format_status_info(info));
            }
        }
        Ok(())
    })?
}
