use clap::Subcommand;
use clockwatch_core::{presenter, ApprovalPoller, Config, CredentialStore, KeyringStore, LogNotifier, ValidationState};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Validate an API key against Clockify and store it in the OS keyring
    Login {
        /// The Clockify API key
        #[arg(long)]
        key: String,
    },
    /// Remove the stored API key
    Logout,
    /// Check whether the stored API key is still accepted
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut poller = ApprovalPoller::new(Config::load_or_default(), KeyringStore, LogNotifier);
    match action {
        AuthAction::Login { key } => {
            let state = super::block_on(async { poller.validate(&key).await })??;
            println!("{}", presenter::key_display(state).label);
            if state != ValidationState::Valid {
                return Err("API key rejected; nothing stored".into());
            }
        }
        AuthAction::Logout => {
            poller.clear_key()?;
            println!("API key removed");
        }
        AuthAction::Status => {
            if poller.store().get()?.is_none() {
                println!("no API key stored");
                return Ok(());
            }
            let state = super::block_on(async { poller.validate_stored().await })??;
            println!("{}", presenter::key_display(state).label);
        }
    }
    Ok(())
}
