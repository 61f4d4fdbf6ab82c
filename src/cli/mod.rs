//! CLI module for pokesocial.
//!
//! - Argument parsing
//! - Version display
//! - Read-only commands over the hosted backend
//!
//! # Usage
//!
//! ```ignore
//! use pokesocial::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! let output = run_cli_command(command).await?;
//! print!("{}", output);
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use std::sync::Arc;

use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::adapters::rest::BackendClient;
use crate::config::BackendConfig;
use crate::models::UserIdentity;
use crate::session::SessionProvider;

/// Run a parsed command and return what to print.
pub async fn run_cli_command(command: CliCommand) -> Result<String> {
    match command {
        CliCommand::Version => Ok(format!("{}\n", version_line())),
        CliCommand::Help => Ok(format!("{}\n", USAGE)),
        CliCommand::Invalid(message) => Err(eyre!("{}\n\n{}", message, USAGE)),
        CliCommand::Pokedex { region, term } => {
            let client = connect()?;
            commands::pokedex(client, region.as_deref(), term.as_deref()).await
        }
        CliCommand::Feed => {
            let client = connect()?;
            commands::feed(client, None).await
        }
        CliCommand::Profile { email } => {
            let client = connect()?;
            let user = sign_in(&client, &email).await?;
            commands::profile(client, &user).await
        }
        CliCommand::Users { email } => {
            let client = connect()?;
            let user = sign_in(&client, &email).await?;
            commands::users(client, &user).await
        }
    }
}

fn connect() -> Result<Arc<BackendClient>> {
    let config = BackendConfig::from_env().wrap_err("Backend is not configured")?;
    Ok(Arc::new(BackendClient::from_config(&config)))
}

async fn sign_in(client: &Arc<BackendClient>, email: &str) -> Result<UserIdentity> {
    let password = rpassword::prompt_password("Password: ").wrap_err("Could not read password")?;
    let session = SessionProvider::new(client.clone());
    commands::sign_in(&session, email, &password).await
}
