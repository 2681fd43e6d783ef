//! `eventhub-client` — drive the session from a terminal.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;

use eventhub_client::{ClientConfig, FileCredentialStore, Session};

/// Event planner client session tool.
#[derive(Parser, Debug)]
#[command(name = "eventhub-client", about = "Event planner client session tool")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store the token returned by a successful login.
    Login {
        /// Bearer token.
        token: String,
    },
    /// Forget the stored credential.
    Logout,
    /// Show the signed-in identity.
    Whoami,
    /// Decide where an attempt to open a route ends up.
    Navigate {
        /// Route path, e.g. `/admin/dashboard`.
        route: String,
    },
    /// Report the HTTP status of a backend call.
    ApiStatus {
        /// HTTP status code.
        code: u16,
    },
    /// List the route authorization rules in effect.
    Routes,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    eventhub_observability::init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("failed to load client configuration")?;
    tracing::debug!(path = %config.credential_path.display(), routes = config.routes.len(), "configuration loaded");

    let session = Session::new(FileCredentialStore::new(&config.credential_path), config.routes);
    let now = Utc::now();

    match cli.command {
        Command::Login { token } => {
            let identity = session.login(token, now).context("login rejected")?;
            print_json(&identity)?;
        }
        Command::Logout => {
            session.logout().context("logout failed")?;
        }
        Command::Whoami => {
            let identity = session.current_identity(now).context("no usable identity")?;
            print_json(&identity)?;
        }
        Command::Navigate { route } => {
            print_json(&session.navigate(&route, now))?;
        }
        Command::ApiStatus { code } => {
            let navigation = session
                .handle_api_status(code)
                .context("failed to sign out after rejected credential")?;
            print_json(&navigation)?;
        }
        Command::Routes => {
            print_json(session.guard().routes())?;
        }
    }

    Ok(())
}
