//! Task-store credential management.
//!
//! The hosted store authenticates with a bearer token minted by the web
//! app; the CLI only persists it to the OS keyring and reports whether
//! one is present.

use clap::Subcommand;
use hearth_core::store::keyring_store;
use hearth_core::RestListStore;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the task-store bearer token
    Login {
        /// Token issued for the configured principal
        #[arg(long)]
        token: String,
    },
    /// Remove the stored token
    Logout,
    /// Check whether a token is stored
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { token } => {
            keyring_store::set(RestListStore::token_key(), &token)?;
            println!("token stored");
        }
        AuthAction::Logout => {
            keyring_store::delete(RestListStore::token_key())?;
            println!("token removed");
        }
        AuthAction::Status => {
            match keyring_store::get(RestListStore::token_key())? {
                Some(_) => println!("authenticated"),
                None => println!("not authenticated"),
            }
        }
    }
    Ok(())
}
