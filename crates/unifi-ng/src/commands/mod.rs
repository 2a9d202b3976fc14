//! Command dispatch: bridges CLI args -> session calls -> output formatting.

pub mod clients;
pub mod config_cmd;
pub mod devices;
pub mod firewall;
pub mod groups;
pub mod reservations;
pub mod sites;
pub mod util;

use unifi_ng_api::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command. The session is already logged in.
pub async fn dispatch(
    cmd: Command,
    session: &mut Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(session, args, global).await,
        Command::Clients(args) => clients::handle(session, args, global).await,
        Command::Firewall(args) => firewall::handle(session, args, global).await,
        Command::Reservations(args) => reservations::handle(session, args, global).await,
        Command::Groups(args) => groups::handle(session, args, global).await,
        Command::Sites(args) => sites::handle(session, args, global).await,
        // Config and Completions are handled before login
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
