mod cli;
mod commands;
mod config;
mod error;
mod import;
mod output;
mod sync;

use clap::{CommandFactory, FromArgMatches};
use tracing_subscriber::EnvFilter;

use unifi_ng_api::Session;

use crate::cli::{Cli, Command};
use crate::commands::util;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let matches = Cli::command().get_matches();
    let mut cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Config-file output format when no flag or env var picked one
    config::apply_output_default(
        &mut cli.global,
        &matches,
        &unifi_ng_config::load_config_or_default(),
    );

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "unifi-ng", &mut std::io::stdout());
            Ok(())
        }

        // All other commands require a logged-in session
        cmd => {
            let session_config = config::build_session_config(&cli.global)?;
            let mut session = Session::new(session_config);

            let pb = util::spinner("Logging in...", cli.global.quiet);
            let login = session.login().await;
            pb.finish_and_clear();
            login?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &mut session, &cli.global).await;

            if let Err(e) = session.logout().await {
                tracing::warn!("logout failed: {e}");
            }
            result
        }
    }
}
