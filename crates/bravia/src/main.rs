mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

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
        // Config commands don't need a TV
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "bravia", &mut std::io::stdout());
            Ok(())
        }

        // Pairing registers without stored credentials
        Command::Pair(args) => commands::pair::handle(args, &cli.global).await,

        // Wake-on-LAN needs only the MAC, no session
        Command::Wake => {
            let cfg = config::load_config_or_default();
            let mac = config::resolve_mac(&cli.global, &cfg)?.ok_or(bravia_api::Error::MissingMac)?;
            bravia_api::wol::wake_on_lan(mac, bravia_api::wol::BROADCAST_TARGET).await?;
            output::print_done("Wake-on-LAN packets sent", cli.global.quiet);
            Ok(())
        }

        // All other commands talk to a registered TV
        cmd => {
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &cli.global).await
        }
    }
}
