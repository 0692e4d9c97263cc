//! Power command handlers.

use tracing::warn;

use crate::cli::{GlobalOpts, PowerArgs, PowerCommand};
use crate::error::CliError;
use crate::output;

use super::util::Connection;

pub async fn handle(
    conn: &mut Connection,
    args: PowerArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PowerCommand::On => {
            // Wake first: a sleeping set only answers registration once up.
            if conn.client.mac().is_some() {
                if let Err(e) = conn.client.wake().await {
                    warn!(error = %e, "wake-on-lan broadcast failed");
                }
            }
            // Registration may still fail; turn_on retries over IRCC.
            if !conn.authenticate().await? {
                warn!(host = %conn.target.host, "TV did not accept registration, trying anyway");
            }
            conn.client.turn_on().await?;
            output::print_done("Power on sent", global.quiet);
            Ok(())
        }

        PowerCommand::Off => {
            conn.client.turn_off().await?;
            output::print_done("Power off sent", global.quiet);
            Ok(())
        }

        PowerCommand::Status => {
            let status = conn.client.get_power_status().await?;
            let out = output::render_single(
                &global.output,
                &status,
                |s| format!("Power:     {s}"),
                ToString::to_string,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
