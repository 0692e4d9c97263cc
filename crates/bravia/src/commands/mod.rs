//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod config_cmd;
pub mod content;
pub mod info;
pub mod media;
pub mod pair;
pub mod power;
pub mod util;
pub mod volume;

use crate::cli::{Command, GlobalOpts, PowerArgs, PowerCommand};
use crate::error::CliError;

use self::util::Connection;

/// Dispatch a TV-bound command to the appropriate handler.
///
/// Every command registers with the TV first, except `power on`: a set in
/// deep standby can't answer until Wake-on-LAN has done its job.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let mut conn = Connection::open(global)?;
    let host = conn.target.host.clone();

    let result = async {
        if !matches!(
            cmd,
            Command::Power(PowerArgs {
                command: PowerCommand::On
            })
        ) {
            conn.login().await?;
        }

        match cmd {
            Command::Power(args) => power::handle(&mut conn, args, global).await,
            Command::Volume(args) => volume::handle(&mut conn.client, args, global).await,
            Command::Sources(args) => content::sources(&mut conn.client, args, global).await,
            Command::Apps(args) => content::apps(&mut conn.client, args, global).await,
            Command::Scenes(args) => content::scenes(&mut conn.client, args, global).await,
            Command::Media(args) => media::handle(&mut conn.client, args, global).await,
            Command::Press(args) => media::press(&mut conn.client, args, global).await,
            Command::Commands => media::list(&mut conn.client, global).await,
            Command::Info(args) => info::handle(&mut conn.client, args, global).await,
            // Handled before dispatch
            Command::Pair(_) | Command::Wake | Command::Config(_) | Command::Completions(_) => {
                unreachable!()
            }
        }
    }
    .await;

    result.map_err(|e| e.with_host(&host))
}
