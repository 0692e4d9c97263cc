//! Transport controls and raw remote-button commands.

use bravia_api::BraviaClient;

use crate::cli::{GlobalOpts, MediaArgs, MediaCommand, PressArgs};
use crate::error::CliError;
use crate::output::{self, NamedValue};

pub async fn handle(
    client: &mut BraviaClient,
    args: MediaArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MediaCommand::Play => client.media_play().await?,
        MediaCommand::Pause => client.media_pause().await?,
        MediaCommand::Stop => client.media_stop().await?,
        MediaCommand::Next => client.media_next_track().await?,
        MediaCommand::Prev => client.media_previous_track().await?,
    }
    output::print_done(&format!("{:?} sent", args.command), global.quiet);
    Ok(())
}

/// `bravia command <name>`: press one button from the catalog.
pub async fn press(
    client: &mut BraviaClient,
    args: PressArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if client.get_command_code(&args.name).await?.is_none() {
        return Err(CliError::NotFound {
            resource_type: "command".into(),
            identifier: args.name,
            list_command: "commands".into(),
        });
    }
    client.send_command(&args.name).await?;
    output::print_done(&format!("{} sent", args.name), global.quiet);
    Ok(())
}

/// `bravia commands`: the TV's button catalog.
pub async fn list(client: &mut BraviaClient, global: &GlobalOpts) -> Result<(), CliError> {
    let rows = NamedValue::from_map(client.refresh_commands().await?);
    let out = output::render_list(&global.output, &rows, Clone::clone, |r| r.name.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
