//! System and now-playing information.

use bravia_api::{BraviaClient, PlayingContent, SystemInfo};

use crate::cli::{GlobalOpts, InfoArgs, InfoCommand};
use crate::error::CliError;
use crate::output;

fn system_detail(s: &SystemInfo) -> String {
    output::detail_lines([
        ("Name", s.name.clone()),
        ("Model", s.model.clone()),
        ("Product", s.product.clone()),
        ("Generation", s.generation.clone()),
        ("Serial", s.serial.clone()),
        ("MAC", s.mac_addr.clone()),
        ("Region", s.region.clone()),
        ("Language", s.language.clone()),
        ("ID", s.cid.clone()),
    ])
}

fn playing_detail(p: &PlayingContent) -> String {
    output::detail_lines([
        ("Title", p.title.clone()),
        ("Program", p.program_title.clone()),
        ("Channel", p.disp_num.clone()),
        ("Type", p.program_media_type.clone()),
        ("Source", p.source.clone()),
        ("URI", p.uri.clone()),
        ("Started", p.start_time().map(|t| t.to_rfc2822())),
        ("Duration", p.duration_sec.map(|s| format!("{} min", s / 60))),
    ])
}

pub async fn handle(
    client: &mut BraviaClient,
    args: InfoArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        InfoCommand::System => {
            let info = client.get_system_info().await?;
            output::render_single(&global.output, &info, system_detail, |s| {
                s.model.clone().unwrap_or_default()
            })
        }
        InfoCommand::Playing => {
            let playing = client.get_playing_info().await?;
            if playing.is_empty() && matches!(global.output, crate::cli::OutputFormat::Table) {
                "Nothing playing (or an app is in the foreground)".to_owned()
            } else {
                output::render_single(&global.output, &playing, playing_detail, |p| {
                    p.title.clone().unwrap_or_default()
                })
            }
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
