//! Volume command handlers.

use tabled::Tabled;

use bravia_api::{BraviaClient, VolumeInfo};

use crate::cli::{GlobalOpts, VolumeArgs, VolumeCommand};
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Tabled)]
struct OutputRow {
    #[tabled(rename = "Output")]
    name: String,
}

fn detail(v: &VolumeInfo) -> String {
    output::detail_lines([
        ("Output", v.target.clone()),
        ("Volume", v.volume.map(|n| n.to_string())),
        ("Muted", v.mute.map(|m| m.to_string())),
        (
            "Range",
            v.min_volume.zip(v.max_volume).map(|(lo, hi)| format!("{lo}-{hi}")),
        ),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &mut BraviaClient,
    args: VolumeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = args.target.as_str();
    match args.command {
        VolumeCommand::Up => client.volume_up(target).await?,
        VolumeCommand::Down => client.volume_down(target).await?,

        VolumeCommand::Set { level } => {
            if !(0.0..=1.0).contains(&level) {
                return Err(CliError::Validation {
                    field: "level".into(),
                    reason: format!("{level} is outside 0.0 - 1.0"),
                });
            }
            client.set_volume_level(level, target).await?;
        }

        VolumeCommand::Get => {
            let info = client.get_volume_info(target).await?;
            if info.is_empty() {
                return Err(CliError::NotFound {
                    resource_type: "audio output".into(),
                    identifier: target.into(),
                    list_command: "volume outputs".into(),
                });
            }
            let out = output::render_single(&global.output, &info, detail, |v| {
                v.volume.map(|n| n.to_string()).unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
        }

        VolumeCommand::Mute => client.set_mute(true).await?,
        VolumeCommand::Unmute => client.set_mute(false).await?,
        VolumeCommand::Toggle => client.mute_volume().await?,

        VolumeCommand::Outputs => {
            let outputs: Vec<String> = client.get_audio_outputs().await?.into_iter().collect();
            let out = output::render_list(
                &global.output,
                &outputs,
                |name| OutputRow { name: name.clone() },
                Clone::clone,
            );
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}
