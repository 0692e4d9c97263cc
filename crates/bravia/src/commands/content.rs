//! Source, app and scene command handlers.

use bravia_api::BraviaClient;

use crate::cli::{AppsArgs, AppsCommand, GlobalOpts, ScenesArgs, ScenesCommand, SourcesArgs, SourcesCommand};
use crate::error::CliError;
use crate::output::{self, NamedValue};

use super::util;

fn print_catalog(rows: &[NamedValue], global: &GlobalOpts) {
    let out = output::render_list(&global.output, rows, Clone::clone, |r| r.name.clone());
    output::print_output(&out, global.quiet);
}

// ── Sources ─────────────────────────────────────────────────────────

pub async fn sources(
    client: &mut BraviaClient,
    args: SourcesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SourcesCommand::List => {
            let sources = client.list_sources().await?;
            print_catalog(&NamedValue::from_map(&sources), global);
        }

        SourcesCommand::Select { name } => {
            util::require_entry(&client.list_sources().await?, &name, "source", "sources list")?;
            client.select_source(&name).await?;
            output::print_done(&format!("Switched to {name}"), global.quiet);
        }
    }
    Ok(())
}

// ── Apps ────────────────────────────────────────────────────────────

pub async fn apps(
    client: &mut BraviaClient,
    args: AppsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AppsCommand::List => {
            let apps = client.list_apps().await?;
            print_catalog(&NamedValue::from_map(&apps), global);
        }

        AppsCommand::Launch { name } => {
            util::require_entry(&client.list_apps().await?, &name, "app", "apps list")?;
            client.start_app(&name).await?;
            output::print_done(&format!("Launched {name}"), global.quiet);
        }
    }
    Ok(())
}

// ── Scenes ──────────────────────────────────────────────────────────

pub async fn scenes(
    client: &mut BraviaClient,
    args: ScenesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ScenesCommand::List => {
            let scenes = client.list_scenes().await?;
            print_catalog(&NamedValue::from_map(&scenes), global);
        }

        ScenesCommand::Current => {
            let current = client.get_current_scene().await?;
            let out = output::render_single(
                &global.output,
                &current,
                |c| format!("Scene:     {}", c.as_deref().unwrap_or("none")),
                |c| c.clone().unwrap_or_else(|| "none".into()),
            );
            output::print_output(&out, global.quiet);
        }

        ScenesCommand::Set { name } => {
            util::require_entry(&client.list_scenes().await?, &name, "scene", "scenes list")?;
            client.set_scene(&name).await?;
            output::print_done(&format!("Scene set to {name}"), global.quiet);
        }
    }
    Ok(())
}
