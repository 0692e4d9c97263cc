//! `bravia pair`: register this client with a TV.
//!
//! Without `--pin` the TV is asked to display a fresh PIN; run again with
//! it to finish. On success the host, MAC, PIN and client id are written
//! to the active profile so later commands need no flags.

use secrecy::SecretString;
use uuid::Uuid;

use bravia_config::DEFAULT_NICKNAME;

use crate::cli::{GlobalOpts, PairArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: PairArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let target = config::resolve_target(global, &cfg)?;
    let existing = cfg.profiles.get(&target.profile_name);

    // Reuse the id from an earlier attempt so the TV sees one client.
    let client_id = existing
        .and_then(|p| p.client_id.clone())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let nickname = args
        .nickname
        .or_else(|| existing.and_then(|p| p.nickname.clone()))
        .unwrap_or_else(|| DEFAULT_NICKNAME.to_owned());

    let mut client = util::build_client(&target)?;
    let pin = global.pin.clone().unwrap_or_default();

    let registered = client
        .authenticate(&SecretString::from(pin.clone()), &client_id, &nickname)
        .await
        .map_err(|e| CliError::from(e).with_host(&target.host))?;

    let profile = cfg.profile_mut(&target.profile_name);
    profile.host = Some(target.host.clone());
    profile.client_id = Some(client_id);
    profile.nickname = Some(nickname);

    if !registered {
        if !pin.is_empty() {
            return Err(CliError::AuthFailed {
                host: target.host,
                profile: target.profile_name,
            });
        }
        config::save_config(&cfg)?;
        if !global.quiet {
            eprintln!("A PIN should now be shown on the TV. Finish pairing with:");
            eprintln!("  bravia pair --pin <PIN> --profile {}", target.profile_name);
        }
        return Ok(());
    }

    profile.pin = Some(pin);
    if let Some(mac) = client.mac() {
        profile.mac = Some(mac.to_string());
    }
    config::save_config(&cfg)?;

    let model = client
        .get_system_info()
        .await?
        .model
        .unwrap_or_else(|| "TV".into());
    output::print_done(
        &format!("Paired with {model} at {} (profile '{}')", target.host, target.profile_name),
        global.quiet,
    );
    Ok(())
}
