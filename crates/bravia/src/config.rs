//! CLI configuration: thin wrapper around `bravia_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--host, --mac, --pin, ...).

use std::time::Duration;

use secrecy::SecretString;

use bravia_api::MacAddress;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use bravia_config::{Config, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Everything needed to reach one TV.
#[derive(Debug, Clone)]
pub struct Target {
    pub profile_name: String,
    pub host: String,
    pub mac: Option<MacAddress>,
    pub timeout: Duration,
}

/// Resolve the TV address, MAC and timeout.
///
/// CLI flag overrides take priority over profile values. A profile named
/// explicitly with `--profile` must exist unless `--host` is given.
pub fn resolve_target(global: &GlobalOpts, config: &Config) -> Result<Target, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profiles.get(&profile_name);

    if profile.is_none() && global.profile.is_some() && global.host.is_none() {
        let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available.join(", "),
        });
    }

    // 1. Host (flag > env > profile)
    let host = global
        .host
        .clone()
        .or_else(|| profile.and_then(|p| p.host.clone()))
        .ok_or_else(|| CliError::NoHost {
            profile: profile_name.clone(),
        })?;

    // 2. MAC (flag > env > profile)
    let mac = resolve_mac(global, config)?;

    // 3. Timeout (flag > env > profile > defaults)
    let timeout = global.timeout.map_or_else(
        || profile.map_or(Duration::from_secs(config.defaults.timeout), |p| p.timeout(&config.defaults)),
        Duration::from_secs,
    );

    Ok(Target {
        profile_name,
        host,
        mac,
        timeout,
    })
}

/// Resolve the Wake-on-LAN MAC address (flag > env > profile).
pub fn resolve_mac(global: &GlobalOpts, config: &Config) -> Result<Option<MacAddress>, CliError> {
    let profile_name = active_profile_name(global, config);
    Ok(global
        .mac
        .as_deref()
        .or_else(|| config.profiles.get(&profile_name).and_then(|p| p.mac.as_deref()))
        .map(str::parse::<MacAddress>)
        .transpose()?)
}

/// Resolve the PIN with CLI flag override, then fall through to shared
/// resolution.
pub fn resolve_pin(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<SecretString, CliError> {
    if let Some(ref pin) = global.pin {
        return Ok(SecretString::from(pin.clone()));
    }
    let profile = config
        .profiles
        .get(profile_name)
        .ok_or_else(|| CliError::NoPin {
            profile: profile_name.into(),
        })?;
    Ok(bravia_config::resolve_pin(profile, profile_name)?)
}

/// The client id registered at pairing.
pub fn resolve_client_id(config: &Config, profile_name: &str) -> Result<String, CliError> {
    config
        .profiles
        .get(profile_name)
        .and_then(|p| p.client_id.clone())
        .ok_or_else(|| CliError::NotPaired {
            profile: profile_name.into(),
        })
}
