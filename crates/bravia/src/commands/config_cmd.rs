//! Config subcommand handlers.

use bravia_api::MacAddress;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

const REDACTED: &str = "********";

/// A copy of `cfg` safe to print: PINs are masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.pin.is_some() {
            profile.pin = Some(REDACTED.into());
        }
    }
    cfg
}

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.active_profile_name().to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetHost { host, mac } => {
            let mac = mac.map(|m| m.parse::<MacAddress>()).transpose()?;
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profile_mut(&profile_name);
            profile.host = Some(host.clone());
            if let Some(mac) = mac {
                profile.mac = Some(mac.to_string());
            }
            config::save_config(&cfg)?;

            output::print_done(&format!("Profile '{profile_name}' now targets {host}"), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
                available.sort_unstable();
                return Err(CliError::ProfileNotFound {
                    available: available.join(", "),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_done(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}
