//! Shared configuration for Bravia tools.
//!
//! TOML profiles (one per set), PIN resolution (env + plaintext), and the
//! load/save helpers. The CLI layers its own flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nickname the set shows in its list of registered devices.
pub const DEFAULT_NICKNAME: &str = "bravia-rs";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no PIN configured for profile '{profile}'")]
    NoPin { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named TV profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }

    /// Mutable access to a profile, creating an empty one if missing.
    pub fn profile_mut(&mut self, name: &str) -> &mut Profile {
        self.profiles.entry(name.to_owned()).or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named TV profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// IP address or host name of the set (optionally `host:port`).
    pub host: Option<String>,

    /// MAC address for Wake-on-LAN.
    pub mac: Option<String>,

    /// Pairing PIN (plaintext; prefer `pin_env`).
    pub pin: Option<String>,

    /// Environment variable name containing the PIN.
    pub pin_env: Option<String>,

    /// Client id registered with the set, generated at pairing.
    pub client_id: Option<String>,

    /// Nickname registered with the set.
    pub nickname: Option<String>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Profile {
    /// Effective request timeout, falling back to the global default.
    pub fn timeout(&self, defaults: &Defaults) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(defaults.timeout))
    }

    pub fn nickname(&self) -> &str {
        self.nickname.as_deref().unwrap_or(DEFAULT_NICKNAME)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "bravia-rs", "bravia").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bravia");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error: defaults apply. Environment keys use
/// `BRAVIA_` and `__` for nesting (`BRAVIA_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BRAVIA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── PIN resolution (without CLI flags) ──────────────────────────────

/// Resolve the pairing PIN from the profile.
pub fn resolve_pin(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's pin_env → env var lookup
    if let Some(ref env_name) = profile.pin_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Plaintext in config
    if let Some(ref pin) = profile.pin {
        return Ok(SecretString::from(pin.clone()));
    }

    Err(ConfigError::NoPin {
        profile: profile_name.into(),
    })
}
