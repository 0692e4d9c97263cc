//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use bravia_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("No TV address configured for profile '{profile}'")]
    #[diagnostic(
        code(bravia::no_host),
        help(
            "Pass --host, set BRAVIA_HOST, or save one with:\n\
             bravia config set-host <IP>"
        )
    )]
    NoHost { profile: String },

    #[error("Could not reach the TV at {host}")]
    #[diagnostic(
        code(bravia::connection_failed),
        help(
            "Check that the TV is on and reachable on the network.\n\
             Remote start must be enabled for it to answer in standby."
        )
    )]
    ConnectionFailed { host: String },

    #[error("The TV at {host} does not have IP control enabled")]
    #[diagnostic(
        code(bravia::no_ip_control),
        help(
            "Enable it on the TV under Network > Home network setup > IP control,\n\
             and set Authentication to 'Normal and Pre-Shared Key'."
        )
    )]
    NoIpControl { host: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("The TV at {host} rejected the PIN")]
    #[diagnostic(
        code(bravia::auth_failed),
        help(
            "Pair again to get a fresh PIN on screen:\n\
             bravia pair --profile {profile}"
        )
    )]
    AuthFailed { host: String, profile: String },

    #[error("Profile '{profile}' has not been paired with a TV")]
    #[diagnostic(
        code(bravia::not_paired),
        help("Run: bravia pair --profile {profile}")
    )]
    NotPaired { profile: String },

    #[error("No PIN configured for profile '{profile}'")]
    #[diagnostic(
        code(bravia::no_pin),
        help("Pass --pin, set BRAVIA_PIN, or pair again with: bravia pair --pin <PIN>")
    )]
    NoPin { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(bravia::not_found),
        help("Run: bravia {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bravia::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(bravia::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: bravia config set-host <IP> --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(bravia::config))]
    Config(ConfigError),

    // ── Device / IO ──────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(bravia::device))]
    Device(bravia_api::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotPaired { .. } | Self::NoPin { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::NoIpControl { .. } => exit_code::UNSUPPORTED,
            Self::NoHost { .. } | Self::Validation { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            Self::Device(err) if err.is_network() => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the TV address to errors that only make sense with it.
    pub fn with_host(self, host: &str) -> Self {
        match self {
            Self::Device(bravia_api::Error::NoIpControl) => Self::NoIpControl { host: host.into() },
            other => other,
        }
    }
}

// ── Library errors → CliError ────────────────────────────────────────

impl From<bravia_api::Error> for CliError {
    fn from(err: bravia_api::Error) -> Self {
        match err {
            bravia_api::Error::InvalidMac(raw) => CliError::Validation {
                field: "mac".into(),
                reason: format!("'{raw}' is not a MAC address (expected aa:bb:cc:dd:ee:ff)"),
            },
            bravia_api::Error::MissingMac => CliError::Validation {
                field: "mac".into(),
                reason: "no MAC address known; pass --mac or pair with the TV first".into(),
            },
            other => CliError::Device(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoPin { profile } => CliError::NoPin { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}
