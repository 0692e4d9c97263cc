//! Shared helpers for command handlers.

use secrecy::SecretString;
use tracing::debug;

use bravia_api::{BraviaClient, PowerStatus, TransportConfig};

use crate::cli::GlobalOpts;
use crate::config::{self, Target};
use crate::error::CliError;

/// Build an unauthenticated client for `target`.
pub fn build_client(target: &Target) -> Result<BraviaClient, CliError> {
    let transport = TransportConfig::default().with_timeout(target.timeout);
    Ok(BraviaClient::new(&target.host, target.mac, &transport)?)
}

/// A client plus the credentials to register it with the TV.
pub struct Connection {
    pub client: BraviaClient,
    pub target: Target,
    pin: SecretString,
    client_id: String,
    nickname: String,
}

impl Connection {
    /// Resolve target and credentials from flags, env and the config file.
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = config::load_config_or_default();
        let target = config::resolve_target(global, &cfg)?;
        let pin = config::resolve_pin(global, &cfg, &target.profile_name)?;
        let client_id = config::resolve_client_id(&cfg, &target.profile_name)?;
        let nickname = cfg
            .profiles
            .get(&target.profile_name)
            .map_or(bravia_config::DEFAULT_NICKNAME, |p| p.nickname())
            .to_owned();
        let client = build_client(&target)?;
        Ok(Self {
            client,
            target,
            pin,
            client_id,
            nickname,
        })
    }

    /// A connection around a prepared client, with placeholder credentials.
    #[cfg(test)]
    pub fn for_client(client: BraviaClient, target: Target) -> Self {
        Self {
            client,
            target,
            pin: SecretString::from("0000"),
            client_id: "bravia-test".into(),
            nickname: bravia_config::DEFAULT_NICKNAME.into(),
        }
    }

    /// Register with the TV; `false` if it rejected us or didn't answer.
    pub async fn authenticate(&mut self) -> Result<bool, CliError> {
        debug!(host = %self.target.host, client_id = %self.client_id, "authenticating");
        Ok(self
            .client
            .authenticate(&self.pin, &self.client_id, &self.nickname)
            .await?)
    }

    /// Register with the TV, turning a refusal into an error.
    ///
    /// A TV that doesn't even report its power state is unreachable;
    /// otherwise the PIN was rejected.
    pub async fn login(&mut self) -> Result<(), CliError> {
        if self.authenticate().await? {
            return Ok(());
        }
        if self.client.get_power_status().await? == PowerStatus::Off {
            return Err(CliError::ConnectionFailed {
                host: self.target.host.clone(),
            });
        }
        Err(CliError::AuthFailed {
            host: self.target.host.clone(),
            profile: self.target.profile_name.clone(),
        })
    }
}

/// Fail with `NotFound` unless `name` is in `catalog`.
pub fn require_entry<V>(
    catalog: &indexmap::IndexMap<String, V>,
    name: &str,
    resource_type: &str,
    list_command: &str,
) -> Result<(), CliError> {
    if catalog.contains_key(name) {
        Ok(())
    } else {
        Err(CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: name.into(),
            list_command: list_command.into(),
        })
    }
}
