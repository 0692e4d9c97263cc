// System service endpoints
//
// Power state, system information and the device-side Wake-on-LAN setting,
// plus the power-on sequence that ties them to the IRCC channel.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::client::{BraviaClient, CallOptions};
use crate::commands::POWER_COMMAND;
use crate::error::Error;
use crate::request::{RpcRequest, Service, lenient};
use crate::wol;

/// Control code sent for power-on when the catalog has no `TvPower` entry.
pub const DEFAULT_POWER_CODE: &str = "AAAAAQAAAAEAAAAuAw==";

/// Power state reported by `getPowerStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerStatus {
    Active,
    Standby,
    Off,
    /// Any value this crate does not know about, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl From<&str> for PowerStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "standby" => Self::Standby,
            "off" => Self::Off,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Standby => f.write_str("standby"),
            Self::Off => f.write_str("off"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Result of `getSystemInformation`.
///
/// The field set varies by model and firmware, so everything is optional
/// and unknown fields land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub serial: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mac_addr: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub generation: Option<String>,
    /// Device unique id.
    #[serde(default, deserialize_with = "lenient")]
    pub cid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SystemInfo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl BraviaClient {
    /// Get (and cache) the set's system information.
    ///
    /// `POST /sony/system` `getSystemInformation`
    ///
    /// Also records the device id and, if no MAC address was configured,
    /// the MAC the set reports. An empty answer is not cached.
    pub async fn get_system_info(&mut self) -> Result<SystemInfo, Error> {
        if !self.system_info.is_empty() {
            return Ok(self.system_info.clone());
        }

        debug!("fetching system information");
        let reply = self
            .send_json(Service::System, &RpcRequest::new("getSystemInformation"))
            .await?;
        let info: SystemInfo = reply.decode(0);

        if self.session.mac.is_none() {
            if let Some(raw) = info.mac_addr.as_deref() {
                match raw.parse() {
                    Ok(mac) => self.session.mac = Some(mac),
                    Err(e) => warn!(error = %e, "ignoring unparseable MAC from device"),
                }
            }
        }
        self.uid.clone_from(&info.cid);
        self.system_info = info;
        Ok(self.system_info.clone())
    }

    /// Get the power state.
    ///
    /// `POST /sony/system` `getPowerStatus`
    ///
    /// Uses the short power timeout and logs quietly: a set in deep standby
    /// simply doesn't answer. No answer reads as [`PowerStatus::Off`].
    pub async fn get_power_status(&mut self) -> Result<PowerStatus, Error> {
        let options = CallOptions {
            timeout: Some(self.transport().power_timeout),
            quiet: true,
        };
        let reply = self
            .send_json_with(Service::System, &RpcRequest::new("getPowerStatus"), options)
            .await?;
        let status = reply
            .item(0)
            .and_then(|v| v.get("status"))
            .and_then(Value::as_str)
            .map_or(PowerStatus::Off, PowerStatus::from);
        Ok(status)
    }

    /// `true` if the set is powered and answers authenticated calls.
    pub async fn is_connected(&mut self) -> Result<bool, Error> {
        if self.get_power_status().await? == PowerStatus::Off {
            return Ok(false);
        }
        Ok(!self.get_system_info().await?.is_empty())
    }

    /// Set the power state.
    ///
    /// `POST /sony/system` `setPowerStatus {"status": <on>}`
    pub async fn set_power_status(&mut self, on: bool) -> Result<(), Error> {
        let request = RpcRequest::with_params("setPowerStatus", json!({ "status": on }));
        self.send_json_with(Service::System, &request, CallOptions::quiet())
            .await?;
        Ok(())
    }

    /// Turn the set on.
    ///
    /// Broadcasts Wake-on-LAN when a MAC is known. Wake-on-LAN is not
    /// reliable across firmware versions, so if the set does not then report
    /// `active`, the power control code and `setPowerStatus true` follow.
    pub async fn turn_on(&mut self) -> Result<(), Error> {
        if let Some(mac) = self.session.mac {
            if let Err(e) = wol::wake_on_lan(mac, self.wol_target()).await {
                warn!(error = %e, "wake-on-lan broadcast failed");
            }
        }

        if self.get_power_status().await? != PowerStatus::Active {
            let code = self
                .get_command_code(POWER_COMMAND)
                .await?
                .unwrap_or_else(|| DEFAULT_POWER_CODE.to_owned());
            self.send_control_code(&code).await;
            self.set_power_status(true).await?;
        }
        Ok(())
    }

    /// Turn the set off (standby).
    pub async fn turn_off(&mut self) -> Result<(), Error> {
        self.set_power_status(false).await
    }

    /// Broadcast Wake-on-LAN packets for the known MAC address.
    pub async fn wake(&self) -> Result<(), Error> {
        let mac = self.session.mac.ok_or(Error::MissingMac)?;
        wol::wake_on_lan(mac, self.wol_target()).await
    }

    /// Read the device-side Wake-on-LAN setting.
    ///
    /// `POST /sony/system` `getWolMode`
    pub async fn get_wol_mode(&mut self) -> Result<Option<bool>, Error> {
        let reply = self
            .send_json(Service::System, &RpcRequest::new("getWolMode"))
            .await?;
        Ok(reply
            .item(0)
            .and_then(|v| v.get("enabled"))
            .and_then(Value::as_bool))
    }

    /// Change the device-side Wake-on-LAN setting.
    ///
    /// `POST /sony/system` `setWolMode {"enabled": <mode>}`
    pub async fn set_wol_mode(&mut self, enabled: bool) -> Result<(), Error> {
        let request = RpcRequest::with_params("setWolMode", json!({ "enabled": enabled }));
        self.send_json(Service::System, &request).await?;
        Ok(())
    }
}
