// Remote-control command catalog
//
// `getRemoteControllerInfo` returns `[ {meta}, [ {name, value}, ... ] ]`:
// the second element maps button names ("Play", "VolumeUp", ...) to IRCC
// codes. The table is fetched on first lookup and kept for the client's
// lifetime.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::client::BraviaClient;
use crate::error::Error;
use crate::request::{RpcRequest, Service};

/// Catalog entry used by the power-on fallback.
pub const POWER_COMMAND: &str = "TvPower";

/// Transport-control buttons exposed as dedicated methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr, strum::EnumString)]
pub enum MediaCommand {
    Play,
    Pause,
    Stop,
    Next,
    #[strum(serialize = "Prev")]
    Previous,
}

#[derive(Debug, Deserialize)]
struct CodeEntry {
    name: String,
    value: String,
}

impl BraviaClient {
    /// Fetch the command catalog, replacing any cached copy.
    ///
    /// `POST /sony/system` `getRemoteControllerInfo`
    pub async fn refresh_commands(&mut self) -> Result<&IndexMap<String, String>, Error> {
        debug!("fetching remote controller info");
        let reply = self
            .send_json(Service::System, &RpcRequest::new("getRemoteControllerInfo"))
            .await?;
        self.commands = reply
            .list(1)
            .iter()
            .filter_map(|v| CodeEntry::deserialize(v).ok())
            .map(|e| (e.name, e.value))
            .collect();
        Ok(&self.commands)
    }

    /// The cached command catalog (empty until first lookup or refresh).
    pub fn commands(&self) -> &IndexMap<String, String> {
        &self.commands
    }

    /// Look up the control code for `name`, fetching the catalog on first use.
    ///
    /// Unknown names yield `None`.
    pub async fn get_command_code(&mut self, name: &str) -> Result<Option<String>, Error> {
        if self.commands.is_empty() {
            self.refresh_commands().await?;
        }
        Ok(self.commands.get(name).cloned())
    }

    /// Press the named button. Unknown names are ignored.
    pub async fn send_command(&mut self, name: &str) -> Result<(), Error> {
        match self.get_command_code(name).await? {
            Some(code) => {
                self.send_control_code(&code).await;
            }
            None => debug!(name, "no control code for command"),
        }
        Ok(())
    }

    pub async fn send_media_command(&mut self, command: MediaCommand) -> Result<(), Error> {
        self.send_command(command.as_ref()).await
    }

    pub async fn media_play(&mut self) -> Result<(), Error> {
        self.send_media_command(MediaCommand::Play).await
    }

    pub async fn media_pause(&mut self) -> Result<(), Error> {
        self.send_media_command(MediaCommand::Pause).await
    }

    pub async fn media_stop(&mut self) -> Result<(), Error> {
        self.send_media_command(MediaCommand::Stop).await
    }

    pub async fn media_next_track(&mut self) -> Result<(), Error> {
        self.send_media_command(MediaCommand::Next).await
    }

    pub async fn media_previous_track(&mut self) -> Result<(), Error> {
        self.send_media_command(MediaCommand::Previous).await
    }
}
