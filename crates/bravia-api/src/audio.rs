// Audio service endpoints
//
// Volume and mute per output ("speaker", "headphone", ...). The wire volume
// is an integer string 0..100 (or a "+1"/"-1" step); callers work in 0.0..1.0.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::BraviaClient;
use crate::error::Error;
use crate::request::{RpcRequest, Service, lenient};

/// Output addressed when the caller doesn't pick one.
pub const DEFAULT_AUDIO_OUTPUT: &str = "speaker";

/// One output's entry from `getVolumeInformation`.
///
/// An empty record means the set didn't answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub mute: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub min_volume: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_volume: Option<i64>,
}

impl VolumeInfo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Volume scaled to 0.0..1.0.
    pub fn level(&self) -> Option<f64> {
        self.volume.map(|v| f64::from(i32::try_from(v).unwrap_or(i32::MAX)) / 100.0)
    }
}

/// Wire representation of a volume fraction: `round(v * 100)` as a string,
/// ties to even, clamped to 0..=100.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn volume_to_wire(level: f64) -> String {
    let scaled = (level.clamp(0.0, 1.0) * 100.0).round_ties_even() as i64;
    scaled.to_string()
}

impl BraviaClient {
    /// Volume entries for every output.
    async fn volume_entries(&mut self) -> Result<Vec<VolumeInfo>, Error> {
        let reply = self
            .send_json(Service::Audio, &RpcRequest::new("getVolumeInformation"))
            .await?;
        Ok(reply
            .list(0)
            .iter()
            .map(|v| VolumeInfo::deserialize(v).unwrap_or_default())
            .collect())
    }

    /// Volume and mute state for `output`; empty if the set didn't answer
    /// or has no such output.
    ///
    /// `POST /sony/audio` `getVolumeInformation`
    pub async fn get_volume_info(&mut self, output: &str) -> Result<VolumeInfo, Error> {
        Ok(self
            .volume_entries()
            .await?
            .into_iter()
            .find(|v| v.target.as_deref() == Some(output))
            .unwrap_or_default())
    }

    /// Current volume of `output` as 0.0..1.0.
    pub async fn get_volume_level(&mut self, output: &str) -> Result<Option<f64>, Error> {
        Ok(self.get_volume_info(output).await?.level())
    }

    /// Names of the outputs the set reports.
    pub async fn get_audio_outputs(&mut self) -> Result<IndexSet<String>, Error> {
        Ok(self
            .volume_entries()
            .await?
            .into_iter()
            .filter_map(|v| v.target)
            .collect())
    }

    async fn set_audio_volume(&mut self, output: &str, volume: &str) -> Result<(), Error> {
        let request = RpcRequest::with_params(
            "setAudioVolume",
            json!({ "target": output, "volume": volume }),
        );
        self.send_json(Service::Audio, &request).await?;
        Ok(())
    }

    /// Set `output`'s volume from a 0.0..1.0 fraction.
    pub async fn set_volume_level(&mut self, level: f64, output: &str) -> Result<(), Error> {
        self.set_audio_volume(output, &volume_to_wire(level)).await
    }

    pub async fn volume_up(&mut self, output: &str) -> Result<(), Error> {
        self.set_audio_volume(output, "+1").await
    }

    pub async fn volume_down(&mut self, output: &str) -> Result<(), Error> {
        self.set_audio_volume(output, "-1").await
    }

    /// `POST /sony/audio` `setAudioMute {"status": <muted>}`
    pub async fn set_mute(&mut self, muted: bool) -> Result<(), Error> {
        let request = RpcRequest::with_params("setAudioMute", json!({ "status": muted }));
        self.send_json(Service::Audio, &request).await?;
        Ok(())
    }

    /// Toggle mute on the default output.
    ///
    /// Only an explicit `mute: true` unmutes. If the volume read fails the
    /// record is empty and this always mutes.
    pub async fn mute_volume(&mut self) -> Result<(), Error> {
        let info = self.get_volume_info(DEFAULT_AUDIO_OUTPUT).await?;
        self.set_mute(info.mute != Some(true)).await
    }
}
