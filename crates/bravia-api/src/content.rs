// Content listings and selection: sources, channels, apps, scenes
//
// Three independent catalogs keyed by display name: the source map (inputs
// and tuner channels, merged with apps), the app map and the scene map.
// Each `list_*` call refetches and fully replaces its cache; the `select_*`
// style methods load their catalog once on first use.

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::client::BraviaClient;
use crate::error::Error;
use crate::request::{RpcRequest, Service, lenient};

/// Source schemes walked by [`BraviaClient::list_sources`], in order.
pub const SOURCE_SCHEMES: [&str; 2] = ["extInput", "tv"];

/// Page size for `getContentList`.
pub const CONTENT_PAGE_SIZE: u64 = 50;

/// What the set is currently showing, from `getPlayingContentInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayingContent {
    #[serde(default, deserialize_with = "lenient")]
    pub program_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub program_media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub disp_num: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration_sec: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_date_time: Option<String>,
}

impl PlayingContent {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parse `startDateTime` (e.g. `2016-02-24T12:05:00+0100`).
    pub fn start_time(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.start_date_time.as_deref()?;
        DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
    }
}

#[derive(Debug, Deserialize)]
struct TitledUri {
    title: Option<String>,
    uri: String,
}

/// `(title, uri)` pairs from a content or app list. Titles are trimmed;
/// entries without a title or URI are skipped.
fn titled_entries(items: &[Value]) -> impl Iterator<Item = (String, String)> + '_ {
    items.iter().filter_map(|item| {
        let entry = TitledUri::deserialize(item).ok()?;
        let title = entry.title?.trim().to_owned();
        (!title.is_empty()).then_some((title, entry.uri))
    })
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl BraviaClient {
    // ── Sources & channels ───────────────────────────────────────────

    /// List every channel / content entry of one source.
    ///
    /// `getContentCount {source}` then `getContentList {source, stIdx, cnt}`
    /// in pages of [`CONTENT_PAGE_SIZE`]. Titles are trimmed; empty titles
    /// are skipped; later duplicates win.
    pub async fn get_source(&mut self, source: &str) -> Result<IndexMap<String, String>, Error> {
        let reply = self
            .send_json(
                Service::AvContent,
                &RpcRequest::with_params("getContentCount", json!({ "source": source })),
            )
            .await?;
        let end = reply
            .item(0)
            .and_then(|v| v.get("count"))
            .and_then(Value::as_u64)
            .unwrap_or(0);

        let mut channels = IndexMap::new();
        let mut index = 0;
        while index < end {
            let count = (end - index).min(CONTENT_PAGE_SIZE);
            debug!(source, index, count, "fetching content page");
            let request = RpcRequest::with_params(
                "getContentList",
                json!({ "source": source, "stIdx": index, "cnt": count }),
            );
            let reply = self.send_json(Service::AvContent, &request).await?;
            channels.extend(titled_entries(reply.list(0)));
            index += count;
        }
        Ok(channels)
    }

    /// Build the full source map: inputs, then tuner channels, then apps.
    ///
    /// Replaces the cached source map. Order follows discovery order;
    /// an app sharing a title with a channel overwrites the channel's URI.
    pub async fn list_sources(&mut self) -> Result<IndexMap<String, String>, Error> {
        let mut mapping = IndexMap::new();
        for scheme in SOURCE_SCHEMES {
            let reply = self
                .send_json(
                    Service::AvContent,
                    &RpcRequest::with_params("getSourceList", json!({ "scheme": scheme })),
                )
                .await?;
            let sources: Vec<String> = reply
                .list(0)
                .iter()
                .filter_map(|s| s.get("source").and_then(Value::as_str))
                .map(str::to_owned)
                .collect();
            for source in sources {
                mapping.extend(self.get_source(&source).await?);
            }
        }
        mapping.extend(self.list_apps().await?);
        self.content_mapping.clone_from(&mapping);
        Ok(mapping)
    }

    /// The cached source map (empty until loaded).
    pub fn sources(&self) -> &IndexMap<String, String> {
        &self.content_mapping
    }

    /// Play the source titled `name`, loading the source map on first use.
    /// Unknown names are ignored.
    pub async fn select_source(&mut self, name: &str) -> Result<(), Error> {
        if self.content_mapping.is_empty() {
            self.list_sources().await?;
        }
        match self.content_mapping.get(name).cloned() {
            Some(uri) => self.play_content(&uri).await,
            None => {
                debug!(name, "unknown source");
                Ok(())
            }
        }
    }

    /// Play a content URI. App URIs are launched through `appControl`,
    /// everything else through `avContent`.
    pub async fn play_content(&mut self, uri: &str) -> Result<(), Error> {
        if self.app_list.values().any(|v| v == uri) {
            self.set_active_app(uri).await
        } else {
            let request = RpcRequest::with_params("setPlayContent", json!({ "uri": uri }));
            self.send_json(Service::AvContent, &request).await?;
            Ok(())
        }
    }

    /// What is playing right now. Never cached; empty on failure.
    ///
    /// `POST /sony/avContent` `getPlayingContentInfo`
    pub async fn get_playing_info(&mut self) -> Result<PlayingContent, Error> {
        let reply = self
            .send_json(Service::AvContent, &RpcRequest::new("getPlayingContentInfo"))
            .await?;
        if reply.error.is_some() {
            return Ok(PlayingContent::default());
        }
        Ok(reply.decode(0))
    }

    // ── Apps ─────────────────────────────────────────────────────────

    /// Fetch installed apps, replacing the cached app map. Titles follow the
    /// same rules as channel titles.
    ///
    /// `POST /sony/appControl` `getApplicationList`
    pub async fn list_apps(&mut self) -> Result<IndexMap<String, String>, Error> {
        let reply = self
            .send_json(Service::AppControl, &RpcRequest::new("getApplicationList"))
            .await?;
        self.app_list = reply
            .result
            .iter()
            .flatten()
            .filter_map(Value::as_array)
            .flat_map(|apps| titled_entries(apps.as_slice()))
            .collect();
        Ok(self.app_list.clone())
    }

    /// The cached app map (empty until loaded).
    pub fn apps(&self) -> &IndexMap<String, String> {
        &self.app_list
    }

    /// Launch the app titled `name`, loading the app map on first use.
    /// Unknown names are ignored.
    pub async fn start_app(&mut self, name: &str) -> Result<(), Error> {
        if self.app_list.is_empty() {
            self.list_apps().await?;
        }
        match self.app_list.get(name).cloned() {
            Some(uri) => self.set_active_app(&uri).await,
            None => {
                debug!(name, "unknown app");
                Ok(())
            }
        }
    }

    async fn set_active_app(&mut self, uri: &str) -> Result<(), Error> {
        let request = RpcRequest::with_params("setActiveApp", json!({ "uri": uri }));
        self.send_json(Service::AppControl, &request).await?;
        Ok(())
    }

    // ── Scenes ───────────────────────────────────────────────────────

    /// Fetch available scenes (video modes), replacing the cached scene map.
    /// Keys are the capitalized mode values.
    ///
    /// `POST /sony/videoScreen` `getSceneSetting`
    pub async fn list_scenes(&mut self) -> Result<IndexMap<String, String>, Error> {
        let reply = self
            .send_json(Service::VideoScreen, &RpcRequest::new("getSceneSetting"))
            .await?;
        self.scene_mapping = reply
            .item(0)
            .and_then(|v| v.get("candidate"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|c| c.get("value").and_then(Value::as_str))
            .map(|value| (capitalize(value), value.to_owned()))
            .collect();
        Ok(self.scene_mapping.clone())
    }

    /// The cached scene map (empty until loaded).
    pub fn scenes(&self) -> &IndexMap<String, String> {
        &self.scene_mapping
    }

    /// The active scene value, or `None` if the set didn't say.
    pub async fn get_current_scene(&mut self) -> Result<Option<String>, Error> {
        let reply = self
            .send_json(Service::VideoScreen, &RpcRequest::new("getSceneSetting"))
            .await?;
        Ok(reply
            .item(0)
            .and_then(|v| v.get("currentValue"))
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    /// Switch to the scene named `name` (a capitalized key from
    /// [`list_scenes`](Self::list_scenes)). Unknown names are ignored.
    pub async fn set_scene(&mut self, name: &str) -> Result<(), Error> {
        if self.scene_mapping.is_empty() {
            self.list_scenes().await?;
        }
        match self.scene_mapping.get(name).cloned() {
            Some(value) => {
                let request = RpcRequest::with_params("setSceneSetting", json!({ "value": value }));
                self.send_json(Service::VideoScreen, &request).await?;
                Ok(())
            }
            None => {
                debug!(name, "unknown scene");
                Ok(())
            }
        }
    }
}
