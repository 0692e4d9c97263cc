// Bravia HTTP client
//
// Wraps `reqwest::Client` with the set's two channels: JSON calls posted to
// `/sony/{service}` and IRCC control codes posted to `/sony/IRCC`. Endpoint
// groups (system, audio, content, ...) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use indexmap::IndexMap;
use reqwest::StatusCode;
use reqwest::header::{CONNECTION, CONTENT_TYPE, COOKIE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};
use url::Url;

use crate::error::Error;
use crate::request::{IRCC_SOAP_ACTION, Reply, RpcRequest, Service, ircc_envelope};
use crate::session::Session;
use crate::system::SystemInfo;
use crate::transport::TransportConfig;
use crate::wol::{BROADCAST_TARGET, MacAddress};

/// Per-call knobs for the JSON and IRCC channels.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CallOptions {
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
    /// Log failures at debug level instead of error level.
    pub quiet: bool,
}

impl CallOptions {
    pub fn quiet() -> Self {
        Self {
            timeout: None,
            quiet: true,
        }
    }
}

/// Client for one Bravia set.
///
/// Holds the session (host, MAC, cookie jar) and the lazily built catalogs:
/// remote-control codes, sources, apps and scenes. Every method that may fill
/// a cache or update the cookie jar takes `&mut self`, so a client cannot be
/// shared between concurrent callers without external locking.
pub struct BraviaClient {
    http: reqwest::Client,
    base_url: Url,
    transport: TransportConfig,
    wol_target: SocketAddr,
    pub(crate) session: Session,
    pub(crate) commands: IndexMap<String, String>,
    pub(crate) content_mapping: IndexMap<String, String>,
    pub(crate) app_list: IndexMap<String, String>,
    pub(crate) scene_mapping: IndexMap<String, String>,
    pub(crate) system_info: SystemInfo,
    pub(crate) uid: Option<String>,
}

impl fmt::Debug for BraviaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraviaClient")
            .field("base_url", &self.base_url.as_str())
            .field("mac", &self.session.mac)
            .field("authenticated", &self.session.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl BraviaClient {
    /// Create a client for the set at `host` (an IP or `host:port`).
    pub fn new(
        host: &str,
        mac: Option<MacAddress>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}/"))?;
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, mac, transport.clone()))
    }

    /// Create a client around a pre-built `reqwest::Client` and base URL.
    ///
    /// Used by tests to point the client at a mock server.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        mac: Option<MacAddress>,
        transport: TransportConfig,
    ) -> Self {
        let host = base_url.authority().to_owned();
        Self {
            http,
            base_url,
            transport,
            wol_target: BROADCAST_TARGET,
            session: Session::new(host, mac),
            commands: IndexMap::new(),
            content_mapping: IndexMap::new(),
            app_list: IndexMap::new(),
            scene_mapping: IndexMap::new(),
            system_info: SystemInfo::default(),
            uid: None,
        }
    }

    /// Send Wake-on-LAN packets somewhere other than the limited broadcast
    /// address (e.g. a subnet-directed broadcast).
    pub fn with_wol_target(mut self, target: SocketAddr) -> Self {
        self.wol_target = target;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn host(&self) -> &str {
        &self.session.host
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The hardware address used for Wake-on-LAN, if known.
    pub fn mac(&self) -> Option<MacAddress> {
        self.session.mac
    }

    /// The device's unique id (`cid`), known after system info was fetched.
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn wol_target(&self) -> SocketAddr {
        self.wol_target
    }

    pub(crate) fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/sony/{service}`
    pub(crate) fn service_url(&self, service: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("sony/{service}"))?)
    }

    // ── JSON channel ─────────────────────────────────────────────────

    /// Post `request` to the JSON service and parse the reply.
    ///
    /// Transport failures and unparseable bodies are logged and returned as
    /// an empty [`Reply`]. A 404 means IP control is off and is the one
    /// failure returned as an error.
    pub async fn send_json(&mut self, service: Service, request: &RpcRequest) -> Result<Reply, Error> {
        self.post_json(service, request, CallOptions::default(), None)
            .await
    }

    pub(crate) async fn send_json_with(
        &mut self,
        service: Service,
        request: &RpcRequest,
        options: CallOptions,
    ) -> Result<Reply, Error> {
        self.post_json(service, request, options, None).await
    }

    /// Shared JSON path. `pin` adds the Basic credential used by registration.
    pub(crate) async fn post_json(
        &mut self,
        service: Service,
        request: &RpcRequest,
        options: CallOptions,
        pin: Option<&SecretString>,
    ) -> Result<Reply, Error> {
        let url = match self.service_url(service.as_ref()) {
            Ok(url) => url,
            Err(e) => {
                report(options.quiet, &request.method, &e);
                return Ok(Reply::default());
            }
        };

        debug!(method = %request.method, %url, "POST");

        let mut builder = self
            .http
            .post(url)
            .json(request)
            .timeout(options.timeout.unwrap_or(self.transport.timeout));
        if let Some(cookie) = self.session.cookies.header_value() {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(pin) = pin {
            builder = builder
                .basic_auth("", Some(pin.expose_secret()))
                .header(CONNECTION, "keep-alive");
        }

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                report(options.quiet, &request.method, &Error::Transport(e));
                return Ok(Reply::default());
            }
        };

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::NoIpControl);
        }

        let incoming: Vec<(String, String)> = resp
            .cookies()
            .map(|c| (c.name().to_owned(), c.value().to_owned()))
            .collect();

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                report(options.quiet, &request.method, &Error::Transport(e));
                return Ok(Reply::default());
            }
        };

        let reply: Reply = match serde_json::from_str(&body) {
            Ok(reply) => reply,
            Err(e) => {
                let err = Error::Deserialization {
                    message: e.to_string(),
                    body,
                };
                report(options.quiet, &request.method, &err);
                return Ok(Reply::default());
            }
        };

        if !incoming.is_empty() {
            self.session.cookies = self.session.cookies.merged(incoming);
        }

        Ok(reply)
    }

    // ── IRCC channel ─────────────────────────────────────────────────

    /// Post one control code to `/sony/IRCC`.
    ///
    /// Returns the raw response body, or `None` if the request failed
    /// (already logged).
    pub async fn send_control_code(&self, code: &str) -> Option<Bytes> {
        self.post_ircc(code, CallOptions::default()).await
    }

    pub(crate) async fn post_ircc(&self, code: &str, options: CallOptions) -> Option<Bytes> {
        let url = match self.service_url("IRCC") {
            Ok(url) => url,
            Err(e) => {
                report(options.quiet, "X_SendIRCC", &e);
                return None;
            }
        };

        debug!(%url, "POST IRCC");

        let mut builder = self
            .http
            .post(url)
            .header("SOAPACTION", IRCC_SOAP_ACTION)
            .header(CONTENT_TYPE, "text/xml; charset=UTF-8")
            .body(ircc_envelope(code))
            .timeout(options.timeout.unwrap_or(self.transport.timeout));
        if let Some(cookie) = self.session.cookies.header_value() {
            builder = builder.header(COOKIE, cookie);
        }

        let result = match builder.send().await {
            Ok(resp) => resp.bytes().await,
            Err(e) => Err(e),
        };
        match result {
            Ok(body) => Some(body),
            Err(e) => {
                report(options.quiet, "X_SendIRCC", &Error::Transport(e));
                None
            }
        }
    }
}

/// Log a swallowed failure at the level the caller asked for.
fn report(quiet: bool, method: &str, err: &Error) {
    if quiet {
        debug!(method, error = %err, "request failed");
    } else {
        error!(method, error = %err, "request failed");
    }
}
