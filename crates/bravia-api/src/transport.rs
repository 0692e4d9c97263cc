// Shared transport configuration for building the reqwest::Client.
//
// The set speaks plain HTTP on the LAN, so there is no TLS mode here; the
// knobs are the two timeouts and the user agent. Cookies are not handed to
// reqwest: the session keeps its own jar (see `session.rs`).

use std::time::Duration;

use crate::error::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for power-status polls. Short so a sleeping set fails fast.
pub const DEFAULT_POWER_TIMEOUT: Duration = Duration::from_secs(3);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub power_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            power_timeout: DEFAULT_POWER_TIMEOUT,
            user_agent: concat!("bravia-api/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }

    /// Override the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
