use thiserror::Error;

/// Top-level error type for the `bravia-api` crate.
///
/// Ordinary operations never surface transport failures: they are logged
/// and turned into empty results. The only error an ordinary call returns
/// is [`Error::NoIpControl`]; the remaining variants come from client
/// construction, MAC parsing and the standalone Wake-on-LAN helper.
#[derive(Debug, Error)]
pub enum Error {
    // ── Device ──────────────────────────────────────────────────────
    /// The JSON channel answered 404: IP control is disabled on the
    /// set or the model does not support it.
    #[error("IP control is not enabled or the TV is not supported")]
    NoIpControl,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    /// Logged by the channel helpers, never returned from a device call.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Wake-on-LAN ─────────────────────────────────────────────────
    /// A hardware address string did not parse as six hex octets.
    #[error("Invalid MAC address '{0}'")]
    InvalidMac(String),

    /// No hardware address is known, so no magic packet can be built.
    #[error("No MAC address known for this device")]
    MissingMac,

    /// The broadcast socket could not be opened or written.
    #[error("Wake-on-LAN broadcast failed: {0}")]
    WakeOnLan(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if the device rejected IP control outright.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::NoIpControl)
    }

    /// Returns `true` if the local network stack failed us (the
    /// Wake-on-LAN socket could not be opened or written).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::WakeOnLan(_))
    }
}
