// bravia-api: Async Rust client for Sony Bravia IP control (JSON services + IRCC)

pub mod audio;
pub mod auth;
pub mod client;
pub mod commands;
pub mod content;
pub mod error;
pub mod request;
pub mod session;
pub mod system;
pub mod transport;
pub mod wol;

pub use audio::{DEFAULT_AUDIO_OUTPUT, VolumeInfo};
pub use client::BraviaClient;
pub use commands::MediaCommand;
pub use content::PlayingContent;
pub use error::Error;
pub use request::{Reply, RpcRequest, Service};
pub use session::{CookieJar, Session};
pub use system::{PowerStatus, SystemInfo};
pub use transport::TransportConfig;
pub use wol::MacAddress;
