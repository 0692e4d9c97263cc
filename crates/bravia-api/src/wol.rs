//! Wake-on-LAN: magic packet construction and UDP broadcast.
//!
//! A magic packet is six `0xFF` bytes followed by the target's 6-byte
//! hardware address repeated sixteen times (102 bytes). It is sent a few
//! times to the broadcast address on the discard port; delivery is not
//! confirmed, the caller checks power status afterwards.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::Error;

/// UDP port magic packets are sent to.
pub const WOL_PORT: u16 = 9;

/// How many times each wake-up is broadcast.
pub const WOL_REPEAT: usize = 5;

/// Size of a magic packet in bytes.
pub const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;

/// Default destination: limited broadcast on the discard port.
pub const BROADCAST_TARGET: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::BROADCAST), WOL_PORT);

/// A 48-bit hardware address.
///
/// Parses colon- or dash-separated hex (`aa:bb:cc:dd:ee:ff`,
/// `AA-BB-CC-DD-EE-FF`) and displays as lowercase colon-separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMac(s.to_owned());
        let mut octets = [0u8; 6];
        let mut parts = s.trim().split([':', '-']);
        for slot in &mut octets {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Build the magic packet for `mac`.
pub fn magic_packet(mac: MacAddress) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFF; MAGIC_PACKET_LEN];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&mac.0);
    }
    packet
}

/// Broadcast the magic packet for `mac` to `target`, [`WOL_REPEAT`] times.
pub async fn wake_on_lan(mac: MacAddress, target: SocketAddr) -> Result<(), Error> {
    let packet = magic_packet(mac);
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.set_broadcast(true)?;
    for _ in 0..WOL_REPEAT {
        socket.send_to(&packet, target).await?;
    }
    debug!(%mac, %target, "sent wake-on-lan packets");
    Ok(())
}
