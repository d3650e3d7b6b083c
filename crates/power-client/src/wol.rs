//! Wake-on-LAN sender.

use crate::error::PowerError;
use crate::power_trait::WakeSender;
use tokio::net::UdpSocket;
use tracing::info;

/// Default broadcast address when neither the machine nor the sender names one.
pub const DEFAULT_BROADCAST_ADDRESS: &str = "255.255.255.255";

/// Magic packet length: 6 bytes of 0xFF followed by 16 copies of the MAC.
pub const MAGIC_PACKET_LEN: usize = 102;

/// Sends magic packets over UDP broadcast.
#[derive(Debug, Clone)]
pub struct UdpWakeSender {
    default_port: u16,
    default_broadcast_address: String,
}

impl UdpWakeSender {
    /// Create a sender with the fallbacks used when a machine leaves port or
    /// broadcast address unset.
    pub fn new(default_port: u16, default_broadcast_address: impl Into<String>) -> Self {
        Self {
            default_port,
            default_broadcast_address: default_broadcast_address.into(),
        }
    }
}

/// Parses `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff` or `aabb.ccdd.eeff`.
pub fn parse_mac(mac: &str) -> Result<[u8; 6], PowerError> {
    let mut digits = Vec::with_capacity(12);
    for c in mac.chars() {
        match c {
            ':' | '-' | '.' => continue,
            c if c.is_ascii_hexdigit() => digits.push(c as u8),
            _ => return Err(PowerError::InvalidMac(mac.to_string())),
        }
    }
    if digits.len() != 12 {
        return Err(PowerError::InvalidMac(mac.to_string()));
    }

    let mut out = [0u8; 6];
    for (i, pair) in digits.chunks(2).enumerate() {
        let hex = std::str::from_utf8(pair).map_err(|_| PowerError::InvalidMac(mac.to_string()))?;
        out[i] = u8::from_str_radix(hex, 16).map_err(|_| PowerError::InvalidMac(mac.to_string()))?;
    }
    Ok(out)
}

/// Builds the magic packet for `mac`.
pub fn magic_packet(mac: [u8; 6]) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFFu8; MAGIC_PACKET_LEN];
    for chunk in packet[6..].chunks_mut(6) {
        chunk.copy_from_slice(&mac);
    }
    packet
}

#[async_trait::async_trait]
impl WakeSender for UdpWakeSender {
    async fn wake(&self, mac: &str, port: u16, broadcast_address: Option<&str>) -> Result<(), PowerError> {
        let packet = magic_packet(parse_mac(mac)?);

        let port = if port == 0 { self.default_port } else { port };
        let broadcast = broadcast_address
            .filter(|b| !b.is_empty())
            .unwrap_or(self.default_broadcast_address.as_str());

        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.set_broadcast(true)?;
        socket.send_to(&packet, (broadcast, port)).await?;

        info!("Sent magic packet to {} via {}:{}", mac, broadcast, port);
        Ok(())
    }
}
