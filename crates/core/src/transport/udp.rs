use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::error::Result;
use crate::media::MAX_RTP_LEN;
use crate::media::packetizer::RtpPack;

/// Receive buffer size: room for any datagram, not just [`MAX_RTP_LEN`].
pub const RECV_BUFFER_LEN: usize = 64 * 1024;

/// UDP socket carrying RTP packets.
///
/// This layer is address-only: it knows nothing about streams or frames.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind to `addr` (use port 0 for an ephemeral sender socket).
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        tracing::debug!(addr = %socket.local_addr()?, "RTP socket bound");
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Send raw bytes to a specific socket address.
    pub fn send_to(&self, payload: &[u8], addr: SocketAddr) -> Result<usize> {
        Ok(self.socket.send_to(payload, addr)?)
    }

    pub fn send_pack(&self, pack: &RtpPack, addr: SocketAddr) -> Result<usize> {
        if pack.buffer.len() > MAX_RTP_LEN {
            tracing::debug!(len = pack.buffer.len(), "sending oversized RTP packet");
        }
        self.send_to(&pack.buffer, addr)
    }

    /// Block until one datagram arrives; returns its length and sender.
    pub fn recv(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        Ok(self.socket.recv_from(buf)?)
    }

    pub fn set_read_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        Ok(self.socket.set_read_timeout(timeout)?)
    }
}
