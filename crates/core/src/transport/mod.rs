//! Network transport for RTP packets.
//!
//! - **UDP** ([`udp`]): plain RTP over UDP (RFC 3550 §11), one datagram
//!   per packet. Used for both sending packetized access units and
//!   receiving packets for depacketization.

pub mod udp;

pub use udp::UdpTransport;
