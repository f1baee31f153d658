//! RTP header handling and H.264 payload formats.
//!
//! ## RTP overview (RFC 3550)
//!
//! Every RTP packet starts with a 12-byte fixed header ([`rtp::RtpHeaderInfo`]
//! on the receive side, [`rtp::HeaderEncoder`] on the send side) containing:
//!
//! - **Sequence number** (16-bit, wrapping): used for reordering and loss detection.
//! - **Timestamp** (32-bit): media clock, 90 kHz for video.
//! - **SSRC** (32-bit): identifies the sender.
//! - **Marker bit**: set on the last packet of an access unit (frame).
//!
//! The fixed header may be followed by a CSRC list and a header extension,
//! and the packet may end with padding. The decoder strips all three.
//!
//! ## Pipeline
//!
//! | Direction | Stage | Module |
//! |-----------|-------|--------|
//! | receive | header decode | [`rtp`] |
//! | receive | access unit reassembly (RFC 6184) | [`h264`] |
//! | receive | presentation timestamp | [`playtime`] |
//! | send | NAL → RTP payload (RFC 6184) | [`h264`] |
//! | send | payload → bounded RTP packets | [`packetizer`] |

pub mod bits;
pub mod h264;
pub mod packetizer;
pub mod playtime;
pub mod rtp;

/// Largest RTP packet produced or expected, header included.
pub const MAX_RTP_LEN: usize = 1456;

/// Length of the RTP fixed header (no CSRC list, no extension).
pub const RTP_HEADER_LEN: usize = 12;

/// Largest payload that fits in one [`MAX_RTP_LEN`] packet.
pub const MAX_RTP_PAYLOAD_LEN: usize = MAX_RTP_LEN - RTP_HEADER_LEN;

/// Upper bound on the NAL bytes of one reassembled access unit.
pub const FRAME_MAX_LEN: usize = 1024 * 1024;

/// RTP clock rate for video (RFC 6184 §8.1).
pub const VIDEO_CLOCK_RATE: u32 = 90_000;
