use crate::error::Result;
use crate::media::h264::H264Depacketizer;
use crate::media::packetizer::{RtpPack, RtpPacketizer, RtpType};
use crate::media::playtime::PlaytimeEstimator;
use crate::media::rtp::{HeaderEncoder, HeaderFields};
use crate::stream::{Packet, Stream};

/// Per-stream settings for [`RtpTransfer`].
#[derive(Debug, Clone, Default)]
pub struct TransferConfig {
    /// Frame interval assumed across timestamp resets until one has been
    /// measured, in 90 kHz ticks (3600 = 25 fps).
    pub initial_interval: u32,
    /// Sequence number preceding the first outbound packet.
    pub initial_sequence: u16,
}

/// Receive and send state of one RTP video stream.
///
/// Bundles the [`H264Depacketizer`], the [`PlaytimeEstimator`] fed with each
/// completed frame's timestamp, and the outbound [`RtpPacketizer`]. Requires
/// `&mut self` for every operation; use one instance per stream.
#[derive(Debug)]
pub struct RtpTransfer {
    depacketizer: H264Depacketizer,
    playtime: PlaytimeEstimator,
    packetizer: RtpPacketizer,
}

impl Default for RtpTransfer {
    fn default() -> Self {
        Self::new(TransferConfig::default())
    }
}

impl RtpTransfer {
    pub fn new(config: TransferConfig) -> Self {
        Self {
            depacketizer: H264Depacketizer::new(),
            playtime: PlaytimeEstimator::with_interval(config.initial_interval),
            packetizer: RtpPacketizer::with_encoder(HeaderEncoder::with_sequence(
                config.initial_sequence,
            )),
        }
    }

    pub fn playtime(&self) -> &PlaytimeEstimator {
        &self.playtime
    }

    /// Depacketize one RTP packet and, when it completes an access unit,
    /// return it as an owned [`Packet`] stamped with its PTS.
    pub fn receive(&mut self, rtp_packet: &[u8]) -> Result<Option<Packet>> {
        let Some(frame) = self.depacketizer.feed(rtp_packet)? else {
            return Ok(None);
        };
        let pts = self.playtime.estimate(frame.timestamp());
        Ok(Some(Packet::from_frame(&frame, pts)))
    }

    /// [`receive`](Self::receive), then enqueue the packet on `stream`.
    ///
    /// Returns whether a frame was enqueued. Queue rejections are logged and
    /// reported as `false`; only depacketization errors are returned.
    pub fn receive_into(&mut self, rtp_packet: &[u8], stream: &Stream) -> Result<bool> {
        let Some(packet) = self.receive(rtp_packet)? else {
            return Ok(false);
        };
        match stream.send(packet) {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(stream = %stream.media_info.stream_id, error = %e, "frame not enqueued");
                Ok(false)
            }
        }
    }

    /// Emit outbound data as RTP; see [`RtpPacketizer::emit`].
    pub fn send(
        &mut self,
        data: &[u8],
        kind: RtpType,
        pre_formatted: bool,
        fields: HeaderFields,
        sink: Option<&mut dyn FnMut(RtpPack)>,
    ) {
        self.packetizer.emit(data, kind, pre_formatted, fields, sink);
    }
}
