use super::{NALU_TYPE_FU_A, NALU_TYPE_PPS, NALU_TYPE_SPS, nalu_type, split_annex_b};
use crate::media::packetizer::{RtpPack, RtpPacketizer, RtpType};
use crate::media::rtp::HeaderFields;
use crate::media::{MAX_RTP_PAYLOAD_LEN, RTP_HEADER_LEN};

/// Outbound stream parameters for [`H264Packetizer`].
#[derive(Debug, Clone)]
pub struct PacketizerConfig {
    /// RTP payload type. H.264 conventionally uses dynamic type 96.
    pub payload_type: u8,
    /// Synchronization source identifier (RFC 3550 §8.1).
    pub ssrc: u32,
    /// Tag attached to every emitted packet.
    pub kind: RtpType,
    /// RTP timestamp of the first access unit.
    pub initial_timestamp: u32,
}

impl Default for PacketizerConfig {
    /// Payload type 96 and a random SSRC, chosen randomly to minimize the
    /// probability of collisions between independent sessions.
    fn default() -> Self {
        Self {
            payload_type: 96,
            ssrc: rand::random::<u32>(),
            kind: RtpType::Video,
            initial_timestamp: 0,
        }
    }
}

/// H.264 RTP packetizer (RFC 6184).
///
/// Converts Annex B access units into RTP packets:
///
/// - **Single NAL Unit** (§5.6): NALs of at most
///   [`MAX_RTP_PAYLOAD_LEN`] bytes go out as-is.
/// - **FU-A** (§5.8): larger NALs are split; each fragment carries the FU
///   indicator (`F|NRI` of the NAL, type 28) and FU header (`S|E|R|type`).
///
/// Every payload is staged behind a 12-byte header slot and handed to
/// [`RtpPacketizer`] pre-formatted, so sequence numbers come from one
/// counter. The marker bit is set on the last packet of each access unit.
#[derive(Debug)]
pub struct H264Packetizer {
    config: PacketizerConfig,
    rtp: RtpPacketizer,
    timestamp: u32,
    staging: Vec<u8>,
    sps: Option<Vec<u8>>,
    pps: Option<Vec<u8>>,
}

impl H264Packetizer {
    pub fn new(config: PacketizerConfig) -> Self {
        tracing::debug!(
            pt = config.payload_type,
            ssrc = format_args!("{:#010X}", config.ssrc),
            "H.264 packetizer created"
        );
        Self {
            timestamp: config.initial_timestamp,
            config,
            rtp: RtpPacketizer::new(),
            staging: Vec::with_capacity(RTP_HEADER_LEN + MAX_RTP_PAYLOAD_LEN),
            sps: None,
            pps: None,
        }
    }

    pub fn config(&self) -> &PacketizerConfig {
        &self.config
    }

    /// RTP timestamp the next access unit will carry.
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Sequence number of the last packet emitted.
    pub fn sequence(&self) -> u16 {
        self.rtp.sequence()
    }

    /// Most recent SPS seen in the bitstream.
    pub fn sps(&self) -> Option<&[u8]> {
        self.sps.as_deref()
    }

    /// Most recent PPS seen in the bitstream.
    pub fn pps(&self) -> Option<&[u8]> {
        self.pps.as_deref()
    }

    /// Packetize one Annex B access unit, then advance the RTP timestamp by
    /// `timestamp_increment` (`90000 / fps` for video).
    ///
    /// Returns the number of packets handed to `sink`.
    pub fn packetize(
        &mut self,
        access_unit: &[u8],
        timestamp_increment: u32,
        sink: &mut dyn FnMut(RtpPack),
    ) -> usize {
        let nal_units = split_annex_b(access_unit);
        let mut count = 0usize;
        let mut counted = |pack: RtpPack| {
            count += 1;
            sink(pack);
        };

        for (i, nal) in nal_units.iter().enumerate() {
            match nalu_type(nal[0]) {
                NALU_TYPE_SPS => self.sps = Some(nal.to_vec()),
                NALU_TYPE_PPS => self.pps = Some(nal.to_vec()),
                _ => {}
            }
            let is_last = i + 1 == nal_units.len();
            self.packetize_nal(nal, is_last, &mut counted);
        }

        tracing::trace!(
            nal_count = nal_units.len(),
            rtp_packets = count,
            frame_bytes = access_unit.len(),
            seq = self.rtp.sequence(),
            ts = self.timestamp,
            "frame packetized"
        );

        self.timestamp = self.timestamp.wrapping_add(timestamp_increment);
        count
    }

    fn packetize_nal(&mut self, nal: &[u8], is_last: bool, sink: &mut dyn FnMut(RtpPack)) {
        if nal.len() <= MAX_RTP_PAYLOAD_LEN {
            self.stage(&[], nal);
            self.flush(is_last, sink);
            return;
        }

        let header = nal[0];
        let indicator = (header & 0xE0) | NALU_TYPE_FU_A;
        let mut fragments = nal[1..].chunks(MAX_RTP_PAYLOAD_LEN - 2).peekable();
        let mut first = true;
        while let Some(fragment) = fragments.next() {
            let last = fragments.peek().is_none();
            let mut fu_header = nalu_type(header);
            if first {
                fu_header |= 0x80;
            }
            if last {
                fu_header |= 0x40;
            }
            self.stage(&[indicator, fu_header], fragment);
            self.flush(is_last && last, sink);
            first = false;
        }

        tracing::trace!(
            nal_type = nalu_type(header),
            nal_size = nal.len(),
            "FU-A fragmented NAL unit"
        );
    }

    fn stage(&mut self, prefix: &[u8], body: &[u8]) {
        self.staging.clear();
        self.staging.resize(RTP_HEADER_LEN, 0);
        self.staging.extend_from_slice(prefix);
        self.staging.extend_from_slice(body);
    }

    fn flush(&mut self, marker: bool, sink: &mut dyn FnMut(RtpPack)) {
        let fields = HeaderFields {
            payload_type: self.config.payload_type,
            marker,
            timestamp: self.timestamp,
            ssrc: self.config.ssrc,
        };
        self.rtp
            .emit(&self.staging, self.config.kind, true, fields, Some(sink));
    }
}
