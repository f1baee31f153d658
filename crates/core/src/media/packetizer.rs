use std::fmt;

use super::rtp::{HeaderEncoder, HeaderFields};
use super::{MAX_RTP_PAYLOAD_LEN, RTP_HEADER_LEN};

/// Kind tag carried by every outbound packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RtpType {
    Audio,
    Video,
    AudioControl,
    VideoControl,
}

impl fmt::Display for RtpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
            Self::AudioControl => write!(f, "audio control"),
            Self::VideoControl => write!(f, "video control"),
        }
    }
}

/// One wire-ready RTP packet handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpPack {
    pub kind: RtpType,
    pub buffer: Vec<u8>,
}

/// Splits outbound data into RTP packets and fills their headers.
///
/// Holds the [`HeaderEncoder`] for one outbound stream, so sequence numbers
/// stay monotonic across every [`emit`](Self::emit) call on the instance.
#[derive(Debug, Default)]
pub struct RtpPacketizer {
    encoder: HeaderEncoder,
}

impl RtpPacketizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoder(encoder: HeaderEncoder) -> Self {
        Self { encoder }
    }

    /// Sequence number of the last packet emitted.
    pub fn sequence(&self) -> u16 {
        self.encoder.sequence()
    }

    /// Emit `data` to `sink` as one or more RTP packets.
    ///
    /// - `pre_formatted`: `data` already starts with a 12-byte header slot.
    ///   The whole buffer goes out as one packet whose header is encoded
    ///   from `fields` into the emitted copy; the caller's `data` is left
    ///   unchanged, so borrowed frame bytes can be re-sent as they are.
    /// - otherwise `data` is raw payload, cut into packets of at most
    ///   [`MAX_RTP_LEN`](super::MAX_RTP_LEN) bytes. Only the last one carries
    ///   the marker bit; `fields.marker` is ignored.
    ///
    /// Empty `data` or a missing sink emit nothing.
    pub fn emit(
        &mut self,
        data: &[u8],
        kind: RtpType,
        pre_formatted: bool,
        fields: HeaderFields,
        sink: Option<&mut dyn FnMut(RtpPack)>,
    ) {
        let Some(sink) = sink else {
            return;
        };
        if data.is_empty() {
            return;
        }

        if pre_formatted {
            let mut buffer = data.to_vec();
            let Some(header) = buffer.first_chunk_mut::<RTP_HEADER_LEN>() else {
                tracing::debug!(len = data.len(), "pre-formatted RTP data shorter than header");
                return;
            };
            self.encoder.fill(header, fields);
            sink(RtpPack { kind, buffer });
            return;
        }

        let mut chunks = data.chunks(MAX_RTP_PAYLOAD_LEN).peekable();
        let mut count = 0usize;
        while let Some(chunk) = chunks.next() {
            let marker = chunks.peek().is_none();
            let mut buffer = Vec::with_capacity(RTP_HEADER_LEN + chunk.len());
            buffer.extend_from_slice(&self.encoder.write(HeaderFields { marker, ..fields }));
            buffer.extend_from_slice(chunk);
            sink(RtpPack { kind, buffer });
            count += 1;
        }

        tracing::trace!(
            %kind,
            bytes = data.len(),
            rtp_packets = count,
            seq = self.encoder.sequence(),
            ts = fields.timestamp,
            "payload packetized"
        );
    }
}
