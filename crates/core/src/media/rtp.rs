use super::RTP_HEADER_LEN;
use super::bits::BitWriter;
use crate::error::{Result, RtpError};

/// Decoded RTP header (RFC 3550 §5.1).
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|X|  CC   |M|     PT      |       Sequence Number         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             SSRC                              |
/// +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// |                  CSRC list (CC × 32 bits)                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      profile (if X)           |        length (words)         |
/// |                      extension data ...                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// `payload` borrows the packet buffer and spans exactly the payload: the
/// CSRC list, the extension and any trailing padding are excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpHeaderInfo<'a> {
    /// Always 2 for RFC 3550 traffic; not validated.
    pub version: u8,
    pub padding: bool,
    /// Value of the last packet byte when `padding` is set, else 0.
    pub padding_len: u8,
    pub extension: bool,
    pub extension_profile: u16,
    /// Extension length in 32-bit words, excluding the 4-byte extension header.
    pub extension_len: u16,
    pub csrc_count: u8,
    pub marker: bool,
    pub payload_type: u8,
    pub sequence: u16,
    pub timestamp: u32,
    pub ssrc: u32,
    /// Byte offset of `payload` within the packet.
    pub payload_offset: usize,
    pub payload: &'a [u8],
}

impl<'a> RtpHeaderInfo<'a> {
    /// Decode the header of `packet` and locate its payload.
    ///
    /// Fails with [`RtpError::MalformedHeader`] when the packet is shorter
    /// than the fixed header or when CC, extension or padding fields point
    /// outside the buffer.
    pub fn parse(packet: &'a [u8]) -> Result<Self> {
        let Some(fixed) = packet.first_chunk::<RTP_HEADER_LEN>() else {
            return Err(RtpError::MalformedHeader);
        };

        let csrc_count = fixed[0] & 0x0F;
        let extension = fixed[0] & 0x10 != 0;
        let padding = fixed[0] & 0x20 != 0;

        let mut start = RTP_HEADER_LEN + 4 * csrc_count as usize;
        if start > packet.len() {
            return Err(RtpError::MalformedHeader);
        }

        let mut extension_profile = 0;
        let mut extension_len = 0;
        if extension {
            let ext = packet
                .get(start..start + 4)
                .ok_or(RtpError::MalformedHeader)?;
            extension_profile = u16::from_be_bytes([ext[0], ext[1]]);
            extension_len = u16::from_be_bytes([ext[2], ext[3]]);
            start += 4 + 4 * extension_len as usize;
            if start > packet.len() {
                return Err(RtpError::MalformedHeader);
            }
        }

        let mut end = packet.len();
        let mut padding_len = 0;
        if padding {
            // packet is at least 12 bytes here, so `last` is present
            padding_len = packet.last().copied().unwrap_or_default();
            end = end
                .checked_sub(padding_len as usize)
                .ok_or(RtpError::MalformedHeader)?;
        }

        if start > end {
            return Err(RtpError::MalformedHeader);
        }

        Ok(Self {
            version: fixed[0] >> 6,
            padding,
            padding_len,
            extension,
            extension_profile,
            extension_len,
            csrc_count,
            marker: fixed[1] & 0x80 != 0,
            payload_type: fixed[1] & 0x7F,
            sequence: u16::from_be_bytes([fixed[2], fixed[3]]),
            timestamp: u32::from_be_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]),
            ssrc: u32::from_be_bytes([fixed[8], fixed[9], fixed[10], fixed[11]]),
            payload_offset: start,
            payload: &packet[start..end],
        })
    }
}

/// Per-call fields of an outbound RTP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    /// RTP payload type (7-bit, RFC 3551). Dynamic types use 96–127.
    pub payload_type: u8,
    /// Set on the last packet of an access unit (RFC 6184 §5.1).
    pub marker: bool,
    pub timestamp: u32,
    pub ssrc: u32,
}

/// RTP fixed header writer (RFC 3550 §5.1).
///
/// Owns the outbound sequence number. Every header written advances it by
/// one (wrapping) before serialization, so a fresh encoder starts at 1.
///
/// Version is always 2. Padding, extension, and CSRC count are always 0.
#[derive(Debug, Default)]
pub struct HeaderEncoder {
    sequence: u16,
}

impl HeaderEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the counter; the next header carries `sequence + 1`.
    pub fn with_sequence(sequence: u16) -> Self {
        Self { sequence }
    }

    /// Sequence number carried by the most recent header.
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Serialize a 12-byte header into `dest`, advancing the sequence number.
    pub fn fill(&mut self, dest: &mut [u8; RTP_HEADER_LEN], fields: HeaderFields) {
        self.sequence = self.sequence.wrapping_add(1);

        BitWriter::new(dest)
            .write(2, 2) // version
            .write_flag(false) // padding
            .write_flag(false) // extension
            .write(4, 0) // CSRC count
            .write_flag(fields.marker)
            .write(7, fields.payload_type as u64)
            .write(16, self.sequence as u64)
            .write(32, fields.timestamp as u64)
            .write(32, fields.ssrc as u64);
    }

    /// Serialize into a fresh array.
    pub fn write(&mut self, fields: HeaderFields) -> [u8; RTP_HEADER_LEN] {
        let mut header = [0u8; RTP_HEADER_LEN];
        self.fill(&mut header, fields);
        header
    }
}
