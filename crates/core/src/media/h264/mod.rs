//! H.264 RTP payload format (RFC 6184).
//!
//! Three payload structures are recognized, keyed by the NAL type in the
//! low 5 bits of the first payload byte:
//!
//! | Type | Structure | Section |
//! |------|-----------|---------|
//! | 1–23 | Single NAL unit | §5.6 |
//! | 24 | STAP-A, several small NALs with 2-byte size prefixes | §5.7.1 |
//! | 28 | FU-A, one NAL split across packets | §5.8 |
//!
//! ```text
//! FU indicator:  [F|NRI|Type=28]     (1 byte)
//! FU header:     [S|E|R|NAL_Type]    (1 byte)
//! Fragment data: [...]
//! ```
//!
//! [`H264Depacketizer`] reassembles access units from all three.
//! [`H264Packetizer`] produces single NAL and FU-A packets from Annex B input.

mod depacketizer;
mod packetizer;

pub use depacketizer::{Frame, H264Depacketizer, Packetization, SubFrame};
pub use packetizer::{H264Packetizer, PacketizerConfig};

pub const NALU_TYPE_IDR: u8 = 5;
pub const NALU_TYPE_SEI: u8 = 6;
pub const NALU_TYPE_SPS: u8 = 7;
pub const NALU_TYPE_PPS: u8 = 8;
pub const NALU_TYPE_STAP_A: u8 = 24;
pub const NALU_TYPE_FU_A: u8 = 28;

/// Annex B start code prepended to each NAL on output.
pub const START_CODE: [u8; 4] = [0, 0, 0, 1];

/// NAL unit type of a NAL header byte.
pub fn nalu_type(header: u8) -> u8 {
    header & 0x1F
}

/// Whether the NAL type carries stream metadata rather than picture data.
pub fn is_metadata(nalu_type: u8) -> bool {
    matches!(nalu_type, NALU_TYPE_SEI | NALU_TYPE_SPS | NALU_TYPE_PPS)
}

/// Split an H.264 Annex B byte stream into NAL units.
///
/// Both `00 00 01` and `00 00 00 01` start codes delimit units; start codes
/// are not part of the returned slices. Bytes before the first start code
/// are ignored, and empty units are skipped.
pub fn split_annex_b(data: &[u8]) -> Vec<&[u8]> {
    // (start code offset, NAL offset)
    let mut marks = Vec::new();
    let mut i = 0usize;
    while i + 3 <= data.len() {
        if data[i..i + 3] == [0, 0, 1] {
            let code = if i > 0 && data[i - 1] == 0 { i - 1 } else { i };
            marks.push((code, i + 3));
            i += 3;
        } else {
            i += 1;
        }
    }

    marks
        .iter()
        .enumerate()
        .filter_map(|(n, &(_, start))| {
            let end = marks.get(n + 1).map_or(data.len(), |&(code, _)| code);
            (start < end).then(|| &data[start..end])
        })
        .collect()
}
