use std::ops::Range;

use super::{NALU_TYPE_FU_A, NALU_TYPE_STAP_A, START_CODE, nalu_type};
use crate::error::{Result, RtpError};
use crate::media::rtp::RtpHeaderInfo;
use crate::media::{FRAME_MAX_LEN, RTP_HEADER_LEN};

/// RTP payload structure a frame was reassembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packetization {
    /// One NAL unit in one packet (types 1–23).
    SingleNal,
    /// One NAL unit split across FU-A packets.
    FragmentationUnit,
    /// Several NAL units aggregated in one STAP-A packet.
    Aggregation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    Idle,
    /// FU-A fragments of one NAL are being collected.
    Assembling { nalu_type: u8 },
    /// Last `feed` completed a frame; it stays readable until the next call.
    Complete {
        nalu_type: u8,
        packetization: Packetization,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    nalu_type: u8,
    data: Range<usize>,
    rtp: Option<Range<usize>>,
    starts_nal: bool,
}

/// Backing storage of the frame under construction, reused across frames.
#[derive(Debug, Default)]
struct FrameArena {
    data: Vec<u8>,
    wire: Vec<u8>,
    parts: Vec<Part>,
    ssrc: u32,
    timestamp: u32,
}

impl FrameArena {
    fn reset(&mut self, header: &RtpHeaderInfo<'_>) {
        self.clear();
        self.ssrc = header.ssrc;
        self.timestamp = header.timestamp;
    }

    fn clear(&mut self) {
        self.data.clear();
        self.wire.clear();
        self.parts.clear();
    }

    fn push(
        &mut self,
        nalu_type: u8,
        data: &[u8],
        rtp: Option<&[u8]>,
        starts_nal: bool,
    ) -> Result<()> {
        let len = self.data.len() + data.len();
        if len > FRAME_MAX_LEN {
            return Err(RtpError::FrameTooLarge(len));
        }

        let start = self.data.len();
        self.data.extend_from_slice(data);
        let rtp = rtp.map(|bytes| {
            let start = self.wire.len();
            self.wire.extend_from_slice(bytes);
            start..self.wire.len()
        });
        self.parts.push(Part {
            nalu_type,
            data: start..self.data.len(),
            rtp,
            starts_nal,
        });
        Ok(())
    }
}

/// One NAL fragment of a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubFrame<'a> {
    pub nalu_type: u8,
    pub data: &'a [u8],
    /// RTP bytes that carried `data`: a 12-byte header slot followed by the
    /// carried bytes, ready for pre-formatted re-emission. `None` for the
    /// reconstructed FU-A NAL header and for STAP-A entries.
    pub rtp_data: Option<&'a [u8]>,
    /// False for FU-A fragment bodies, which continue the NAL begun by the
    /// preceding sub-frame.
    pub starts_nal: bool,
}

/// Borrowed view of a reassembled access unit.
///
/// Valid until the next [`H264Depacketizer::feed`]; copy out anything that
/// must outlive it.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    nalu_type: u8,
    packetization: Packetization,
    ssrc: u32,
    timestamp: u32,
    data: &'a [u8],
    wire: &'a [u8],
    parts: &'a [Part],
}

impl<'a> Frame<'a> {
    /// NAL type describing the frame: the single NAL's type, the
    /// fragmented NAL's type, or 24 for STAP-A.
    pub fn nalu_type(&self) -> u8 {
        self.nalu_type
    }

    pub fn packetization(&self) -> Packetization {
        self.packetization
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// All sub-frame bytes concatenated in order.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn sub_frame_count(&self) -> usize {
        self.parts.len()
    }

    pub fn sub_frames(&self) -> impl Iterator<Item = SubFrame<'a>> + use<'a> {
        let (data, wire) = (self.data, self.wire);
        self.parts.iter().map(move |part| SubFrame {
            nalu_type: part.nalu_type,
            data: &data[part.data.clone()],
            rtp_data: part.rtp.clone().map(|range| &wire[range]),
            starts_nal: part.starts_nal,
        })
    }

    /// Complete NAL units of the frame, headers included.
    pub fn nal_units(&self) -> Vec<&'a [u8]> {
        let mut ranges: Vec<Range<usize>> = Vec::new();
        for part in self.parts {
            match ranges.last_mut() {
                Some(last) if !part.starts_nal => last.end = part.data.end,
                _ => ranges.push(part.data.clone()),
            }
        }
        let data = self.data;
        ranges.into_iter().map(|range| &data[range]).collect()
    }

    /// Append the frame to `out` as an Annex B byte stream.
    pub fn to_annex_b(&self, out: &mut Vec<u8>) {
        for nal in self.nal_units() {
            out.extend_from_slice(&START_CODE);
            out.extend_from_slice(nal);
        }
    }
}

/// H.264 RTP depacketizer (RFC 6184).
///
/// Feed RTP packets in arrival order; each call either completes an access
/// unit, reports that more fragments are needed, or fails.
///
/// - **Single NAL Unit** (types 1–23): complete on arrival.
/// - **FU-A** (type 28): the start fragment opens a frame and contributes a
///   reconstructed NAL header (`indicator & 0xE0 | type`); the end fragment
///   completes it. A new start fragment drops any unfinished frame.
///   Continuations with no FU-A in progress are discarded.
/// - **STAP-A** (type 24): each size-prefixed entry becomes one sub-frame;
///   a truncated entry discards the whole packet.
///
/// Unsupported NAL types and malformed packets leave an in-progress FU-A
/// frame untouched.
#[derive(Debug)]
pub struct H264Depacketizer {
    state: FrameState,
    arena: FrameArena,
}

impl Default for H264Depacketizer {
    fn default() -> Self {
        Self::new()
    }
}

impl H264Depacketizer {
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
            arena: FrameArena::default(),
        }
    }

    /// Whether FU-A fragments of an unfinished NAL are buffered.
    pub fn is_assembling(&self) -> bool {
        matches!(self.state, FrameState::Assembling { .. })
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.state = FrameState::Idle;
        self.arena.clear();
    }

    /// Consume one RTP packet.
    ///
    /// Returns `Ok(Some(frame))` when an access unit is complete and
    /// `Ok(None)` while FU-A fragments are still outstanding.
    pub fn feed(&mut self, packet: &[u8]) -> Result<Option<Frame<'_>>> {
        if packet.len() < RTP_HEADER_LEN {
            return Err(RtpError::MalformedPacket);
        }
        let header = RtpHeaderInfo::parse(packet)?;
        let Some(&indicator) = header.payload.first() else {
            return Err(RtpError::MalformedPacket);
        };

        let complete = match nalu_type(indicator) {
            ty @ 1..=23 => self.single(packet, &header, ty)?,
            NALU_TYPE_FU_A => self.fragment(packet, &header)?,
            NALU_TYPE_STAP_A => self.aggregate(&header)?,
            other => return Err(RtpError::UnsupportedNaluType(other)),
        };

        if complete {
            Ok(self.frame())
        } else {
            Ok(None)
        }
    }

    fn single(&mut self, packet: &[u8], header: &RtpHeaderInfo<'_>, ty: u8) -> Result<bool> {
        self.drop_unfinished(header);
        self.arena.reset(header);
        self.state = FrameState::Idle;

        let payload_end = header.payload_offset + header.payload.len();
        let rtp = &packet[header.payload_offset - RTP_HEADER_LEN..payload_end];
        self.push(ty, header.payload, Some(rtp), true)?;
        self.state = FrameState::Complete {
            nalu_type: ty,
            packetization: Packetization::SingleNal,
        };
        Ok(true)
    }

    fn fragment(&mut self, packet: &[u8], header: &RtpHeaderInfo<'_>) -> Result<bool> {
        let &[indicator, fu_header, ref fragment @ ..] = header.payload else {
            return Err(RtpError::MalformedPacket);
        };
        let is_start = fu_header & 0x80 != 0;
        let is_end = fu_header & 0x40 != 0;

        let ty = if is_start {
            self.drop_unfinished(header);
            self.arena.reset(header);
            let ty = nalu_type(fu_header);
            self.state = FrameState::Assembling { nalu_type: ty };
            self.push(ty, &[(indicator & 0xE0) | ty], None, true)?;
            ty
        } else if let FrameState::Assembling { nalu_type } = self.state {
            nalu_type
        } else {
            tracing::debug!(
                seq = header.sequence,
                ts = header.timestamp,
                "FU-A continuation without start fragment dropped"
            );
            return Ok(false);
        };

        // header slot of the carrying packet followed by the fragment bytes,
        // padding excluded
        let payload_end = header.payload_offset + header.payload.len();
        let rtp = &packet[header.payload_offset + 2 - RTP_HEADER_LEN..payload_end];
        self.push(ty, fragment, Some(rtp), false)?;

        if is_end {
            self.state = FrameState::Complete {
                nalu_type: ty,
                packetization: Packetization::FragmentationUnit,
            };
        }
        Ok(is_end)
    }

    fn aggregate(&mut self, header: &RtpHeaderInfo<'_>) -> Result<bool> {
        self.drop_unfinished(header);
        self.arena.reset(header);
        self.state = FrameState::Idle;

        // skip the STAP-A NAL header
        let mut rest = &header.payload[1..];
        while let [hi, lo, tail @ ..] = rest {
            let size = u16::from_be_bytes([*hi, *lo]) as usize;
            if size > tail.len() {
                self.arena.clear();
                return Err(RtpError::MalformedAggregation {
                    declared: size,
                    remaining: tail.len(),
                });
            }
            let (nal, next) = tail.split_at(size);
            if let Some(&first) = nal.first() {
                self.push(nalu_type(first), nal, None, true)?;
            }
            rest = next;
        }

        self.state = FrameState::Complete {
            nalu_type: NALU_TYPE_STAP_A,
            packetization: Packetization::Aggregation,
        };
        Ok(true)
    }

    fn push(
        &mut self,
        nalu_type: u8,
        data: &[u8],
        rtp: Option<&[u8]>,
        starts_nal: bool,
    ) -> Result<()> {
        let pushed = self.arena.push(nalu_type, data, rtp, starts_nal);
        if pushed.is_err() {
            self.state = FrameState::Idle;
            self.arena.clear();
        }
        pushed
    }

    fn drop_unfinished(&self, header: &RtpHeaderInfo<'_>) {
        if let FrameState::Assembling { nalu_type } = self.state {
            tracing::debug!(
                nalu_type,
                parts = self.arena.parts.len(),
                bytes = self.arena.data.len(),
                next_seq = header.sequence,
                "unfinished FU-A frame dropped"
            );
        }
    }

    /// View of the completed frame; `None` unless the state is `Complete`.
    fn frame(&self) -> Option<Frame<'_>> {
        let FrameState::Complete {
            nalu_type,
            packetization,
        } = self.state
        else {
            return None;
        };

        tracing::trace!(
            nalu_type,
            ?packetization,
            parts = self.arena.parts.len(),
            bytes = self.arena.data.len(),
            ts = self.arena.timestamp,
            "frame reassembled"
        );

        Some(Frame {
            nalu_type,
            packetization,
            ssrc: self.arena.ssrc,
            timestamp: self.arena.timestamp,
            data: &self.arena.data,
            wire: &self.arena.wire,
            parts: &self.arena.parts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::packetizer::{RtpPack, RtpPacketizer, RtpType};
    use crate::media::rtp::{HeaderEncoder, HeaderFields};

    const TS: u32 = 0x0001_5F90;
    const SSRC: u32 = 0xCAFE_BABE;

    fn rtp(payload: &[u8]) -> Vec<u8> {
        let mut enc = HeaderEncoder::new();
        let mut p = enc
            .write(HeaderFields {
                payload_type: 96,
                marker: false,
                timestamp: TS,
                ssrc: SSRC,
            })
            .to_vec();
        p.extend_from_slice(payload);
        p
    }

    fn fu_a(nri_type: u8, fu_header: u8, data: &[u8]) -> Vec<u8> {
        let mut payload = vec![(nri_type & 0xE0) | NALU_TYPE_FU_A, fu_header];
        payload.extend_from_slice(data);
        rtp(&payload)
    }

    fn stap_a(entries: &[&[u8]]) -> Vec<u8> {
        let mut payload = vec![0x78];
        for entry in entries {
            payload.extend_from_slice(&(entry.len() as u16).to_be_bytes());
            payload.extend_from_slice(entry);
        }
        rtp(&payload)
    }

    // --- single NAL ---

    #[test]
    fn single_nal_completes_immediately() {
        let mut d = H264Depacketizer::new();
        let packet = rtp(&[0x65, 0x88, 0x84, 0x00]);
        let frame = d.feed(&packet).unwrap().expect("complete frame");
        assert_eq!(frame.nalu_type(), 5);
        assert_eq!(frame.packetization(), Packetization::SingleNal);
        assert_eq!(frame.ssrc(), SSRC);
        assert_eq!(frame.timestamp(), TS);
        assert_eq!(frame.sub_frame_count(), 1);

        let sub = frame.sub_frames().next().unwrap();
        assert_eq!(sub.nalu_type, 5);
        assert_eq!(sub.data, &[0x65, 0x88, 0x84, 0x00]);
        assert_eq!(sub.rtp_data, Some(&packet[..]));
    }

    #[test]
    fn single_nal_rtp_data_starts_one_header_before_payload() {
        let mut d = H264Depacketizer::new();
        let mut packet = rtp(&[]);
        packet[0] |= 0x01; // one CSRC
        packet.extend_from_slice(&[0, 0, 0, 9, 0x41, 0x9A]);
        let frame = d.feed(&packet).unwrap().unwrap();
        let sub = frame.sub_frames().next().unwrap();
        assert_eq!(sub.data, &[0x41, 0x9A]);
        assert_eq!(sub.rtp_data, Some(&packet[4..]));
    }

    #[test]
    fn single_nal_annex_b() {
        let mut d = H264Depacketizer::new();
        let frame = d.feed(&rtp(&[0x67, 0x42])).unwrap().unwrap();
        let mut out = Vec::new();
        frame.to_annex_b(&mut out);
        assert_eq!(out, [0, 0, 0, 1, 0x67, 0x42]);
    }

    // --- FU-A ---

    #[test]
    fn fu_a_reassembles_across_packets() {
        let mut d = H264Depacketizer::new();
        let start = fu_a(0x60, 0x80 | 7, &[1, 2, 3]);
        assert!(d.feed(&start).unwrap().is_none());
        assert!(d.is_assembling());
        assert!(d.feed(&fu_a(0x60, 7, &[4, 5])).unwrap().is_none());
        let end = fu_a(0x60, 0x40 | 7, &[6]);
        let frame = d.feed(&end).unwrap().expect("end fragment completes");

        assert_eq!(frame.nalu_type(), 7);
        assert_eq!(frame.packetization(), Packetization::FragmentationUnit);
        assert_eq!(frame.data(), &[0x67, 1, 2, 3, 4, 5, 6]);
        assert_eq!(frame.data_len(), 7);
        assert_eq!(frame.nal_units(), vec![&[0x67, 1, 2, 3, 4, 5, 6][..]]);

        let subs: Vec<_> = frame.sub_frames().collect();
        assert_eq!(subs.len(), 4);
        assert_eq!(subs[0].data, &[0x67]);
        assert_eq!(subs[0].rtp_data, None);
        assert!(subs[0].starts_nal);
        assert_eq!(subs[1].data, &[1, 2, 3]);
        assert!(!subs[1].starts_nal);
        // 12-byte header slot followed by the fragment
        assert_eq!(subs[1].rtp_data, Some(&start[2..]));
        assert_eq!(subs[3].rtp_data.map(<[u8]>::len), Some(RTP_HEADER_LEN + 1));
        assert!(subs.iter().all(|s| s.nalu_type == 7));
    }

    fn padded(mut packet: Vec<u8>, padding: &[u8]) -> Vec<u8> {
        packet[0] |= 0x20;
        packet.extend_from_slice(padding);
        packet
    }

    #[test]
    fn single_nal_rtp_data_excludes_padding() {
        let mut d = H264Depacketizer::new();
        let packet = padded(rtp(&[0x65, 0xAA, 0xBB]), &[0, 0, 3]);
        let frame = d.feed(&packet).unwrap().unwrap();
        let sub = frame.sub_frames().next().unwrap();
        assert_eq!(sub.data, &[0x65, 0xAA, 0xBB]);
        let rtp_data = sub.rtp_data.unwrap();
        assert_eq!(rtp_data.len(), RTP_HEADER_LEN + sub.data.len());

        // re-emitting the carried bytes must not turn padding into payload
        let mut out = Vec::new();
        RtpPacketizer::new().emit(
            rtp_data,
            RtpType::Video,
            true,
            HeaderFields {
                payload_type: 96,
                marker: true,
                timestamp: TS,
                ssrc: SSRC,
            },
            Some(&mut |pack: RtpPack| out.push(pack)),
        );
        let header = RtpHeaderInfo::parse(&out[0].buffer).unwrap();
        assert_eq!(header.payload, &[0x65, 0xAA, 0xBB]);
    }

    #[test]
    fn fu_a_rtp_data_excludes_padding() {
        let mut d = H264Depacketizer::new();
        d.feed(&padded(fu_a(0x60, 0x80 | 5, &[1, 2]), &[0, 2])).unwrap();
        let end = padded(fu_a(0x60, 0x40 | 5, &[3, 4, 5]), &[0, 0, 0, 4]);
        let frame = d.feed(&end).unwrap().unwrap();
        assert_eq!(frame.data(), &[0x65, 1, 2, 3, 4, 5]);
        let carried: Vec<_> = frame.sub_frames().filter(|s| s.rtp_data.is_some()).collect();
        assert_eq!(carried.len(), 2);
        for sub in carried {
            let rtp_data = sub.rtp_data.unwrap();
            assert_eq!(rtp_data.len(), RTP_HEADER_LEN + sub.data.len());
            assert_eq!(&rtp_data[RTP_HEADER_LEN..], sub.data);
        }
    }

    #[test]
    fn fu_a_start_and_end_in_one_packet() {
        let mut d = H264Depacketizer::new();
        let frame = d.feed(&fu_a(0x40, 0xC0 | 5, &[9, 9])).unwrap().unwrap();
        assert_eq!(frame.data(), &[0x45, 9, 9]);
    }

    #[test]
    fn fu_a_keeps_forbidden_bit_in_reconstructed_header() {
        let mut d = H264Depacketizer::new();
        let frame = d.feed(&fu_a(0xE0, 0xC0 | 1, &[7])).unwrap().unwrap();
        assert_eq!(frame.data()[0], 0xE1);
    }

    #[test]
    fn fu_a_continuation_without_start_is_dropped() {
        let mut d = H264Depacketizer::new();
        assert!(d.feed(&fu_a(0x60, 0x40 | 5, &[1])).unwrap().is_none());
        assert!(!d.is_assembling());
    }

    #[test]
    fn no_frame_view_without_completed_frame() {
        let mut d = H264Depacketizer::new();
        assert!(d.frame().is_none());
        d.feed(&fu_a(0x60, 0x80 | 5, &[1])).unwrap();
        assert!(d.frame().is_none());
        d.feed(&fu_a(0x60, 0x40 | 5, &[2])).unwrap();
        assert_eq!(d.frame().map(|f| f.nalu_type()), Some(5));
        d.reset();
        assert!(d.frame().is_none());
    }

    #[test]
    fn fu_a_does_not_extend_completed_frame() {
        let mut d = H264Depacketizer::new();
        d.feed(&fu_a(0x60, 0xC0 | 5, &[1])).unwrap().unwrap();
        assert!(d.feed(&fu_a(0x60, 0x40 | 5, &[2])).unwrap().is_none());
    }

    #[test]
    fn new_start_drops_unfinished_fragment() {
        let mut d = H264Depacketizer::new();
        d.feed(&fu_a(0x60, 0x80 | 5, &[1, 1])).unwrap();
        d.feed(&fu_a(0x60, 0x80 | 1, &[2])).unwrap();
        let frame = d.feed(&fu_a(0x60, 0x40 | 1, &[3])).unwrap().unwrap();
        assert_eq!(frame.nalu_type(), 1);
        assert_eq!(frame.data(), &[0x61, 2, 3]);
    }

    #[test]
    fn fu_a_too_short() {
        let mut d = H264Depacketizer::new();
        assert!(matches!(
            d.feed(&rtp(&[0x7C])),
            Err(RtpError::MalformedPacket)
        ));
    }

    #[test]
    fn errors_leave_fragment_in_progress() {
        let mut d = H264Depacketizer::new();
        d.feed(&fu_a(0x60, 0x80 | 5, &[1])).unwrap();
        assert!(matches!(
            d.feed(&rtp(&[0x1E, 0])),
            Err(RtpError::UnsupportedNaluType(30))
        ));
        assert!(d.feed(&rtp(&[])).is_err());
        assert!(d.feed(&[0x80; 4]).is_err());
        assert!(d.is_assembling());
        let frame = d.feed(&fu_a(0x60, 0x40 | 5, &[2])).unwrap().unwrap();
        assert_eq!(frame.data(), &[0x65, 1, 2]);
    }

    #[test]
    fn fu_a_frame_too_large() {
        let mut d = H264Depacketizer::new();
        let chunk = vec![0xAA; 60_000];
        d.feed(&fu_a(0x60, 0x80 | 5, &chunk)).unwrap();
        let mut result = Ok(None);
        for _ in 0..FRAME_MAX_LEN / chunk.len() {
            result = d.feed(&fu_a(0x60, 5, &chunk)).map(|f| f.map(|_| ()));
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(RtpError::FrameTooLarge(_))));
        assert!(!d.is_assembling());
    }

    // --- STAP-A ---

    #[test]
    fn stap_a_splits_entries() {
        let mut d = H264Depacketizer::new();
        let sps = [0x67, 0x42, 0x00, 0x1E, 0x95];
        let pps = [0x68, 0xCE, 0x38, 0x80, 0x01, 0x02, 0x03];
        let frame = d.feed(&stap_a(&[&sps, &pps])).unwrap().unwrap();

        assert_eq!(frame.nalu_type(), NALU_TYPE_STAP_A);
        assert_eq!(frame.packetization(), Packetization::Aggregation);
        let subs: Vec<_> = frame.sub_frames().collect();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].data.len(), 5);
        assert_eq!(subs[1].data.len(), 7);
        assert_eq!(subs[0].nalu_type, 7);
        assert_eq!(subs[1].nalu_type, 8);
        assert!(subs.iter().all(|s| s.rtp_data.is_none() && s.starts_nal));
        assert_eq!(frame.nal_units(), vec![&sps[..], &pps[..]]);

        let mut out = Vec::new();
        frame.to_annex_b(&mut out);
        assert_eq!(out.len(), 4 + 5 + 4 + 7);
        assert_eq!(&out[9..13], &START_CODE);
    }

    #[test]
    fn stap_a_truncated_entry_fails() {
        let mut d = H264Depacketizer::new();
        let mut packet = stap_a(&[&[0x67, 1, 2]]);
        packet.extend_from_slice(&[0x00, 0x09, 0x68, 0xCE]);
        assert!(matches!(
            d.feed(&packet),
            Err(RtpError::MalformedAggregation {
                declared: 9,
                remaining: 2
            })
        ));
        assert!(!d.is_assembling());
    }

    #[test]
    fn stap_a_ignores_trailing_byte() {
        let mut d = H264Depacketizer::new();
        let mut packet = stap_a(&[&[0x06, 0x05]]);
        packet.push(0x00);
        let frame = d.feed(&packet).unwrap().unwrap();
        assert_eq!(frame.sub_frame_count(), 1);
    }

    #[test]
    fn stap_a_drops_unfinished_fragment() {
        let mut d = H264Depacketizer::new();
        d.feed(&fu_a(0x60, 0x80 | 5, &[1])).unwrap();
        d.feed(&stap_a(&[&[0x67, 1]])).unwrap().unwrap();
        assert!(d.feed(&fu_a(0x60, 0x40 | 5, &[2])).unwrap().is_none());
    }

    // --- rejects ---

    #[test]
    fn short_packet() {
        let mut d = H264Depacketizer::new();
        assert!(matches!(
            d.feed(&[0x80; 11]),
            Err(RtpError::MalformedPacket)
        ));
    }

    #[test]
    fn bad_header() {
        let mut d = H264Depacketizer::new();
        let mut packet = rtp(&[0x65]);
        packet[0] |= 0x0F;
        assert!(matches!(d.feed(&packet), Err(RtpError::MalformedHeader)));
    }

    #[test]
    fn unsupported_types() {
        let mut d = H264Depacketizer::new();
        for ty in [0u8, 25, 26, 27, 29, 31] {
            assert!(matches!(
                d.feed(&rtp(&[ty, 0, 0])),
                Err(RtpError::UnsupportedNaluType(t)) if t == ty
            ));
        }
    }
}
