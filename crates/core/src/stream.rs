//! Consumer side of the pipeline: media descriptors and the frame queue.
//!
//! A [`Stream`] carries finished [`Packet`]s from the RTP receive path to a
//! consumer through a bounded, in-order queue. Enqueueing never blocks:
//! a full or closed queue rejects the packet and the producer moves on.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use parking_lot::Mutex;

use crate::error::{Result, RtpError};
use crate::media::h264::{Frame, START_CODE};

/// Capacity of a stream's frame queue.
pub const MAX_QUEUE_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VideoCodec {
    #[default]
    None,
    Any,
    H264,
    H265,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AudioCodec {
    #[default]
    None,
    Any,
    Aac,
    Mp3,
    G711,
}

/// What a consumer asked for; carried alongside a stream, not interpreted
/// by the RTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaInfo {
    pub is_live: bool,
    pub stream_id: String,
    pub video: VideoCodec,
    pub audio: AudioCodec,
    pub needs_transcode: bool,
    /// Playback speed multiplier for recorded media.
    pub speed: i32,
    pub url: String,
}

/// One NAL fragment of a queued [`Packet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSlice {
    pub data: Vec<u8>,
    /// Header-inclusive RTP bytes for pass-through re-transmission.
    pub rtp_data: Option<Vec<u8>>,
    /// False when `data` continues the NAL of the previous slice.
    pub starts_nal: bool,
}

/// An owned access unit ready for a consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    pub is_video: bool,
    /// SPS, PPS or SEI rather than picture data.
    pub is_metadata: bool,
    /// Presentation time in milliseconds.
    pub timestamp_ms: u32,
    pub rtp_timestamp: u32,
    /// 33-bit presentation timestamp, 90 kHz.
    pub pts: i64,
    pub data: Vec<FrameSlice>,
    pub data_len: usize,
}

impl Packet {
    /// Copy a depacketized frame out of the depacketizer's buffer.
    pub fn from_frame(frame: &Frame<'_>, pts: i64) -> Self {
        let data: Vec<FrameSlice> = frame
            .sub_frames()
            .map(|sub| FrameSlice {
                data: sub.data.to_vec(),
                rtp_data: sub.rtp_data.map(<[u8]>::to_vec),
                starts_nal: sub.starts_nal,
            })
            .collect();
        let is_metadata = frame
            .sub_frames()
            .all(|sub| crate::media::h264::is_metadata(sub.nalu_type));

        Self {
            is_video: true,
            is_metadata: is_metadata && !data.is_empty(),
            timestamp_ms: (pts / 90) as u32,
            rtp_timestamp: frame.timestamp(),
            pts,
            data,
            data_len: frame.data_len(),
        }
    }

    /// Append the packet's NAL units to `out` as an Annex B byte stream.
    pub fn to_annex_b(&self, out: &mut Vec<u8>) {
        for slice in &self.data {
            if slice.starts_nal {
                out.extend_from_slice(&START_CODE);
            }
            out.extend_from_slice(&slice.data);
        }
    }
}

/// A media stream with a bounded queue of [`Packet`]s.
///
/// Cheap to share by reference across threads: the sender sits behind a
/// `Mutex` so [`close`](Self::close) can drop it while producers hold `&Stream`.
pub struct Stream {
    sender: Mutex<Option<SyncSender<Packet>>>,
    pub has_video: bool,
    pub has_audio: bool,
    pub media_info: MediaInfo,
}

impl Stream {
    /// Create a stream and the receiving end of its queue.
    pub fn new(has_video: bool, has_audio: bool, media_info: MediaInfo) -> (Self, Receiver<Packet>) {
        Self::with_capacity(has_video, has_audio, media_info, MAX_QUEUE_LEN)
    }

    pub fn with_capacity(
        has_video: bool,
        has_audio: bool,
        media_info: MediaInfo,
        capacity: usize,
    ) -> (Self, Receiver<Packet>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        let stream = Self {
            sender: Mutex::new(Some(tx)),
            has_video,
            has_audio,
            media_info,
        };
        (stream, rx)
    }

    /// Enqueue without blocking.
    ///
    /// Fails with [`RtpError::StreamFull`] when the queue is at capacity and
    /// [`RtpError::StreamClosed`] after [`close`](Self::close) or once the
    /// receiver is gone. The packet is dropped in both cases.
    pub fn send(&self, packet: Packet) -> Result<()> {
        let sender = self.sender.lock();
        let tx = sender.as_ref().ok_or(RtpError::StreamClosed)?;
        tx.try_send(packet).map_err(|e| match e {
            TrySendError::Full(_) => {
                tracing::debug!(stream = %self.media_info.stream_id, "queue full, packet dropped");
                RtpError::StreamFull
            }
            TrySendError::Disconnected(_) => RtpError::StreamClosed,
        })
    }

    /// Stop accepting packets. Already queued packets stay readable.
    pub fn close(&self) {
        if self.sender.lock().take().is_some() {
            tracing::debug!(stream = %self.media_info.stream_id, "stream closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }
}

/// Extract the stream identifier from a URL.
///
/// The identifier is the run of word characters (`[A-Za-z0-9_]`) right
/// after the last `/` that is followed by one.
///
/// `rtsp://host:554/live/cam_1`   → `cam_1`
/// `rtsp://host:554/live/cam1.sdp` → `cam1`
/// `rtsp://host:554/live/`        → `live`
pub fn stream_id(url: &str) -> Result<&str> {
    url.match_indices('/')
        .rev()
        .find_map(|(slash, _)| {
            let rest = &url[slash + 1..];
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            (end > 0).then(|| &rest[..end])
        })
        .ok_or_else(|| RtpError::InvalidStreamUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(n: u32) -> Packet {
        Packet {
            rtp_timestamp: n,
            ..Packet::default()
        }
    }

    #[test]
    fn stream_id_last_segment() {
        assert_eq!(stream_id("rtsp://host:554/live/cam_1").unwrap(), "cam_1");
    }

    #[test]
    fn stream_id_stops_at_non_word() {
        assert_eq!(stream_id("rtsp://host:554/live/cam1.sdp").unwrap(), "cam1");
        assert_eq!(stream_id("http://host/play/abc?token=x").unwrap(), "abc");
    }

    #[test]
    fn stream_id_trailing_slash() {
        assert_eq!(stream_id("rtsp://host:554/live/").unwrap(), "live");
    }

    #[test]
    fn stream_id_host_only() {
        assert_eq!(stream_id("rtsp://camera").unwrap(), "camera");
    }

    #[test]
    fn stream_id_invalid() {
        assert!(matches!(
            stream_id("no-slashes"),
            Err(RtpError::InvalidStreamUrl(_))
        ));
        assert!(stream_id("rtsp://").is_err());
    }

    #[test]
    fn annex_b_joins_continuation_slices() {
        let slice = |data: &[u8], starts_nal| FrameSlice {
            data: data.to_vec(),
            rtp_data: None,
            starts_nal,
        };
        let p = Packet {
            data: vec![slice(&[0x65], true), slice(&[1, 2], false), slice(&[0x41], true)],
            ..Packet::default()
        };
        let mut out = Vec::new();
        p.to_annex_b(&mut out);
        assert_eq!(out, vec![0, 0, 0, 1, 0x65, 1, 2, 0, 0, 0, 1, 0x41]);
    }

    #[test]
    fn send_and_receive_in_order() {
        let (stream, rx) = Stream::new(true, false, MediaInfo::default());
        stream.send(packet(1)).unwrap();
        stream.send(packet(2)).unwrap();
        assert_eq!(rx.recv().unwrap().rtp_timestamp, 1);
        assert_eq!(rx.recv().unwrap().rtp_timestamp, 2);
    }

    #[test]
    fn full_queue_rejects() {
        let (stream, rx) = Stream::with_capacity(true, false, MediaInfo::default(), 1);
        stream.send(packet(1)).unwrap();
        assert!(matches!(stream.send(packet(2)), Err(RtpError::StreamFull)));
        assert_eq!(rx.recv().unwrap().rtp_timestamp, 1);
        stream.send(packet(3)).unwrap();
    }

    #[test]
    fn closed_stream_rejects_and_drains() {
        let (stream, rx) = Stream::new(true, false, MediaInfo::default());
        stream.send(packet(7)).unwrap();
        stream.close();
        stream.close();
        assert!(stream.is_closed());
        assert!(matches!(stream.send(packet(8)), Err(RtpError::StreamClosed)));
        assert_eq!(rx.recv().unwrap().rtp_timestamp, 7);
        assert!(rx.recv().is_err());
    }

    #[test]
    fn dropped_receiver_reports_closed() {
        let (stream, rx) = Stream::new(true, false, MediaInfo::default());
        drop(rx);
        assert!(matches!(stream.send(packet(1)), Err(RtpError::StreamClosed)));
    }
}
