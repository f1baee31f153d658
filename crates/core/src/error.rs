//! Error types for the RTP/H.264 library.

/// Errors that can occur while decoding, reassembling or delivering RTP.
///
/// Variants map to specific failure modes across the stack:
///
/// - **Header**: [`MalformedPacket`](Self::MalformedPacket),
///   [`MalformedHeader`](Self::MalformedHeader).
/// - **Payload format**: [`MalformedAggregation`](Self::MalformedAggregation),
///   [`UnsupportedNaluType`](Self::UnsupportedNaluType),
///   [`FrameTooLarge`](Self::FrameTooLarge).
/// - **Queue**: [`StreamClosed`](Self::StreamClosed),
///   [`StreamFull`](Self::StreamFull).
/// - **Transport**: [`Io`](Self::Io).
///
/// None of these are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum RtpError {
    /// Packet too short to hold a 12-byte RTP fixed header, or a payload too
    /// short for its payload format.
    #[error("malformed RTP packet")]
    MalformedPacket,

    /// CSRC count, extension length or padding imply a payload span outside
    /// the packet (RFC 3550 §5.1, §5.3.1).
    #[error("malformed RTP header")]
    MalformedHeader,

    /// A STAP-A entry declares more bytes than remain in the payload
    /// (RFC 6184 §5.7.1).
    #[error("STAP-A entry of {declared} bytes exceeds remaining {remaining} bytes")]
    MalformedAggregation { declared: usize, remaining: usize },

    /// NAL unit type is neither single NAL (1–23), STAP-A (24) nor FU-A (28).
    #[error("unsupported H.264 NAL unit type {0}")]
    UnsupportedNaluType(u8),

    /// Reassembled access unit would exceed [`FRAME_MAX_LEN`](crate::media::FRAME_MAX_LEN).
    #[error("frame of {0} bytes exceeds the frame buffer")]
    FrameTooLarge(usize),

    /// [`Stream::close`](crate::stream::Stream::close) was called.
    #[error("stream closed")]
    StreamClosed,

    /// The bounded frame queue has no free slot.
    #[error("stream queue full")]
    StreamFull,

    /// No stream identifier could be extracted from the URL.
    #[error("invalid stream url: {0}")]
    InvalidStreamUrl(String),

    /// Underlying I/O or socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, RtpError>`.
pub type Result<T> = std::result::Result<T, RtpError>;
