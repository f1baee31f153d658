pub mod error;
pub mod media;
pub mod stream;
pub mod transfer;
pub mod transport;

pub use error::{Result, RtpError};
pub use media::h264::{Frame, H264Depacketizer, H264Packetizer, PacketizerConfig, SubFrame};
pub use media::packetizer::{RtpPack, RtpPacketizer, RtpType};
pub use media::playtime::PlaytimeEstimator;
pub use media::rtp::{HeaderEncoder, HeaderFields, RtpHeaderInfo};
pub use stream::{MediaInfo, Packet, Stream};
pub use transfer::{RtpTransfer, TransferConfig};
