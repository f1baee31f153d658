mod capture;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use rtp_h264::media::VIDEO_CLOCK_RATE;
use rtp_h264::media::h264::{START_CODE, nalu_type, split_annex_b};
use rtp_h264::stream::{MediaInfo, VideoCodec};
use rtp_h264::transport::UdpTransport;
use rtp_h264::transport::udp::RECV_BUFFER_LEN;
use rtp_h264::{
    H264Depacketizer, H264Packetizer, PacketizerConfig, PlaytimeEstimator, Result, RtpError,
    RtpPack, RtpTransfer, Stream, TransferConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rtp-h264", about = "Pack and unpack H.264 elementary streams as RTP")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Packetize an Annex B file into an RTP capture and/or a UDP peer
    Pack(PackArgs),
    /// Reassemble an RTP capture into an Annex B file
    Unpack(UnpackArgs),
    /// Receive RTP over UDP and write the reassembled Annex B stream
    Listen(ListenArgs),
}

#[derive(Args)]
struct PackArgs {
    /// Annex B H.264 input
    #[arg(long, short)]
    input: PathBuf,
    /// Length-prefixed RTP capture to write
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Send packets to this UDP address, paced at the frame rate
    #[arg(long)]
    dest: Option<SocketAddr>,
    #[arg(long, default_value_t = 25)]
    fps: u32,
    #[arg(long, default_value_t = 96)]
    payload_type: u8,
    /// Random when omitted
    #[arg(long)]
    ssrc: Option<u32>,
}

#[derive(Args)]
struct UnpackArgs {
    /// Length-prefixed RTP capture
    #[arg(long, short)]
    input: PathBuf,
    /// Annex B H.264 output
    #[arg(long, short)]
    output: PathBuf,
}

#[derive(Args)]
struct ListenArgs {
    /// Bind address (host:port)
    #[arg(long, short, default_value = "0.0.0.0:5004")]
    bind: String,
    /// Annex B H.264 output
    #[arg(long, short)]
    output: PathBuf,
    /// Stop after this many RTP packets
    #[arg(long)]
    count: Option<usize>,
    /// Stop after this many seconds without a packet
    #[arg(long, default_value_t = 5)]
    idle_secs: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Pack(args) => pack(args),
        Command::Unpack(args) => unpack(args),
        Command::Listen(args) => listen(args),
    };

    if let Err(e) = result {
        eprintln!("rtp-h264: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn pack(args: PackArgs) -> Result<()> {
    let bitstream = fs::read(&args.input)?;
    let mut output = args
        .output
        .as_ref()
        .map(|path| File::create(path).map(BufWriter::new))
        .transpose()?;
    let udp = match args.dest {
        Some(_) => Some(UdpTransport::bind("0.0.0.0:0")?),
        None => None,
    };

    let fps = args.fps.max(1);
    let mut config = PacketizerConfig {
        payload_type: args.payload_type,
        ..PacketizerConfig::default()
    };
    if let Some(ssrc) = args.ssrc {
        config.ssrc = ssrc;
    }
    let mut packetizer = H264Packetizer::new(config);

    let units = access_units(&bitstream);
    let mut packs = Vec::new();
    let mut total = 0usize;
    for unit in &units {
        packs.clear();
        packetizer.packetize(unit, VIDEO_CLOCK_RATE / fps, &mut |pack: RtpPack| {
            packs.push(pack)
        });
        for pack in &packs {
            if let Some(out) = output.as_mut() {
                capture::write_packet(out, &pack.buffer)?;
            }
            if let (Some(udp), Some(dest)) = (&udp, args.dest) {
                udp.send_pack(pack, dest)?;
            }
        }
        total += packs.len();
        if udp.is_some() {
            thread::sleep(Duration::from_secs(1) / fps);
        }
    }
    if let Some(out) = output.as_mut() {
        out.flush()?;
    }

    tracing::info!(
        access_units = units.len(),
        rtp_packets = total,
        last_seq = packetizer.sequence(),
        "pack finished"
    );
    Ok(())
}

fn unpack(args: UnpackArgs) -> Result<()> {
    let mut input = BufReader::new(File::open(&args.input)?);
    let mut output = BufWriter::new(File::create(&args.output)?);

    let mut depacketizer = H264Depacketizer::new();
    let mut playtime = PlaytimeEstimator::new();
    let mut packet = Vec::new();
    let mut annex_b = Vec::new();
    let (mut packets, mut frames) = (0usize, 0usize);

    while capture::read_packet(&mut input, &mut packet)? {
        packets += 1;
        let frame = match depacketizer.feed(&packet) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(packet = packets, error = %e, "RTP packet skipped");
                continue;
            }
        };
        let pts = playtime.estimate(frame.timestamp());
        tracing::debug!(
            nalu_type = frame.nalu_type(),
            ts = frame.timestamp(),
            pts,
            bytes = frame.data_len(),
            "frame"
        );
        annex_b.clear();
        frame.to_annex_b(&mut annex_b);
        output.write_all(&annex_b)?;
        frames += 1;
    }
    output.flush()?;

    tracing::info!(
        rtp_packets = packets,
        frames,
        elapsed_secs = playtime.elapsed_secs(),
        "unpack finished"
    );
    Ok(())
}

fn listen(args: ListenArgs) -> Result<()> {
    let transport = UdpTransport::bind(args.bind.as_str())?;
    transport.set_read_timeout(Some(Duration::from_secs(args.idle_secs.max(1))))?;
    tracing::info!(addr = %transport.local_addr()?, "listening for RTP");

    let media_info = MediaInfo {
        is_live: true,
        stream_id: "udp".to_string(),
        video: VideoCodec::H264,
        url: format!("udp://{}", args.bind),
        ..MediaInfo::default()
    };
    let (stream, frames) = Stream::new(true, false, media_info);
    let path = args.output.clone();
    let writer = thread::spawn(move || -> Result<usize> {
        let mut output = BufWriter::new(File::create(&path)?);
        let mut annex_b = Vec::new();
        let mut written = 0usize;
        for packet in frames {
            annex_b.clear();
            packet.to_annex_b(&mut annex_b);
            output.write_all(&annex_b)?;
            written += 1;
        }
        output.flush()?;
        Ok(written)
    });

    let mut transfer = RtpTransfer::new(TransferConfig::default());
    let mut buf = vec![0u8; RECV_BUFFER_LEN];
    let mut received = 0usize;
    let mut receiving = Ok(());
    while args.count.is_none_or(|count| received < count) {
        let n = match transport.recv(&mut buf) {
            Ok((n, _)) => n,
            Err(RtpError::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                tracing::info!("receive timed out");
                break;
            }
            Err(e) => {
                receiving = Err(e);
                break;
            }
        };
        received += 1;
        if let Err(e) = transfer.receive_into(&buf[..n], &stream) {
            tracing::warn!(error = %e, "RTP packet skipped");
        }
    }
    stream.close();

    let written = finish(receiving, writer)?;
    tracing::info!(
        rtp_packets = received,
        frames = written,
        interval = transfer.playtime().interval(),
        "listen finished"
    );
    Ok(())
}

/// Join the writer, then report the receive error first, else the writer's.
/// The writer's outcome is logged when the receive loop already failed.
fn finish(receiving: Result<()>, writer: JoinHandle<Result<usize>>) -> Result<usize> {
    let written = writer
        .join()
        .unwrap_or_else(|_| Err(RtpError::Io(io::Error::other("writer thread panicked"))));
    if let Err(e) = receiving {
        if let Err(writer_error) = &written {
            tracing::error!(error = %writer_error, "writer failed");
        }
        return Err(e);
    }
    written
}

/// Group an Annex B stream into access units: each VCL NAL unit (types
/// 1–5) closes a unit together with the non-VCL units preceding it.
/// Trailing non-VCL units form a final unit of their own.
fn access_units(bitstream: &[u8]) -> Vec<Vec<u8>> {
    let mut units = Vec::new();
    let mut current = Vec::new();
    for nal in split_annex_b(bitstream) {
        current.extend_from_slice(&START_CODE);
        current.extend_from_slice(nal);
        if matches!(nalu_type(nal[0]), 1..=5) {
            units.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        units.push(current);
    }
    units
}
