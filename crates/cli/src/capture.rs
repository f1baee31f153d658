//! Length-prefixed RTP capture files.
//!
//! Each record is a 2-byte big-endian length followed by one RTP packet,
//! the same framing RTSP interleaved transport uses without its `$` and
//! channel bytes.

use std::io::{self, ErrorKind, Read, Write};

pub fn write_packet(out: &mut impl Write, packet: &[u8]) -> io::Result<()> {
    let len = u16::try_from(packet.len())
        .map_err(|_| io::Error::new(ErrorKind::InvalidInput, "RTP packet longer than 65535 bytes"))?;
    out.write_all(&len.to_be_bytes())?;
    out.write_all(packet)
}

/// Read the next record into `buf`. Returns `Ok(false)` at a clean end of file.
pub fn read_packet(input: &mut impl Read, buf: &mut Vec<u8>) -> io::Result<bool> {
    let mut len = [0u8; 2];
    match input.read_exact(&mut len) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(false),
        Err(e) => return Err(e),
    }
    buf.resize(u16::from_be_bytes(len) as usize, 0);
    input.read_exact(buf)?;
    Ok(true)
}
