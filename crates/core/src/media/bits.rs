/// Sequential MSB-first bit writer over a fixed byte buffer.
///
/// Each written bit overwrites the target bit (set or clear), so the
/// buffer does not need to be zeroed first. Bits that would land past the
/// end of the buffer are discarded and [`overflowed`](Self::overflowed)
/// reports it.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    byte: usize,
    mask: u8,
    overflowed: bool,
}

impl<'a> BitWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            byte: 0,
            mask: 0x80,
            overflowed: false,
        }
    }

    /// Write the low `count` bits of `value`, most significant first.
    ///
    /// `count` is capped at 64.
    pub fn write(&mut self, count: u32, value: u64) -> &mut Self {
        for shift in (0..count.min(64)).rev() {
            let Some(byte) = self.buf.get_mut(self.byte) else {
                self.overflowed = true;
                break;
            };
            if (value >> shift) & 1 != 0 {
                *byte |= self.mask;
            } else {
                *byte &= !self.mask;
            }
            self.mask >>= 1;
            if self.mask == 0 {
                self.byte += 1;
                self.mask = 0x80;
            }
        }
        self
    }

    pub fn write_flag(&mut self, flag: bool) -> &mut Self {
        self.write(1, flag as u64)
    }

    /// Number of bits written so far.
    pub fn position(&self) -> usize {
        self.byte * 8 + self.mask.leading_zeros() as usize
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}
