use crate::error::{RegionError, RegionResult};

/// MSB-first bit sink backed by a byte vector.
pub struct BitWriter {
    buffer: Vec<u8>,
    bit_buffer: u64,
    bits_to_go: u8,
}

impl BitWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            bit_buffer: 0,
            bits_to_go: 8,
        }
    }

    /// Writes the low `n` bits of `bits`, most significant first.
    pub fn output_nbits(&mut self, bits: u32, n: usize) -> RegionResult<()> {
        if n > 32 {
            return Err(RegionError::codec(
                "write",
                "cannot output more than 32 bits at once",
            ));
        }
        if n == 0 {
            return Ok(());
        }

        let mask = if n == 32 { u32::MAX } else { (1u32 << n) - 1 };
        let mut pending = 8 - self.bits_to_go as usize + n;
        self.bit_buffer = (self.bit_buffer << n) | u64::from(bits & mask);

        while pending >= 8 {
            pending -= 8;
            self.buffer.push(((self.bit_buffer >> pending) & 0xff) as u8);
        }
        self.bit_buffer &= (1u64 << pending) - 1;
        self.bits_to_go = (8 - pending) as u8;
        Ok(())
    }

    /// Writes the low `n` bits of a 64-bit value as two 32-bit chunks.
    pub fn output_u64(&mut self, value: u64, n: usize) -> RegionResult<()> {
        if n > 32 {
            self.output_nbits((value >> 32) as u32, n - 32)?;
            self.output_nbits(value as u32, 32)
        } else {
            self.output_nbits(value as u32, n)
        }
    }

    pub fn flush(&mut self) {
        if self.bits_to_go < 8 {
            self.buffer
                .push((self.bit_buffer << self.bits_to_go) as u8);
            self.bit_buffer = 0;
            self.bits_to_go = 8;
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }
}

/// MSB-first bit source over a byte slice.
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    bit_buffer: u64,
    bits_remaining: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            bit_buffer: 0,
            bits_remaining: 0,
        }
    }

    pub fn read_bits(&mut self, n: usize) -> RegionResult<u32> {
        if n > 32 {
            return Err(RegionError::codec(
                "read",
                "cannot read more than 32 bits at once",
            ));
        }
        if n == 0 {
            return Ok(0);
        }

        while (self.bits_remaining as usize) < n {
            if self.position >= self.data.len() {
                return Err(RegionError::codec(
                    "read",
                    "unexpected end of compressed data",
                ));
            }
            self.bit_buffer = (self.bit_buffer << 8) | u64::from(self.data[self.position]);
            self.position += 1;
            self.bits_remaining += 8;
        }

        self.bits_remaining -= n as u8;
        let result = (self.bit_buffer >> self.bits_remaining) as u32;
        self.bit_buffer &= (1u64 << self.bits_remaining) - 1;
        let mask = if n == 32 { u32::MAX } else { (1u32 << n) - 1 };
        Ok(result & mask)
    }

    /// Reads `n <= 64` bits written by [`BitWriter::output_u64`].
    pub fn read_u64(&mut self, n: usize) -> RegionResult<u64> {
        if n > 32 {
            let hi = u64::from(self.read_bits(n - 32)?);
            let lo = u64::from(self.read_bits(32)?);
            Ok((hi << 32) | lo)
        } else {
            Ok(u64::from(self.read_bits(n)?))
        }
    }
}
