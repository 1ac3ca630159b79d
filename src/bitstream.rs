//! Bitstream writer for JPEG entropy coding.
//!
//! Bits are packed MSB-first into a 64-bit accumulator and drained to a
//! `Vec<u8>` eight bytes at a time. Every 0xFF byte produced from packed
//! bits is followed by a stuffed 0x00 so that decoders never mistake
//! entropy-coded data for a marker. Raw bytes written through
//! [`BitWriter::write_bytes`] bypass both packing and stuffing.

/// Size of the bit accumulator in bits
const BIT_BUF_SIZE: i32 = 64;

/// Bit-level writer over an in-memory byte buffer.
#[derive(Debug)]
pub struct BitWriter {
    /// Output buffer
    output: Vec<u8>,
    /// Bit accumulation buffer (right-aligned)
    put_buffer: u64,
    /// Number of free bits remaining in the buffer
    free_bits: i32,
    /// Payload bits accepted through `put_bits`, padding excluded
    bits_written: u64,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl BitWriter {
    /// Create a writer that appends to `output`.
    ///
    /// Existing contents are kept, which lets the entropy-coded segment
    /// follow marker bytes already in the buffer.
    #[inline]
    pub fn new(output: Vec<u8>) -> Self {
        Self {
            output,
            put_buffer: 0,
            free_bits: BIT_BUF_SIZE,
            bits_written: 0,
        }
    }

    /// Append the low `size` bits of `code`, most significant bit first.
    ///
    /// `size` may be 0, in which case nothing is written.
    #[inline(always)]
    pub fn put_bits(&mut self, code: u32, size: u8) {
        debug_assert!(size <= 16, "Size must be <= 16 bits");
        debug_assert!(
            size == 16 || code < (1u32 << size),
            "Code exceeds size bits"
        );

        if size == 0 {
            return;
        }
        self.bits_written += size as u64;

        let size = size as i32;
        self.free_bits -= size;

        if self.free_bits < 0 {
            let overflow_bits = (-self.free_bits) as u32;

            // Top of the code completes the current word
            self.put_buffer = (self.put_buffer << (size + self.free_bits))
                | ((code as u64) >> overflow_bits);
            self.flush_buffer();

            self.free_bits += BIT_BUF_SIZE;
            self.put_buffer = (code as u64) & ((1u64 << overflow_bits) - 1);
        } else {
            self.put_buffer = (self.put_buffer << size) | (code as u64);
        }
    }

    /// Drain a full 64-bit accumulator with byte stuffing.
    #[inline]
    fn flush_buffer(&mut self) {
        let buffer = self.put_buffer;

        // A byte is 0xFF iff its high bit is set and adding 1 carries out
        if buffer & 0x8080808080808080 & !(buffer.wrapping_add(0x0101010101010101)) != 0 {
            self.emit_bytes_with_stuffing(buffer);
        } else {
            self.output.extend_from_slice(&buffer.to_be_bytes());
        }
    }

    #[inline(never)]
    fn emit_bytes_with_stuffing(&mut self, buffer: u64) {
        self.output.reserve(16);
        for byte in buffer.to_be_bytes() {
            self.push_stuffed(byte);
        }
    }

    #[inline]
    fn push_stuffed(&mut self, byte: u8) {
        self.output.push(byte);
        if byte == 0xFF {
            self.output.push(0x00);
        }
    }

    /// Emit any pending bits, padding the final partial byte with 1-bits.
    ///
    /// Leaves the writer byte-aligned. Calling it when already aligned is
    /// a no-op.
    pub fn flush(&mut self) {
        let bits_in_buffer = BIT_BUF_SIZE - self.free_bits;
        if bits_in_buffer == 0 {
            return;
        }

        let padding_bits = (8 - (bits_in_buffer % 8)) % 8;
        let total_bits = bits_in_buffer + padding_bits;
        let bytes_to_write = (total_bits / 8) as usize;

        // Left-align pending bits, then OR the padding in below them
        let mut buffer = self.put_buffer << (BIT_BUF_SIZE - bits_in_buffer);
        if padding_bits > 0 {
            let padding_shift = BIT_BUF_SIZE - total_bits;
            buffer |= ((1u64 << padding_bits) - 1) << padding_shift;
        }

        self.output.reserve(bytes_to_write * 2);
        for byte in buffer.to_be_bytes().into_iter().take(bytes_to_write) {
            self.push_stuffed(byte);
        }

        self.put_buffer = 0;
        self.free_bits = BIT_BUF_SIZE;
    }

    /// Write raw bytes without packing or stuffing.
    ///
    /// The writer must be byte-aligned (call [`flush`](Self::flush) first).
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        debug_assert!(
            self.free_bits == BIT_BUF_SIZE,
            "Buffer must be flushed before writing raw bytes"
        );
        self.output.extend_from_slice(bytes);
    }

    /// Total payload bits passed to [`put_bits`](Self::put_bits).
    #[inline]
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Consume the writer and return the output bytes.
    ///
    /// Unflushed bits are discarded.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }
}
