//! Huffman entropy encoder for JPEG.
//!
//! This module implements baseline Huffman encoding for DCT coefficients:
//! - DC coefficient encoding with differential coding
//! - AC coefficient encoding with run-length coding
//! - EOB (End of Block) and ZRL (Zero Run Length) symbols
//!
//! Blocks arrive in zigzag order; [`natural_to_zigzag`] converts a
//! quantized natural-order block at the hand-off.
//!
//! Reference: ITU-T T.81 Section F.1.2

use crate::bitstream::BitWriter;
use crate::consts::{DCTSIZE2, JPEG_NATURAL_ORDER, MAX_AC_CATEGORY, MAX_DC_CATEGORY};
use crate::error::{CoefficientKind, Error, Result};
use crate::huffman::HuffmanTable;
use crate::types::{Block, Component};

/// EOB (End of Block) symbol - encodes as run=0, size=0
pub const EOB: u8 = 0x00;

/// ZRL (Zero Run Length 16) symbol - encodes 16 consecutive zeros
pub const ZRL: u8 = 0xF0;

/// Calculate the number of bits needed to represent a value.
///
/// This is the "category" in JPEG terminology:
/// - 0 → 0 bits (value must be 0)
/// - 1 → 1 bit (values -1, 1)
/// - 2 → 2 bits (values -3..-2, 2..3)
/// - etc.
#[inline]
pub fn jpeg_nbits(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Magnitude bits for a value of the given category.
///
/// Negative values are sent as `value + 2^nbits - 1`, i.e. the one's
/// complement of `|value|` in `nbits` bits.
#[inline]
fn magnitude_bits(value: i32, nbits: u8) -> u32 {
    if value < 0 {
        (value + (1 << nbits) - 1) as u32
    } else {
        value as u32
    }
}

/// Reorder a natural-order block into zigzag order.
#[inline]
pub fn natural_to_zigzag(block: &Block) -> Block {
    JPEG_NATURAL_ORDER.map(|natural| block[natural])
}

/// Entropy encoder state for a single scan.
pub struct EntropyEncoder<'a> {
    /// Bitstream writer
    writer: &'a mut BitWriter,
    /// Last DC value for each component (for differential coding)
    last_dc_val: [i16; 3],
}

impl<'a> EntropyEncoder<'a> {
    /// Create a new entropy encoder with all DC predictors at zero.
    pub fn new(writer: &'a mut BitWriter) -> Self {
        Self {
            writer,
            last_dc_val: [0; 3],
        }
    }

    /// Get the last DC value for a component.
    pub fn last_dc(&self, component: Component) -> i16 {
        self.last_dc_val[component.index()]
    }

    /// Encode a single 8x8 block of quantized coefficients.
    ///
    /// # Arguments
    /// * `block` - 64 quantized DCT coefficients in zigzag order
    /// * `component` - Component whose DC predictor is used and updated
    /// * `dc_table` - Huffman table for the DC difference category
    /// * `ac_table` - Huffman table for AC run/size symbols
    pub fn encode_block(
        &mut self,
        block: &Block,
        component: Component,
        dc_table: &HuffmanTable,
        ac_table: &HuffmanTable,
    ) -> Result<()> {
        self.encode_dc(block[0], component, dc_table)?;
        self.encode_ac(block, ac_table)
    }

    /// Encode the DC coefficient as the difference from the previous DC
    /// value of the same component.
    fn encode_dc(&mut self, dc: i16, component: Component, dc_table: &HuffmanTable) -> Result<()> {
        let slot = &mut self.last_dc_val[component.index()];
        let diff = dc as i32 - *slot as i32;
        *slot = dc;

        let nbits = jpeg_nbits(diff);
        if nbits > MAX_DC_CATEGORY {
            return Err(Error::CoefficientOverflow {
                kind: CoefficientKind::Dc,
                category: nbits,
            });
        }

        // Category 0 still needs its code; it just has no magnitude bits
        let (code, size) = dc_table.code_for(nbits)?;
        self.writer.put_bits(code, size);
        self.writer.put_bits(magnitude_bits(diff, nbits), nbits);

        Ok(())
    }

    /// Encode AC coefficients as (run, size) pairs where run is the number
    /// of preceding zeros and size is the magnitude category.
    fn encode_ac(&mut self, block: &Block, ac_table: &HuffmanTable) -> Result<()> {
        let mut run = 0u8;

        for &coef in &block[1..DCTSIZE2] {
            if coef == 0 {
                run += 1;
                continue;
            }

            let value = coef as i32;
            let nbits = jpeg_nbits(value);
            if nbits > MAX_AC_CATEGORY {
                return Err(Error::CoefficientOverflow {
                    kind: CoefficientKind::Ac,
                    category: nbits,
                });
            }

            // Emit ZRL codes for runs of 16+ zeros
            while run >= 16 {
                let (code, size) = ac_table.code_for(ZRL)?;
                self.writer.put_bits(code, size);
                run -= 16;
            }

            let (code, size) = ac_table.code_for((run << 4) | nbits)?;
            self.writer.put_bits(code, size);
            self.writer.put_bits(magnitude_bits(value, nbits), nbits);

            run = 0;
        }

        // Trailing zeros collapse into a single EOB
        if run > 0 {
            let (code, size) = ac_table.code_for(EOB)?;
            self.writer.put_bits(code, size);
        }

        Ok(())
    }
}
