//! Baseline JPEG encoder.
//!
//! The [`Encoder`] is configured with a builder and produces a complete
//! JFIF file in one call. All tables are built when the encoder is
//! configured and shared through [`Arc`], so cloning an encoder is cheap and
//! clones may be used from several threads at once.
//!
//! # Example
//!
//! ```no_run
//! use baseline_jpeg::{Encoder, Subsampling};
//!
//! # fn main() -> Result<(), baseline_jpeg::Error> {
//! let pixels = vec![128u8; 64 * 48 * 3];
//! let jpeg = Encoder::new()
//!     .quality(75)
//!     .subsampling(Subsampling::S444)
//!     .encode_rgb(&pixels, 64, 48)?;
//! assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::sync::Arc;

use crate::bitstream::BitWriter;
use crate::consts::DCTSIZE2;
use crate::dct::{forward_dct, load_block};
use crate::entropy::{natural_to_zigzag, EntropyEncoder};
use crate::error::{Error, Result};
use crate::huffman::{HuffmanTable, HuffmanTableSet};
use crate::marker::MarkerWriter;
use crate::quant::{quantize_block, QuantTable, DEFAULT_QUALITY};
use crate::raster::Raster;
use crate::sample::{BlockPlanner, Mcu};
use crate::types::{create_ycbcr_components, Block, Component, Subsampling};

/// Table slot used by luma.
const LUMA_SLOT: usize = 0;
/// Table slot shared by both chroma components.
const CHROMA_SLOT: usize = 1;

/// Baseline JPEG encoder.
#[derive(Debug, Clone)]
pub struct Encoder {
    /// Quality level (1-100)
    quality: u8,
    /// Chroma subsampling mode
    subsampling: Subsampling,
    /// Custom luminance base table (natural order)
    custom_luma_qtable: Option<[u16; DCTSIZE2]>,
    /// Custom chrominance base table (natural order)
    custom_chroma_qtable: Option<[u16; DCTSIZE2]>,
    /// Scaled `[luma, chroma]` tables
    quant_tables: Arc<[QuantTable; 2]>,
    /// Rejected custom base table, reported by the next encode
    qtable_error: Option<Error>,
    /// DC/AC Huffman tables
    huffman_tables: Arc<HuffmanTableSet>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            subsampling: Subsampling::default(),
            custom_luma_qtable: None,
            custom_chroma_qtable: None,
            quant_tables: Arc::new([
                QuantTable::luminance(DEFAULT_QUALITY),
                QuantTable::chrominance(DEFAULT_QUALITY),
            ]),
            qtable_error: None,
            huffman_tables: Arc::new(HuffmanTableSet::standard()),
        }
    }
}

impl Encoder {
    /// Create an encoder with quality 50, 4:2:0 subsampling and the
    /// standard tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set quality level (1-100).
    ///
    /// 50 uses the base quantization tables unchanged; higher values give
    /// finer quantization and larger files. Values outside the range are
    /// clamped.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self.rebuild_quant_tables();
        self
    }

    /// Set chroma subsampling mode.
    pub fn subsampling(mut self, mode: Subsampling) -> Self {
        self.subsampling = mode;
        self
    }

    /// Enable (4:2:0) or disable (4:4:4) chroma subsampling.
    #[inline]
    pub fn chroma_subsampling(self, enabled: bool) -> Self {
        self.subsampling(Subsampling::from(enabled))
    }

    /// Set a custom luminance base table in natural order.
    ///
    /// Entries must be in 1..=255; quality scaling still applies.
    pub fn custom_luma_qtable(mut self, table: [u16; DCTSIZE2]) -> Self {
        self.custom_luma_qtable = Some(table);
        self.rebuild_quant_tables();
        self
    }

    /// Set a custom chrominance base table in natural order.
    ///
    /// Entries must be in 1..=255; quality scaling still applies.
    pub fn custom_chroma_qtable(mut self, table: [u16; DCTSIZE2]) -> Self {
        self.custom_chroma_qtable = Some(table);
        self.rebuild_quant_tables();
        self
    }

    /// Replace the standard Huffman tables.
    pub fn huffman_tables(mut self, tables: Arc<HuffmanTableSet>) -> Self {
        self.huffman_tables = tables;
        self
    }

    /// Current quality level.
    pub fn get_quality(&self) -> u8 {
        self.quality
    }

    /// Current subsampling mode.
    pub fn get_subsampling(&self) -> Subsampling {
        self.subsampling
    }

    /// The `[luma, chroma]` quantization tables in effect.
    pub fn quant_tables(&self) -> Result<&[QuantTable; 2]> {
        match &self.qtable_error {
            Some(e) => Err(e.clone()),
            None => Ok(&*self.quant_tables),
        }
    }

    fn rebuild_quant_tables(&mut self) {
        let luma = scaled_table(self.custom_luma_qtable, QuantTable::luminance, self.quality);
        let chroma = scaled_table(
            self.custom_chroma_qtable,
            QuantTable::chrominance,
            self.quality,
        );
        match luma.and_then(|luma| chroma.map(|chroma| [luma, chroma])) {
            Ok(tables) => {
                self.quant_tables = Arc::new(tables);
                self.qtable_error = None;
            }
            Err(e) => self.qtable_error = Some(e),
        }
    }

    /// Encode RGB image data to JPEG.
    ///
    /// # Arguments
    /// * `rgb_data` - RGB pixel data (3 bytes per pixel, row-major)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn encode_rgb(&self, rgb_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        let raster = Raster::new(rgb_data, width, height)?;
        self.encode(&raster)
    }

    /// Encode RGB image data and write the finished file to `output`.
    ///
    /// Nothing is written unless encoding succeeds.
    pub fn encode_rgb_to_writer<W: Write>(
        &self,
        rgb_data: &[u8],
        width: u32,
        height: u32,
        mut output: W,
    ) -> Result<()> {
        let jpeg = self.encode_rgb(rgb_data, width, height)?;
        output.write_all(&jpeg)?;
        Ok(())
    }

    /// Encode a validated raster to a complete JPEG file.
    pub fn encode(&self, raster: &Raster<'_>) -> Result<Vec<u8>> {
        let quant_tables = self.quant_tables()?;
        let huffman = &*self.huffman_tables;
        let components = create_ycbcr_components(self.subsampling);

        // Raster guarantees both dimensions fit in 16 bits
        let width = raster.width() as u16;
        let height = raster.height() as u16;

        let mut output = Vec::with_capacity(estimate_size(raster));
        let header_len = {
            let mut markers = MarkerWriter::new(&mut output);
            markers.write_soi()?;
            markers.write_jfif_app0()?;
            markers.write_dqt(LUMA_SLOT as u8, &quant_tables[LUMA_SLOT])?;
            markers.write_dqt(CHROMA_SLOT as u8, &quant_tables[CHROMA_SLOT])?;
            markers.write_sof(height, width, &components)?;
            for (_, id, table) in huffman.iter() {
                markers.write_dht(id, table)?;
            }
            markers.write_sos(&components)?;
            markers.bytes_written()
        };

        let mut writer = BitWriter::new(output);
        let mcu_count = self.encode_scan(raster, quant_tables, huffman, &mut writer)?;
        writer.flush();
        let payload_bits = writer.bits_written();

        let mut output = writer.into_bytes();
        MarkerWriter::new(&mut output).write_eoi()?;

        log::debug!(
            "encoded {}x{} {:?} q{}: {} MCUs, {} header + {} payload bytes ({} bits), {} total",
            width,
            height,
            self.subsampling,
            self.quality,
            mcu_count,
            header_len,
            output.len() - header_len - 2,
            payload_bits,
            output.len()
        );

        Ok(output)
    }

    /// Entropy-code every MCU of `raster` into `writer`. Returns the MCU
    /// count.
    fn encode_scan(
        &self,
        raster: &Raster<'_>,
        quant_tables: &[QuantTable; 2],
        huffman: &HuffmanTableSet,
        writer: &mut BitWriter,
    ) -> Result<usize> {
        let planner = BlockPlanner::new(*raster, self.subsampling);
        let geometry = planner.geometry();
        log::trace!(
            "MCU grid {}x{} ({}px MCUs)",
            geometry.mcu_cols,
            geometry.mcu_rows,
            geometry.mcu_size
        );

        let luma = BlockTables::new(&quant_tables[LUMA_SLOT], huffman, LUMA_SLOT);
        let chroma = BlockTables::new(&quant_tables[CHROMA_SLOT], huffman, CHROMA_SLOT);

        // Fresh predictors for every scan
        let mut entropy = EntropyEncoder::new(writer);
        let mut mcu = Mcu::default();

        for (row, col) in geometry.positions() {
            planner.fill_mcu(row, col, &mut mcu);
            for block in mcu.luma_blocks() {
                encode_block(&mut entropy, block, Component::Y, &luma)?;
            }
            encode_block(&mut entropy, &mcu.cb, Component::Cb, &chroma)?;
            encode_block(&mut entropy, &mcu.cr, Component::Cr, &chroma)?;
        }

        Ok(geometry.mcu_count())
    }
}

/// Validate a custom base table and scale it, or build the standard one.
fn scaled_table(
    custom: Option<[u16; DCTSIZE2]>,
    standard: fn(u8) -> QuantTable,
    quality: u8,
) -> Result<QuantTable> {
    match custom {
        Some(values) => {
            let base = QuantTable::new(values)?;
            Ok(QuantTable::scaled(base.values(), quality))
        }
        None => Ok(standard(quality)),
    }
}

/// Tables used for one component class.
struct BlockTables<'a> {
    quant: &'a QuantTable,
    dc: &'a HuffmanTable,
    ac: &'a HuffmanTable,
}

impl<'a> BlockTables<'a> {
    fn new(quant: &'a QuantTable, huffman: &'a HuffmanTableSet, slot: usize) -> Self {
        Self {
            quant,
            dc: huffman.dc(slot),
            ac: huffman.ac(slot),
        }
    }
}

/// Transform, quantize and entropy-code one block of level-shifted samples.
fn encode_block(
    entropy: &mut EntropyEncoder<'_>,
    samples: &Block,
    component: Component,
    tables: &BlockTables<'_>,
) -> Result<()> {
    let mut coeffs = load_block(samples);
    forward_dct(&mut coeffs);

    let mut quantized = [0i16; DCTSIZE2];
    quantize_block(&coeffs, tables.quant, &mut quantized);

    entropy.encode_block(&natural_to_zigzag(&quantized), component, tables.dc, tables.ac)
}

/// Rough output size used to preallocate the output buffer.
fn estimate_size(raster: &Raster<'_>) -> usize {
    1024 + raster.width() * raster.height() / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STD_LUMINANCE_QUANT_TBL;

    #[test]
    fn test_encoder_defaults() {
        let enc = Encoder::default();
        assert_eq!(enc.get_quality(), 50);
        assert_eq!(enc.get_subsampling(), Subsampling::S420);
        assert!(enc.custom_luma_qtable.is_none());
        assert!(enc.custom_chroma_qtable.is_none());
        assert_eq!(*enc.huffman_tables, HuffmanTableSet::standard());

        let tables = enc.quant_tables().unwrap();
        assert_eq!(tables[0].values(), &STD_LUMINANCE_QUANT_TBL);
    }

    #[test]
    fn test_encoder_builder() {
        let enc = Encoder::new().quality(90).chroma_subsampling(false);
        assert_eq!(enc.get_quality(), 90);
        assert_eq!(enc.get_subsampling(), Subsampling::S444);
        assert_eq!(enc.quant_tables().unwrap()[0], QuantTable::luminance(90));
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(Encoder::new().quality(0).get_quality(), 1);
        assert_eq!(Encoder::new().quality(250).get_quality(), 100);
    }

    #[test]
    fn test_custom_table_scaled_by_quality() {
        let base = [10u16; DCTSIZE2];
        let enc = Encoder::new().custom_luma_qtable(base);
        assert_eq!(enc.quant_tables().unwrap()[0].values(), &base);

        // Scale factor for quality 75 is 50%
        let enc = enc.quality(75);
        assert!(enc.quant_tables().unwrap()[0]
            .values()
            .iter()
            .all(|&v| v == 5));
    }

    #[test]
    fn test_invalid_custom_table_reported_on_encode() {
        let mut base = [10u16; DCTSIZE2];
        base[3] = 0;
        let enc = Encoder::new().custom_chroma_qtable(base);
        let err = enc.encode_rgb(&[0; 3], 1, 1).unwrap_err();
        assert_eq!(err, Error::InvalidQuantTable { index: 3, value: 0 });
    }

    #[test]
    fn test_invalid_custom_table_sticks_until_replaced() {
        let mut bad = [10u16; DCTSIZE2];
        bad[0] = 256;
        let enc = Encoder::new().custom_luma_qtable(bad).quality(80);
        assert_eq!(
            enc.quant_tables().unwrap_err(),
            Error::InvalidQuantTable { index: 0, value: 256 }
        );

        let enc = enc.custom_luma_qtable([10; DCTSIZE2]);
        assert!(enc.qtable_error.is_none());
        assert!(enc.encode_rgb(&[0; 3], 1, 1).is_ok());
    }

    #[test]
    fn test_clone_shares_tables() {
        let enc = Encoder::new();
        let clone = enc.clone();
        assert!(Arc::ptr_eq(&enc.huffman_tables, &clone.huffman_tables));
        assert!(Arc::ptr_eq(&enc.quant_tables, &clone.quant_tables));
    }

    #[test]
    fn test_encode_framing() {
        let data = vec![200u8; 17 * 9 * 3];
        for mode in [Subsampling::S444, Subsampling::S420] {
            let jpeg = Encoder::new().subsampling(mode).encode_rgb(&data, 17, 9).unwrap();
            assert_eq!(&jpeg[..4], &[0xFF, 0xD8, 0xFF, 0xE0]);
            assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }
    }

    #[test]
    fn test_writer_untouched_on_error() {
        let mut out = Vec::new();
        let result = Encoder::new().encode_rgb_to_writer(&[0; 5], 1, 1, &mut out);
        assert!(matches!(result, Err(Error::BufferSizeMismatch { .. })));
        assert!(out.is_empty());
    }
}
