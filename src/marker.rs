//! JPEG marker emission for encoding.
//!
//! This module handles writing JPEG file format markers:
//! - SOI (Start of Image)
//! - APP0 (JFIF header)
//! - DQT (Define Quantization Table)
//! - SOF0 (Start of Frame, baseline)
//! - DHT (Define Huffman Table)
//! - SOS (Start of Scan)
//! - EOI (End of Image)
//!
//! Each DQT and DHT segment carries exactly one table. All multi-byte
//! fields are big-endian and segment lengths include the length field.
//!
//! Reference: ITU-T T.81 Section B

use std::io::Write;

use crate::consts::{
    DCTSIZE2, JPEG_APP0, JPEG_DHT, JPEG_DQT, JPEG_EOI, JPEG_SOF0, JPEG_SOI, JPEG_SOS,
};
use crate::error::TableClass;
use crate::huffman::HuffmanTable;
use crate::quant::QuantTable;
use crate::types::ComponentInfo;

/// JFIF identifier
const JFIF_ID: [u8; 5] = *b"JFIF\0";

/// JFIF version 1.01
const JFIF_VERSION: [u8; 2] = [1, 1];

/// Baseline sample precision
const SAMPLE_PRECISION: u8 = 8;

/// Marker writer for JPEG encoding.
pub struct MarkerWriter<W: Write> {
    output: W,
    bytes_written: usize,
}

impl<W: Write> MarkerWriter<W> {
    /// Create a new marker writer.
    pub fn new(output: W) -> Self {
        Self {
            output,
            bytes_written: 0,
        }
    }

    /// Write a single byte.
    fn emit_byte(&mut self, byte: u8) -> std::io::Result<()> {
        self.output.write_all(&[byte])?;
        self.bytes_written += 1;
        Ok(())
    }

    /// Write a byte run.
    fn emit_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.output.write_all(bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }

    /// Write a 2-byte value in big-endian order.
    fn emit_2bytes(&mut self, value: u16) -> std::io::Result<()> {
        self.emit_bytes(&value.to_be_bytes())
    }

    /// Write a marker (0xFF followed by marker code).
    fn emit_marker(&mut self, marker: u8) -> std::io::Result<()> {
        self.emit_bytes(&[0xFF, marker])
    }

    /// Write Start of Image marker.
    pub fn write_soi(&mut self) -> std::io::Result<()> {
        self.emit_marker(JPEG_SOI)
    }

    /// Write End of Image marker.
    pub fn write_eoi(&mut self) -> std::io::Result<()> {
        self.emit_marker(JPEG_EOI)
    }

    /// Write the APP0 (JFIF 1.01) marker: no density units, 1:1 aspect,
    /// no thumbnail.
    pub fn write_jfif_app0(&mut self) -> std::io::Result<()> {
        self.emit_marker(JPEG_APP0)?;

        // Length: 2 (length) + 5 (identifier) + 2 (version) + 1 (units) +
        //         2 (x_density) + 2 (y_density) + 1 (thumbnail_width) +
        //         1 (thumbnail_height) = 16
        self.emit_2bytes(16)?;
        self.emit_bytes(&JFIF_ID)?;
        self.emit_bytes(&JFIF_VERSION)?;

        // Units and density
        self.emit_byte(0)?;
        self.emit_2bytes(1)?;
        self.emit_2bytes(1)?;

        // No thumbnail
        self.emit_byte(0)?;
        self.emit_byte(0)?;

        Ok(())
    }

    /// Write one Define Quantization Table segment.
    ///
    /// # Arguments
    /// * `table_index` - Table slot (0-3)
    /// * `table` - Table to emit; values are written in zigzag order with
    ///   8-bit precision
    pub fn write_dqt(&mut self, table_index: u8, table: &QuantTable) -> std::io::Result<()> {
        self.emit_marker(JPEG_DQT)?;
        // 2 (length) + 1 (Pq/Tq) + 64 values
        self.emit_2bytes(2 + 1 + DCTSIZE2 as u16)?;

        // Pq = 0 (8-bit) in high nibble, Tq in low nibble
        self.emit_byte(table_index & 0x0F)?;
        self.emit_bytes(&table.zigzag())
    }

    /// Write baseline Start of Frame marker.
    ///
    /// # Arguments
    /// * `height` - Image height in pixels
    /// * `width` - Image width in pixels
    /// * `components` - Component information
    pub fn write_sof(
        &mut self,
        height: u16,
        width: u16,
        components: &[ComponentInfo],
    ) -> std::io::Result<()> {
        self.emit_marker(JPEG_SOF0)?;

        // Length: 2 (length) + 1 (precision) + 2 (height) + 2 (width) +
        //         1 (num_components) + 3 * num_components
        let num_components = components.len() as u16;
        self.emit_2bytes(8 + 3 * num_components)?;

        self.emit_byte(SAMPLE_PRECISION)?;
        self.emit_2bytes(height)?;
        self.emit_2bytes(width)?;
        self.emit_byte(num_components as u8)?;

        for comp in components {
            self.emit_byte(comp.component_id)?;
            // Sampling factors: (H << 4) | V
            self.emit_byte((comp.h_samp_factor << 4) | comp.v_samp_factor)?;
            self.emit_byte(comp.quant_tbl_no)?;
        }

        Ok(())
    }

    /// Write one Define Huffman Table segment.
    ///
    /// # Arguments
    /// * `table_index` - Table slot (0-3)
    /// * `table` - Huffman table; its class selects Tc
    pub fn write_dht(&mut self, table_index: u8, table: &HuffmanTable) -> std::io::Result<()> {
        let values = table.values();

        self.emit_marker(JPEG_DHT)?;
        // 2 (length) + 1 (Tc/Th) + 16 (counts) + symbols
        self.emit_2bytes(2 + 1 + 16 + values.len() as u16)?;

        // Tc (table class) in high nibble, Th (table index) in low nibble
        let tc = match table.class() {
            TableClass::Dc => 0x00,
            TableClass::Ac => 0x10,
        };
        self.emit_byte(tc | (table_index & 0x0F))?;
        self.emit_bytes(table.bits())?;
        self.emit_bytes(values)
    }

    /// Write Start of Scan marker for a single interleaved baseline scan
    /// over `components`.
    pub fn write_sos(&mut self, components: &[ComponentInfo]) -> std::io::Result<()> {
        self.emit_marker(JPEG_SOS)?;

        // Length: 2 (length) + 1 (Ns) + 2*Ns (component specs) + 3 (Ss, Se, Ah/Al)
        let num_components = components.len() as u16;
        self.emit_2bytes(6 + 2 * num_components)?;
        self.emit_byte(num_components as u8)?;

        for comp in components {
            self.emit_byte(comp.component_id)?;
            // DC table in high nibble, AC table in low nibble
            self.emit_byte((comp.dc_tbl_no << 4) | comp.ac_tbl_no)?;
        }

        // Full spectral range, no successive approximation
        self.emit_byte(0)?;
        self.emit_byte((DCTSIZE2 - 1) as u8)?;
        self.emit_byte(0)?;

        Ok(())
    }

    /// Get total bytes written.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{create_ycbcr_components, Subsampling};

    #[test]
    fn test_soi_eoi() {
        let mut output = Vec::new();
        let mut writer = MarkerWriter::new(&mut output);
        writer.write_soi().unwrap();
        writer.write_eoi().unwrap();
        assert_eq!(writer.bytes_written(), 4);
        assert_eq!(output, vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn test_jfif_app0() {
        let mut output = Vec::new();
        MarkerWriter::new(&mut output).write_jfif_app0().unwrap();
        assert_eq!(
            output,
            vec![
                0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
                0x01, 0x00, 0x01, 0x00, 0x00
            ]
        );
    }

    #[test]
    fn test_dqt() {
        let mut output = Vec::new();
        MarkerWriter::new(&mut output)
            .write_dqt(1, &QuantTable::chrominance(50))
            .unwrap();

        assert_eq!(output.len(), 2 + 67);
        assert_eq!(&output[..5], &[0xFF, 0xDB, 0x00, 0x43, 0x01]);
        // Zigzag: 17, 18, 18, 24, 21, 24
        assert_eq!(&output[5..11], &[17, 18, 18, 24, 21, 24]);
    }

    #[test]
    fn test_sof_420() {
        let mut output = Vec::new();
        let components = create_ycbcr_components(Subsampling::S420);
        MarkerWriter::new(&mut output)
            .write_sof(480, 640, &components)
            .unwrap();

        assert_eq!(
            output,
            vec![
                0xFF, 0xC0, 0x00, 0x11, 0x08, 0x01, 0xE0, 0x02, 0x80, 0x03, 0x01, 0x22, 0x00,
                0x02, 0x11, 0x01, 0x03, 0x11, 0x01
            ]
        );
    }

    #[test]
    fn test_sof_444_luma_factors() {
        let mut output = Vec::new();
        let components = create_ycbcr_components(Subsampling::S444);
        MarkerWriter::new(&mut output)
            .write_sof(1, 1, &components)
            .unwrap();
        assert_eq!(output[11], 0x11);
    }

    #[test]
    fn test_dht() {
        let mut output = Vec::new();
        let mut writer = MarkerWriter::new(&mut output);
        writer.write_dht(0, &HuffmanTable::std_dc_luma()).unwrap();
        writer.write_dht(1, &HuffmanTable::std_ac_chroma()).unwrap();

        // DC: 2 + 19 + 12 symbols
        let dc_len = 2 + 19 + 12;
        assert_eq!(&output[..5], &[0xFF, 0xC4, 0x00, 31, 0x00]);
        assert_eq!(&output[5..21], &[0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0]);

        // AC: 19 + 162 = 181 = 0xB5
        let ac = &output[dc_len..];
        assert_eq!(&ac[..5], &[0xFF, 0xC4, 0x00, 0xB5, 0x11]);
        assert_eq!(ac.len(), 2 + 181);
    }

    #[test]
    fn test_sos() {
        let mut output = Vec::new();
        let components = create_ycbcr_components(Subsampling::S420);
        MarkerWriter::new(&mut output).write_sos(&components).unwrap();

        assert_eq!(
            output,
            vec![0xFF, 0xDA, 0x00, 0x0C, 0x03, 0x01, 0x00, 0x02, 0x11, 0x03, 0x11, 0x00, 0x3F, 0x00]
        );
    }
}
