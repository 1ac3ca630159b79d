//! Quantization tables and coefficient quantization.
//!
//! Tables are stored in natural (row-major) order and converted to zigzag
//! order only when written to a DQT segment.

use crate::consts::{
    DCTSIZE2, JPEG_NATURAL_ORDER, STD_CHROMINANCE_QUANT_TBL, STD_LUMINANCE_QUANT_TBL,
};
use crate::error::{Error, Result};

/// Default quality; reproduces the Annex K tables exactly.
pub const DEFAULT_QUALITY: u8 = 50;

/// A validated 8-bit quantization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTable {
    values: [u16; DCTSIZE2],
}

impl QuantTable {
    /// Build a table from natural-order divisors, each in 1..=255.
    pub fn new(values: [u16; DCTSIZE2]) -> Result<Self> {
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|&(_, &v)| !(1..=255).contains(&v))
        {
            return Err(Error::InvalidQuantTable { index, value });
        }
        Ok(Self { values })
    }

    /// Scale a base table with the IJG quality curve.
    ///
    /// Quality is clamped to 1..=100. Quality 50 returns `base` unchanged
    /// (as long as it was already in range).
    pub fn scaled(base: &[u16; DCTSIZE2], quality: u8) -> Self {
        let scale = quality_to_scale(quality);
        let values = base.map(|v| {
            let q = (v as u32 * scale + 50) / 100;
            q.clamp(1, 255) as u16
        });
        Self { values }
    }

    /// Annex K luminance table at the given quality.
    pub fn luminance(quality: u8) -> Self {
        Self::scaled(&STD_LUMINANCE_QUANT_TBL, quality)
    }

    /// Annex K chrominance table at the given quality.
    pub fn chrominance(quality: u8) -> Self {
        Self::scaled(&STD_CHROMINANCE_QUANT_TBL, quality)
    }

    /// Divisors in natural order.
    #[inline]
    pub fn values(&self) -> &[u16; DCTSIZE2] {
        &self.values
    }

    /// Divisors in zigzag order, as written to DQT.
    pub fn zigzag(&self) -> [u8; DCTSIZE2] {
        // Range checked at construction
        JPEG_NATURAL_ORDER.map(|natural| self.values[natural] as u8)
    }
}

/// IJG percentage scale for a quality setting.
#[inline]
pub fn quality_to_scale(quality: u8) -> u32 {
    let q = quality.clamp(1, 100) as u32;
    if q < 50 {
        5000 / q
    } else {
        200 - q * 2
    }
}

/// Quantize DCT coefficients using the given quantization table.
///
/// Each coefficient is divided by its divisor and rounded half away from
/// zero. Input and output are in natural order.
#[inline]
pub fn quantize_block(
    coeffs: &[f32; DCTSIZE2],
    table: &QuantTable,
    output: &mut [i16; DCTSIZE2],
) {
    for ((out, &c), &q) in output.iter_mut().zip(coeffs).zip(&table.values) {
        *out = (c / q as f32).round() as i16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::JPEG_ZIGZAG_ORDER;

    #[test]
    fn test_rejects_out_of_range() {
        let mut values = [16u16; DCTSIZE2];
        values[5] = 0;
        assert_eq!(
            QuantTable::new(values).unwrap_err(),
            Error::InvalidQuantTable { index: 5, value: 0 }
        );

        values[5] = 256;
        assert_eq!(
            QuantTable::new(values).unwrap_err(),
            Error::InvalidQuantTable {
                index: 5,
                value: 256
            }
        );

        values[5] = 255;
        assert!(QuantTable::new(values).is_ok());
    }

    #[test]
    fn test_quality_scale_curve() {
        assert_eq!(quality_to_scale(1), 5000);
        assert_eq!(quality_to_scale(25), 200);
        assert_eq!(quality_to_scale(50), 100);
        assert_eq!(quality_to_scale(75), 50);
        assert_eq!(quality_to_scale(100), 0);
        // Out of range is clamped
        assert_eq!(quality_to_scale(0), 5000);
        assert_eq!(quality_to_scale(200), 0);
    }

    #[test]
    fn test_quality_50_is_identity() {
        assert_eq!(QuantTable::luminance(50).values(), &STD_LUMINANCE_QUANT_TBL);
        assert_eq!(
            QuantTable::chrominance(50).values(),
            &STD_CHROMINANCE_QUANT_TBL
        );
    }

    #[test]
    fn test_quality_extremes_stay_in_range() {
        let q100 = QuantTable::luminance(100);
        assert!(q100.values().iter().all(|&v| v == 1));

        let q1 = QuantTable::luminance(1);
        assert!(q1.values().iter().all(|&v| (1..=255).contains(&v)));
        assert_eq!(q1.values()[0], 255);

        // 16 * 50% = 8
        assert_eq!(QuantTable::luminance(75).values()[0], 8);
    }

    #[test]
    fn test_zigzag_order() {
        let table = QuantTable::luminance(50);
        let zz = table.zigzag();
        assert_eq!(&zz[..6], &[16, 11, 12, 14, 12, 10]);
        for natural in 0..DCTSIZE2 {
            assert_eq!(zz[JPEG_ZIGZAG_ORDER[natural]] as u16, table.values()[natural]);
        }
    }

    #[test]
    fn test_quantize_rounding() {
        let table = QuantTable::new([10u16; DCTSIZE2]).unwrap();
        let mut coeffs = [0.0f32; DCTSIZE2];
        coeffs[0] = 25.0; // 2.5 -> 3
        coeffs[1] = -25.0; // -2.5 -> -3
        coeffs[2] = 14.9; // 1.49 -> 1
        coeffs[3] = -4.9; // -0.49 -> 0
        coeffs[4] = 1020.0;

        let mut out = [0i16; DCTSIZE2];
        quantize_block(&coeffs, &table, &mut out);
        assert_eq!(&out[..5], &[3, -3, 1, 0, 102]);
        assert!(out[5..].iter().all(|&v| v == 0));
    }
}
