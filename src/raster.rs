//! Validated view over an interleaved RGB pixel buffer.

use crate::error::{Error, Result};

/// Largest dimension a SOF0 height/width field can carry.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Borrowed RGB raster: row-major `R, G, B` triples.
///
/// Construction checks the dimensions and buffer length once, so the
/// pipeline can index pixels without further validation.
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    rgb: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> Raster<'a> {
    /// Wrap an RGB buffer of exactly `3 * width * height` bytes.
    pub fn new(rgb: &'a [u8], width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::InvalidDimensions { width, height });
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or(Error::InvalidDimensions { width, height })?;

        if rgb.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: rgb.len(),
            });
        }

        Ok(Self {
            rgb,
            width: width as usize,
            height: height as usize,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// RGB triple at (x, y). Both coordinates must be in bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = (y * self.width + x) * 3;
        (self.rgb[i], self.rgb[i + 1], self.rgb[i + 2])
    }

    /// RGB triple at (x, y) with coordinates clamped to the last valid
    /// row/column.
    #[inline]
    pub fn pixel_clamped(&self, x: usize, y: usize) -> (u8, u8, u8) {
        self.pixel(x.min(self.width - 1), y.min(self.height - 1))
    }
}
