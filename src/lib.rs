//! # baseline-jpeg
//!
//! Pure Rust baseline JPEG encoder.
//!
//! Converts an 8-bit RGB raster into a JFIF file using the sequential DCT
//! process with Huffman coding (SOF0):
//!
//! - **Color conversion** - BT.601 RGB to YCbCr, level shifted
//! - **Chroma subsampling** - 4:2:0 (default) or 4:4:4
//! - **Forward DCT** - AAN floating-point butterfly
//! - **Quantization** - Annex K tables with IJG quality scaling
//! - **Entropy coding** - Annex K Huffman tables, or a custom set
//!
//! ## Quick Start
//!
//! ```no_run
//! use baseline_jpeg::Encoder;
//!
//! # fn main() -> Result<(), baseline_jpeg::Error> {
//! // RGB pixel data (3 bytes per pixel, row-major order)
//! let rgb_pixels: Vec<u8> = vec![0; 640 * 480 * 3];
//!
//! let jpeg_data = Encoder::new()
//!     .quality(85)
//!     .encode_rgb(&rgb_pixels, 640, 480)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Encoding a PPM File
//!
//! ```no_run
//! use baseline_jpeg::{read_ppm, Encoder};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = read_ppm(File::open("input.ppm")?)?;
//! let mut file = File::create("output.jpg")?;
//!
//! Encoder::new()
//!     .chroma_subsampling(false)
//!     .encode_rgb_to_writer(&image.rgb, image.width, image.height, &mut file)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

// ============================================================================
// Internal modules - hidden from public docs but accessible for tests
// ============================================================================

/// Bitstream writing utilities (internal).
#[doc(hidden)]
pub mod bitstream;

/// Color conversion (internal).
#[doc(hidden)]
pub mod color;

/// JPEG constants and standard tables (internal).
#[doc(hidden)]
pub mod consts;

/// Forward DCT (internal).
#[doc(hidden)]
pub mod dct;

/// Coefficient entropy coding (internal).
#[doc(hidden)]
pub mod entropy;

/// JPEG marker emission (internal).
#[doc(hidden)]
pub mod marker;

/// MCU geometry and block assembly (internal).
#[doc(hidden)]
pub mod sample;

/// Type definitions (internal).
#[doc(hidden)]
pub mod types;

pub mod huffman;
pub mod ppm;
pub mod quant;
pub mod raster;

mod encode;
mod error;

// ============================================================================
// Public API
// ============================================================================

/// The JPEG encoder.
///
/// Configure it with the builder methods, then call
/// [`encode_rgb()`](Encoder::encode_rgb) or [`encode()`](Encoder::encode).
///
/// # Example
///
/// ```no_run
/// use baseline_jpeg::{Encoder, Subsampling};
///
/// # fn main() -> Result<(), baseline_jpeg::Error> {
/// let pixels: Vec<u8> = vec![0; 320 * 240 * 3];
///
/// let jpeg = Encoder::new()
///     .quality(90)
///     .subsampling(Subsampling::S444)
///     .encode_rgb(&pixels, 320, 240)?;
/// # Ok(())
/// # }
/// ```
pub use encode::Encoder;

/// Error type for encoding operations.
///
/// # Example
///
/// ```no_run
/// use baseline_jpeg::{Encoder, Error};
///
/// # fn example() {
/// let result = Encoder::new().encode_rgb(&[], 0, 0);
/// match result {
///     Ok(data) => println!("Encoded {} bytes", data.len()),
///     Err(Error::InvalidDimensions { width, height }) => {
///         eprintln!("Invalid dimensions: {}x{}", width, height);
///     }
///     Err(e) => eprintln!("Encoding failed: {}", e),
/// }
/// # }
/// ```
pub use error::Error;

/// Result type alias for encoding operations.
pub use error::Result;

/// Which coefficient overflowed in [`Error::CoefficientOverflow`].
pub use error::CoefficientKind;

/// Huffman table class (DC or AC).
pub use error::TableClass;

/// Chroma subsampling mode.
///
/// | Mode | Ratio | MCU |
/// |------|-------|-----|
/// | [`S444`](Subsampling::S444) | 4:4:4 | 8x8, one block per component |
/// | [`S420`](Subsampling::S420) | 4:2:0 | 16x16, four luma blocks (default) |
pub use types::Subsampling;

pub use huffman::{HuffmanTable, HuffmanTableSet};
pub use ppm::{parse_ppm, read_ppm, PpmImage};
pub use quant::QuantTable;
pub use raster::Raster;
