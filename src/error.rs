//! Error types for the baseline encoder.

use std::fmt;

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which coefficient class overflowed the baseline range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientKind {
    /// DC difference (category limit 11)
    Dc,
    /// AC coefficient (category limit 10)
    Ac,
}

impl fmt::Display for CoefficientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoefficientKind::Dc => f.write_str("DC"),
            CoefficientKind::Ac => f.write_str("AC"),
        }
    }
}

/// Huffman table class (the `Tc` field of a DHT segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    /// DC table (Tc = 0)
    Dc = 0,
    /// AC table (Tc = 1)
    Ac = 1,
}

impl fmt::Display for TableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableClass::Dc => f.write_str("DC"),
            TableClass::Ac => f.write_str("AC"),
        }
    }
}

/// Error type for encoder operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Invalid image dimensions (zero, or larger than a SOF0 field holds)
    InvalidDimensions {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
    /// Image buffer size doesn't match dimensions
    BufferSizeMismatch {
        /// Expected buffer size in bytes
        expected: usize,
        /// Actual buffer size in bytes
        actual: usize,
    },
    /// Malformed source raster
    InvalidInput(String),
    /// Quantization divisor outside 1..=255
    InvalidQuantTable {
        /// Natural-order position of the offending entry
        index: usize,
        /// Offending value
        value: u16,
    },
    /// Invalid Huffman table structure
    InvalidHuffmanTable(&'static str),
    /// Quantized coefficient too large for the baseline profile
    CoefficientOverflow {
        /// DC difference or AC coefficient
        kind: CoefficientKind,
        /// Magnitude category that was required
        category: u8,
    },
    /// A required symbol has no code in its Huffman table
    SymbolNotFound {
        /// Table class the lookup was made in
        class: TableClass,
        /// Missing symbol
        symbol: u8,
    },
    /// I/O error
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {}x{}", width, height)
            }
            Error::BufferSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Buffer size mismatch: expected {}, got {}",
                    expected, actual
                )
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            Error::InvalidQuantTable { index, value } => {
                write!(
                    f,
                    "Invalid quantization table: entry {} is {} (must be 1-255)",
                    index, value
                )
            }
            Error::InvalidHuffmanTable(reason) => {
                write!(f, "Invalid Huffman table: {}", reason)
            }
            Error::CoefficientOverflow { kind, category } => {
                write!(
                    f,
                    "{} coefficient overflow: category {} exceeds baseline limit",
                    kind, category
                )
            }
            Error::SymbolNotFound { class, symbol } => {
                write!(
                    f,
                    "Huffman symbol 0x{:02X} not found in {} table",
                    symbol, class
                )
            }
            Error::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = [
            (
                Error::InvalidDimensions {
                    width: 0,
                    height: 100,
                },
                "Invalid image dimensions: 0x100",
            ),
            (
                Error::BufferSizeMismatch {
                    expected: 1000,
                    actual: 500,
                },
                "Buffer size mismatch: expected 1000, got 500",
            ),
            (
                Error::InvalidInput("bad magic".into()),
                "Invalid input: bad magic",
            ),
            (
                Error::InvalidQuantTable { index: 3, value: 0 },
                "Invalid quantization table: entry 3 is 0 (must be 1-255)",
            ),
            (
                Error::InvalidHuffmanTable("duplicate symbol"),
                "Invalid Huffman table: duplicate symbol",
            ),
            (
                Error::CoefficientOverflow {
                    kind: CoefficientKind::Ac,
                    category: 11,
                },
                "AC coefficient overflow: category 11 exceeds baseline limit",
            ),
            (
                Error::SymbolNotFound {
                    class: TableClass::Dc,
                    symbol: 5,
                },
                "Huffman symbol 0x05 not found in DC table",
            ),
            (Error::IoError("disk full".into()), "I/O error: disk full"),
        ];

        for (error, expected_msg) in errors {
            assert_eq!(error.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::IoError(_)));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_clone_and_eq() {
        let error1 = Error::CoefficientOverflow {
            kind: CoefficientKind::Dc,
            category: 12,
        };
        let error2 = error1.clone();
        assert_eq!(error1, error2);
        assert_ne!(error1, Error::InvalidInput(String::new()));
    }
}
