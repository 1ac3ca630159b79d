//! Plain-text PPM (`P3`) reading and writing.
//!
//! Only 8-bit images (maxval 255) are accepted. `#` starts a comment that
//! runs to the end of the line, anywhere in the file.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::raster::{Raster, MAX_DIMENSION};

const MAGIC: &str = "P3";
const MAX_VALUE: u32 = 255;

/// A decoded PPM image with interleaved RGB samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpmImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Row-major `R, G, B` triples
    pub rgb: Vec<u8>,
}

impl PpmImage {
    /// Borrow the image as a validated raster.
    pub fn as_raster(&self) -> Result<Raster<'_>> {
        Raster::new(&self.rgb, self.width, self.height)
    }

    /// Write the image as `P3` text, one pixel row per line.
    pub fn write<W: Write>(&self, mut output: W) -> Result<()> {
        writeln!(output, "{}\n{} {}\n{}", MAGIC, self.width, self.height, MAX_VALUE)?;
        let row_len = self.width as usize * 3;
        for row in self.rgb.chunks(row_len.max(1)) {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(output, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidInput(msg.into())
}

/// Whitespace-separated tokens with comments removed.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
}

fn parse_header_field(token: Option<&str>, name: &str) -> Result<u32> {
    let token = token.ok_or_else(|| invalid(format!("missing {}", name)))?;
    token
        .parse::<u32>()
        .map_err(|_| invalid(format!("bad {}: {:?}", name, token)))
}

/// Parse `P3` text into an image.
pub fn parse_ppm(text: &str) -> Result<PpmImage> {
    let mut tokens = tokens(text);

    match tokens.next() {
        Some(MAGIC) => {}
        Some(other) => return Err(invalid(format!("bad magic {:?}", other))),
        None => return Err(invalid("empty file")),
    }

    let width = parse_header_field(tokens.next(), "width")?;
    let height = parse_header_field(tokens.next(), "height")?;
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::InvalidDimensions { width, height });
    }

    let maxval = parse_header_field(tokens.next(), "maxval")?;
    if maxval != MAX_VALUE {
        return Err(invalid(format!("unsupported maxval {}", maxval)));
    }

    let expected = width as usize * height as usize * 3;
    // Bounded by the text: every sample takes at least two bytes
    let mut rgb = Vec::with_capacity(expected.min(text.len() / 2));
    for token in tokens {
        if rgb.len() == expected {
            return Err(invalid("excess sample data"));
        }
        let value = token
            .parse::<u8>()
            .map_err(|_| invalid(format!("bad sample {:?}", token)))?;
        rgb.push(value);
    }

    if rgb.len() != expected {
        return Err(invalid(format!(
            "expected {} samples, found {}",
            expected,
            rgb.len()
        )));
    }

    log::debug!("parsed P3 image {}x{}", width, height);
    Ok(PpmImage { width, height, rgb })
}

/// Read and parse a `P3` stream.
pub fn read_ppm<R: Read>(mut input: R) -> Result<PpmImage> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes).map_err(|e| invalid(format!("not UTF-8: {}", e)))?;
    parse_ppm(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let image = parse_ppm("P3\n2 1\n255\n255 0 0  0 0 255\n").unwrap();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 1);
        assert_eq!(image.rgb, vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_comments_and_layout() {
        let text = "P3 # magic\n# a comment line\n1 2 255\n1 2 3 # trailing\n4\n5 6\n";
        let image = parse_ppm(text).unwrap();
        assert_eq!(image.rgb, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_rejects_bad_magic() {
        assert!(matches!(
            parse_ppm("P6\n1 1\n255\n0 0 0"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(parse_ppm(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_maxval() {
        assert!(matches!(
            parse_ppm("P3\n1 1\n65535\n0 0 0"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_sample_out_of_range() {
        assert!(matches!(
            parse_ppm("P3\n1 1\n255\n0 256 0"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            parse_ppm("P3\n1 1\n255\n0 -1 0"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_short_and_excess_data() {
        assert!(matches!(
            parse_ppm("P3\n2 1\n255\n0 0 0"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            parse_ppm("P3\n1 1\n255\n0 0 0 7"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            parse_ppm("P3\n0 1\n255\n"),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_huge_header_with_short_body() {
        let err = parse_ppm("P3\n65535 65535\n255\n0 0 0\n").unwrap_err();
        assert!(
            matches!(&err, Error::InvalidInput(msg) if msg.starts_with("expected")),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_read_errors() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
            }
        }

        assert!(matches!(
            read_ppm(FailingReader),
            Err(Error::IoError(msg)) if msg.contains("disk gone")
        ));
        assert!(matches!(
            read_ppm(&b"P3\n1 1\n255\n\xFF 0 0"[..]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_read_and_write() {
        let text = "P3\n2 2\n255\n1 2 3 4 5 6\n7 8 9 10 11 12\n";
        let image = read_ppm(text.as_bytes()).unwrap();

        let mut out = Vec::new();
        image.write(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), text);

        let raster = image.as_raster().unwrap();
        assert_eq!(raster.pixel(1, 1), (10, 11, 12));
    }
}
