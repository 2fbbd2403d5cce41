//!
//! PWG Raster / URF raster container codecs, and a format autodetector
//! (spec C5-C8). Both containers wrap the same PackBits-like line codec
//! (`packbits`) around their own fixed headers.
//!
use std::path::Path;

pub mod packbits;
pub mod pwg;
pub mod urf;

use crate::error::RasterError;

/// A page dimension large enough to need an explicit cap (spec §5:
/// "reject pages larger than 100 megapixels or 1 GiB uncompressed").
pub const MAX_PAGE_PIXELS: u64 = 100_000_000;
pub const MAX_PAGE_BYTES: u64 = 1 << 30;

/// A non-fatal header anomaly: an out-of-range but self-consistent
/// field value. Returned alongside the decoded header so a caller who
/// hasn't wired up `log` still observes it programmatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterWarning {
    pub field: &'static str,
    pub message: String,
}

impl RasterWarning {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        let warning = RasterWarning {
            field,
            message: message.into(),
        };
        log::warn!("{}: {}", warning.field, warning.message);
        warning
    }
}

/// A decoded raster page: known width, height, channel count and
/// bits-per-channel, owning its own pixel bytes (spec §3 "Pixel grid").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub bits_per_channel: u8,
    pub pixels: Vec<u8>,
}

impl PixelGrid {
    pub fn new(width: u32, height: u32, channels: u8, bits_per_channel: u8, pixels: Vec<u8>) -> Self {
        PixelGrid {
            width,
            height,
            channels,
            bits_per_channel,
            pixels,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        (self.channels as usize * self.bits_per_channel as usize + 7) / 8
    }

    /// Reject pages whose declared dimensions exceed the resource cap
    /// before any allocation is attempted.
    pub(crate) fn check_bounds(width: u32, height: u32, bits_per_pixel: u32) -> Result<(), RasterError> {
        let pixels = width as u64 * height as u64;
        let bytes = pixels * ((bits_per_pixel as u64 + 7) / 8);
        if pixels > MAX_PAGE_PIXELS || bytes > MAX_PAGE_BYTES {
            return Err(RasterError::PageTooLarge {
                width,
                height,
                bits_per_pixel,
            });
        }
        Ok(())
    }
}

/// Container format identified by [`detect_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Pwg,
    Urf,
}

/// Identify a raster container's format from its leading bytes, falling
/// back to the path's suffix (spec §4.7 / S6).
///
/// `leading_bytes` should contain at least the first 8 bytes of the
/// stream when available; fewer bytes still work, just skip the magic
/// checks they can't cover.
pub fn detect_format(path: &Path, leading_bytes: &[u8]) -> Result<RasterFormat, RasterError> {
    if leading_bytes.len() >= 4 && &leading_bytes[0..4] == pwg::MAGIC {
        return Ok(RasterFormat::Pwg);
    }
    if leading_bytes.len() >= 8 && &leading_bytes[0..8] == urf::MAGIC {
        return Ok(RasterFormat::Urf);
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("pwg") => Ok(RasterFormat::Pwg),
        Some("urf") => Ok(RasterFormat::Urf),
        // CUPS raster suffix alias (spec §4.7(c)): mapped to PWG rather
        // than decoded as the original's unfinished third format.
        Some("ras") => Ok(RasterFormat::Pwg),
        _ => Err(RasterError::UnrecognizedFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_take_priority_over_suffix() {
        let path = Path::new("job.urf");
        let format = detect_format(path, pwg::MAGIC).unwrap();
        assert_eq!(format, RasterFormat::Pwg);
    }

    #[test]
    fn missing_magic_falls_back_to_suffix() {
        let path = Path::new("job.urf");
        let format = detect_format(path, &[]).unwrap();
        assert_eq!(format, RasterFormat::Urf);
    }

    #[test]
    fn cups_ras_suffix_maps_to_pwg() {
        let path = Path::new("job.ras");
        let format = detect_format(path, &[]).unwrap();
        assert_eq!(format, RasterFormat::Pwg);
    }

    #[test]
    fn unrecognized_format_is_an_error() {
        let path = Path::new("job.bin");
        assert!(matches!(detect_format(path, &[]), Err(RasterError::UnrecognizedFormat)));
    }

    #[test]
    fn oversized_page_is_rejected() {
        let err = PixelGrid::check_bounds(200_000, 200_000, 32).unwrap_err();
        assert!(matches!(err, RasterError::PageTooLarge { .. }));
    }
}
