//!
//! Error types shared across the IPP codec, the raster codecs and the
//! client facade.
//!
use thiserror::Error;

/// Errors produced while decoding or encoding an IPP message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IppParseError {
    #[error("unexpected end of input: needed {needed} more byte(s), {available} available")]
    TruncatedInput { needed: usize, available: usize },

    #[error("unrecognized delimiter tag 0x{tag:02x} at offset {offset}")]
    UnknownDelimiterTag { tag: u8, offset: usize },

    #[error("string of {len} byte(s) exceeds the {max} byte limit for this value")]
    InvalidStringLength { len: usize, max: u16 },

    #[error("attribute name of {len} byte(s) exceeds the 255 byte limit")]
    NameTooLong { len: usize },

    #[error("declared value length {len} exceeds the 65535 byte wire limit")]
    ValueLengthOverflow { len: usize },

    #[error("collection nesting exceeds the maximum depth of {max}")]
    CollectionOverflow { max: usize },

    #[error("end-collection tag encountered with no open collection")]
    CollectionUnderflow,
}

/// Errors produced while decoding or encoding a raster page stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("bad magic bytes: expected {expected:?}, found {found:?}")]
    BadMagic { expected: &'static [u8], found: Vec<u8> },

    #[error("unexpected end of input: needed {needed} more byte(s), {available} available")]
    TruncatedInput { needed: usize, available: usize },

    #[error("line {line} decoded to {actual} byte(s), expected {expected} (bytesPerLine)")]
    BytesPerLineMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("page dimensions {width}x{height} at {bits_per_pixel} bpp exceed the maximum decodable page size")]
    PageTooLarge {
        width: u32,
        height: u32,
        bits_per_pixel: u32,
    },

    #[error("unsupported color space code {code}")]
    UnsupportedColorSpace { code: u8 },

    #[error("unsupported bit depth {depth} for color space code {code}")]
    UnsupportedBitDepth { depth: u8, code: u8 },

    #[error("stream could not be identified as either PWG or URF raster")]
    UnrecognizedFormat,
}

/// Errors produced by the client facade while constructing requests or
/// interpreting responses. Transport itself is supplied by the caller
/// (spec §6); this only wraps the caller's report of failure.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Parse(#[from] IppParseError),

    #[error("transport failed: {0}")]
    TransportFailure(String),

    #[error("printer returned unsuccessful status {status:?}: {message}")]
    UnsuccessfulStatus {
        status: crate::model::StatusCode,
        message: String,
    },
}
