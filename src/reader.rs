//!
//! Byte I/O primitives shared by the IPP parser.
//!
use std::io::Read;

use bytes::Bytes;

use crate::error::IppParseError;

/// Thin cursor over a [`std::io::Read`] that turns short reads into
/// [`IppParseError::TruncatedInput`] instead of a raw I/O error, since a
/// truncated IPP message is a parse failure, not a transport failure.
pub struct IppReader<R> {
    inner: R,
}

impl<R: Read> IppReader<R> {
    pub fn new(inner: R) -> Self {
        IppReader { inner }
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), IppParseError> {
        self.inner
            .read_exact(buf)
            .map_err(|_| IppParseError::TruncatedInput {
                needed: buf.len(),
                available: 0,
            })
    }

    pub fn read_u8(&mut self) -> Result<u8, IppParseError> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, IppParseError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, IppParseError> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_i32(&mut self) -> Result<i32, IppParseError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Read exactly `len` bytes and return them as an owned [`Bytes`].
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes, IppParseError> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Read the remainder of the stream, e.g. the trailing document data
    /// following the end-of-attributes marker in a Print-Job request.
    pub fn read_to_end(&mut self) -> Result<Bytes, IppParseError> {
        let mut buf = Vec::new();
        self.inner
            .read_to_end(&mut buf)
            .map_err(|_| IppParseError::TruncatedInput { needed: 1, available: 0 })?;
        Ok(Bytes::from(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_big_endian_integers() {
        let mut r = IppReader::new(Cursor::new(vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x2A]));
        assert_eq!(r.read_u16().unwrap(), 1);
        assert_eq!(r.read_i32().unwrap(), 42);
    }

    #[test]
    fn truncated_read_errors() {
        let mut r = IppReader::new(Cursor::new(vec![0x00]));
        assert!(matches!(r.read_u16(), Err(IppParseError::TruncatedInput { .. })));
    }
}
