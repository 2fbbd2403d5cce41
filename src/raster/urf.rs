//!
//! Apple URF (UNIRAST) raster container: an 8-byte magic followed by a
//! single 36-byte stream header shared by every page, then `page-count`
//! compressed page bodies (spec §4.5 / §3).
//!
use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::RasterError;
use crate::raster::{packbits, PixelGrid, RasterWarning};

pub const MAGIC: &[u8; 8] = b"UNIRAST\0";

const HEADER_LEN: usize = 36;

/// `color-space` codes from the URF enumeration (spec GLOSSARY /
/// `original_source/raster.py`'s `COLOR_SPACE_ENUM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Black,
    Cmyk,
    Sgray,
    Srgb,
    AdobeRgb,
    DeviceN(u8),
}

impl ColorSpace {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ColorSpace::Rgb),
            3 => Some(ColorSpace::Black),
            6 => Some(ColorSpace::Cmyk),
            18 => Some(ColorSpace::Sgray),
            19 => Some(ColorSpace::Srgb),
            20 => Some(ColorSpace::AdobeRgb),
            48..=62 => Some(ColorSpace::DeviceN(code - 47)),
            _ => None,
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            ColorSpace::Black | ColorSpace::Sgray => 1,
            ColorSpace::Rgb | ColorSpace::Srgb | ColorSpace::AdobeRgb => 3,
            ColorSpace::Cmyk => 4,
            ColorSpace::DeviceN(n) => n,
        }
    }
}

/// The single 36-byte header shared by an entire URF stream: one
/// `page-count` plus the bpp/colorspace/width/height/dpi fields every
/// page in the stream is decoded against. `unknown0..3` are opaque
/// reserved words preserved byte-for-byte on a read/write round-trip
/// rather than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrfHeader {
    pub pages: u32,
    pub bpp: u8,
    pub colorspace: u8,
    pub duplex: u8,
    pub quality: u8,
    pub unknown0: u32,
    pub unknown1: u32,
    pub page_width: u32,
    pub page_height: u32,
    pub dpi: u32,
    pub unknown2: u32,
    pub unknown3: u32,
}

impl UrfHeader {
    fn decode(data: &mut Bytes, warnings: &mut Vec<RasterWarning>) -> Result<Self, RasterError> {
        if data.remaining() < HEADER_LEN {
            return Err(RasterError::TruncatedInput {
                needed: HEADER_LEN,
                available: data.remaining(),
            });
        }

        let pages = data.get_u32();
        if pages == 0 {
            warnings.push(RasterWarning::new("pages", "zero or less pages found"));
        }
        let bpp = data.get_u8();
        if !matches!(bpp, 8 | 24 | 32 | 64) {
            warnings.push(RasterWarning::new("bpp", format!("{bpp} is not in the expected set {{8,24,32,64}}")));
        }
        let colorspace = data.get_u8();
        if colorspace > 6 {
            warnings.push(RasterWarning::new("colorspace", format!("{colorspace} is outside 0..=6")));
        }
        let duplex = data.get_u8();
        if duplex > 3 {
            warnings.push(RasterWarning::new("duplex", format!("{duplex} is outside 0..=3")));
        }
        let quality = data.get_u8();
        if !(3..=5).contains(&quality) {
            warnings.push(RasterWarning::new("quality", format!("{quality} is outside 3..=5")));
        }
        let unknown0 = data.get_u32();
        let unknown1 = data.get_u32();
        let page_width = data.get_u32();
        let page_height = data.get_u32();
        if page_width == 0 {
            warnings.push(RasterWarning::new("page_width", "zero or less page width"));
        }
        if page_height == 0 {
            warnings.push(RasterWarning::new("page_height", "zero or less page height"));
        }
        let dpi = data.get_u32();
        let unknown2 = data.get_u32();
        let unknown3 = data.get_u32();

        Ok(UrfHeader {
            pages,
            bpp,
            colorspace,
            duplex,
            quality,
            unknown0,
            unknown1,
            page_width,
            page_height,
            dpi,
            unknown2,
            unknown3,
        })
    }

    fn encode(&self, out: &mut BytesMut) {
        out.put_u32(self.pages);
        out.put_u8(self.bpp);
        out.put_u8(self.colorspace);
        out.put_u8(self.duplex);
        out.put_u8(self.quality);
        out.put_u32(self.unknown0);
        out.put_u32(self.unknown1);
        out.put_u32(self.page_width);
        out.put_u32(self.page_height);
        out.put_u32(self.dpi);
        out.put_u32(self.unknown2);
        out.put_u32(self.unknown3);
    }
}

/// A decoded URF stream: the one shared header plus each page's pixel
/// grid, all decoded at the header's declared width/height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrfStream {
    pub header: UrfHeader,
    pub pages: Vec<PixelGrid>,
}

/// Decode a full URF stream, returning the shared header, each page's
/// pixel grid, and any header anomalies noticed along the way (spec
/// §4.5, §7).
pub fn decode(mut data: Bytes) -> Result<(UrfStream, Vec<RasterWarning>), RasterError> {
    if data.remaining() < MAGIC.len() {
        return Err(RasterError::TruncatedInput {
            needed: MAGIC.len(),
            available: data.remaining(),
        });
    }
    let magic = data.copy_to_bytes(MAGIC.len());
    if &magic[..] != &MAGIC[..] {
        return Err(RasterError::BadMagic {
            expected: MAGIC,
            found: magic.to_vec(),
        });
    }

    let mut warnings = Vec::new();
    let header = UrfHeader::decode(&mut data, &mut warnings)?;

    let bits_per_pixel = header.bpp as u32;
    PixelGrid::check_bounds(header.page_width, header.page_height, bits_per_pixel)?;
    let channels = ColorSpace::from_code(header.colorspace).map(|c| c.channels()).unwrap_or(1);
    let bits_per_channel = header.bpp / channels;
    let bytes_per_pixel = (bits_per_pixel as usize + 7) / 8;

    let mut pages = Vec::with_capacity(header.pages as usize);
    for _ in 0..header.pages {
        let pixels = packbits::decode_page(&mut data, header.page_width, header.page_height, bytes_per_pixel.max(1))?;
        pages.push(PixelGrid::new(header.page_width, header.page_height, channels, bits_per_channel, pixels));
    }

    Ok((UrfStream { header, pages }, warnings))
}

/// Encode a full URF stream from a shared header and its page grids.
pub fn encode(stream: &UrfStream) -> Bytes {
    let mut out = BytesMut::new();
    out.put_slice(MAGIC);
    stream.header.encode(&mut out);

    let bytes_per_pixel = ((stream.header.bpp as usize) + 7) / 8;
    for grid in &stream.pages {
        let body = packbits::encode_page(&grid.pixels, stream.header.page_width, stream.header.page_height, bytes_per_pixel.max(1));
        out.put_slice(&body);
    }

    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s1_header(pages: u32) -> UrfHeader {
        UrfHeader {
            pages,
            bpp: 8,
            colorspace: 2,
            duplex: 1,
            quality: 5,
            unknown0: 1,
            unknown1: 2,
            page_width: 3,
            page_height: 4,
            dpi: 5,
            unknown2: 6,
            unknown3: 7,
        }
    }

    #[test]
    fn header_round_trips_matching_scenario_s1() {
        let pixels = vec![0u8; 3 * 4];
        let stream = UrfStream {
            header: s1_header(1),
            pages: vec![PixelGrid::new(3, 4, 1, 8, pixels)],
        };
        let encoded = encode(&stream);

        let mut expected = Vec::new();
        expected.extend_from_slice(MAGIC);
        expected.extend_from_slice(&[0, 0, 0, 1]); // pages
        expected.extend_from_slice(&[8, 2, 1, 5]);
        expected.extend_from_slice(&[0, 0, 0, 1]); // unknown0
        expected.extend_from_slice(&[0, 0, 0, 2]); // unknown1
        expected.extend_from_slice(&[0, 0, 0, 3]); // page_width
        expected.extend_from_slice(&[0, 0, 0, 4]); // page_height
        expected.extend_from_slice(&[0, 0, 0, 5]); // dpi
        expected.extend_from_slice(&[0, 0, 0, 6]); // unknown2
        expected.extend_from_slice(&[0, 0, 0, 7]); // unknown3
        assert_eq!(&encoded[0..expected.len()], &expected[..]);

        let (decoded, _warnings) = decode(encoded).unwrap();
        assert_eq!(decoded.header, s1_header(1));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let bytes = Bytes::from_static(b"NOTURF\0\0\0\0\0\0");
        assert!(matches!(decode(bytes), Err(RasterError::BadMagic { .. })));
    }

    #[test]
    fn multi_page_stream_shares_one_header() {
        let stream = UrfStream {
            header: s1_header(2),
            pages: vec![
                PixelGrid::new(3, 4, 1, 8, vec![1u8; 12]),
                PixelGrid::new(3, 4, 1, 8, vec![2u8; 12]),
            ],
        };
        let encoded = encode(&stream);
        let (decoded, warnings) = decode(encoded).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(decoded.pages.len(), 2);
        assert_eq!(decoded.pages[0].pixels, vec![1u8; 12]);
        assert_eq!(decoded.pages[1].pixels, vec![2u8; 12]);
    }

    #[test]
    fn out_of_range_quality_is_a_warning_not_a_failure() {
        let mut header = s1_header(1);
        header.quality = 9;
        let stream = UrfStream {
            header,
            pages: vec![PixelGrid::new(3, 4, 1, 8, vec![0u8; 12])],
        };
        let encoded = encode(&stream);
        let (decoded, warnings) = decode(encoded).unwrap();
        assert_eq!(decoded.pages.len(), 1);
        assert!(warnings.iter().any(|w| w.field == "quality"));
    }

    #[test]
    fn pixel_grid_round_trips() {
        let grid_pixels = vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90, 0xA0, 0xB0, 0xC0];
        let stream = UrfStream {
            header: s1_header(1),
            pages: vec![PixelGrid::new(3, 4, 1, 8, grid_pixels.clone())],
        };
        let encoded = encode(&stream);
        let (decoded, _) = decode(encoded).unwrap();
        assert_eq!(decoded.pages[0].pixels, grid_pixels);
    }
}
