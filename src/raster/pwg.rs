//!
//! PWG Raster 1.0 container (PWG5102.4): a 4-byte stream-level magic,
//! then one 1796-byte page header plus compressed body per page
//! (spec §4.6 / §3).
//!
use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::RasterError;
use crate::raster::{packbits, PixelGrid, RasterWarning};

pub const MAGIC: &[u8; 4] = b"RaS2";

const PAGE_HEADER_LEN: usize = 1796;
const PWG_RASTER_SENTINEL: &[u8; 9] = b"PwgRaster";

fn fixed_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn put_fixed_str(out: &mut BytesMut, s: &str, width: usize) {
    let bytes = s.as_bytes();
    let take = bytes.len().min(width);
    out.put_slice(&bytes[..take]);
    out.put_bytes(0, width - take);
}

/// `color-space` codes, shared with the enumeration named in the URF
/// module (spec GLOSSARY).
pub use super::urf::ColorSpace;

/// Orientation values (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
    ReversePortrait,
    ReverseLandscape,
    Other(u32),
}

impl Orientation {
    fn from_code(code: u32) -> Self {
        match code {
            0 => Orientation::Portrait,
            1 => Orientation::Landscape,
            2 => Orientation::ReversePortrait,
            3 => Orientation::ReverseLandscape,
            other => Orientation::Other(other),
        }
    }

    fn to_code(self) -> u32 {
        match self {
            Orientation::Portrait => 0,
            Orientation::Landscape => 1,
            Orientation::ReversePortrait => 2,
            Orientation::ReverseLandscape => 3,
            Orientation::Other(code) => code,
        }
    }
}

/// The fixed 1796-byte PWG page header. Field order and offsets follow
/// PWG5102.4 exactly; reserved regions are zero-filled on write and
/// ignored on read (testable property 5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwgPageHeader {
    pub media_color: String,
    pub media_type: String,
    pub print_content_optimize: String,
    pub cut_media: u32,
    pub duplex: bool,
    pub hw_resolution: (u32, u32),
    pub insert_sheet: u32,
    pub jog: u32,
    pub leading_edge: u32,
    pub media_position: u32,
    pub media_weight_metric: u32,
    pub num_copies: u32,
    pub orientation: Orientation,
    pub page_size: (u32, u32),
    pub tumble: bool,
    pub width: u32,
    pub height: u32,
    pub bits_per_color: u32,
    pub bits_per_pixel: u32,
    pub bytes_per_line: u32,
    pub color_order: u32,
    pub color_space: u32,
    pub num_colors: u32,
    pub total_page_count: i32,
    pub cross_feed_transform: i32,
    pub feed_transform: i32,
    pub image_box: (u32, u32, u32, u32),
    pub alternate_primary: [u8; 4],
    pub print_quality: u32,
    pub vendor_identifier: u32,
    pub vendor_data: Bytes,
    pub rendering_intent: String,
    pub page_size_name: String,
}

impl PwgPageHeader {
    fn decode(data: &mut Bytes, warnings: &mut Vec<RasterWarning>) -> Result<Self, RasterError> {
        if data.remaining() < PAGE_HEADER_LEN {
            return Err(RasterError::TruncatedInput {
                needed: PAGE_HEADER_LEN,
                available: data.remaining(),
            });
        }
        let mut header = data.copy_to_bytes(PAGE_HEADER_LEN);

        let sentinel = header.copy_to_bytes(64);
        if &sentinel[..PWG_RASTER_SENTINEL.len()] != &PWG_RASTER_SENTINEL[..] {
            warnings.push(RasterWarning::new("pwg_raster", "second header sentinel does not match \"PwgRaster\""));
        }

        let media_color = fixed_str(&header.copy_to_bytes(64));
        let media_type = fixed_str(&header.copy_to_bytes(64));
        let print_content_optimize = fixed_str(&header.copy_to_bytes(64));
        header.advance(12); // reserved

        let cut_media = header.get_u32();
        let duplex = header.get_u32() != 0;
        let hw_resolution = (header.get_u32(), header.get_u32());
        header.advance(16); // reserved

        let insert_sheet = header.get_u32();
        let jog = header.get_u32();
        let leading_edge = header.get_u32();
        header.advance(12); // reserved

        let media_position = header.get_u32();
        let media_weight_metric = header.get_u32();
        header.advance(8); // reserved

        let num_copies = header.get_u32();
        let orientation = Orientation::from_code(header.get_u32());
        header.advance(4); // reserved

        let page_size = (header.get_u32(), header.get_u32());
        header.advance(8); // reserved

        let tumble = header.get_u32() != 0;
        let width = header.get_u32();
        let height = header.get_u32();
        header.advance(4); // reserved

        let bits_per_color = header.get_u32();
        let bits_per_pixel = header.get_u32();
        let bytes_per_line = header.get_u32();
        let color_order = header.get_u32();
        let color_space = header.get_u32();
        if ColorSpace::from_code(color_space as u8).is_none() {
            warnings.push(RasterWarning::new("color_space", format!("{color_space} is not a recognized color-space code")));
        }
        header.advance(16); // reserved

        let num_colors = header.get_u32();
        header.advance(28); // reserved

        let total_page_count = header.get_i32();
        let cross_feed_transform = header.get_i32();
        let feed_transform = header.get_i32();
        let image_box = (header.get_u32(), header.get_u32(), header.get_u32(), header.get_u32());

        let mut alternate_primary = [0u8; 4];
        header.copy_to_slice(&mut alternate_primary);

        let print_quality = header.get_u32();
        header.advance(20); // reserved

        let vendor_identifier = header.get_u32();
        let vendor_length = header.get_u32();
        let vendor_data_region = header.copy_to_bytes(1088);
        let vendor_data = if (vendor_length as usize) <= vendor_data_region.len() {
            vendor_data_region.slice(0..vendor_length as usize)
        } else {
            warnings.push(RasterWarning::new("vendor_length", format!("{vendor_length} exceeds the 1088-byte vendor-data area")));
            vendor_data_region
        };
        header.advance(64); // reserved

        let rendering_intent = fixed_str(&header.copy_to_bytes(64));
        let page_size_name = fixed_str(&header.copy_to_bytes(64));

        let expected_bytes_per_line = (bits_per_pixel * width + 7) / 8;
        if bytes_per_line != expected_bytes_per_line {
            return Err(RasterError::BytesPerLineMismatch {
                line: 0,
                expected: expected_bytes_per_line as usize,
                actual: bytes_per_line as usize,
            });
        }

        Ok(PwgPageHeader {
            media_color,
            media_type,
            print_content_optimize,
            cut_media,
            duplex,
            hw_resolution,
            insert_sheet,
            jog,
            leading_edge,
            media_position,
            media_weight_metric,
            num_copies,
            orientation,
            page_size,
            tumble,
            width,
            height,
            bits_per_color,
            bits_per_pixel,
            bytes_per_line,
            color_order,
            color_space,
            num_colors,
            total_page_count,
            cross_feed_transform,
            feed_transform,
            image_box,
            alternate_primary,
            print_quality,
            vendor_identifier,
            vendor_data,
            rendering_intent,
            page_size_name,
        })
    }

    fn encode(&self, out: &mut BytesMut) {
        put_fixed_str(out, "PwgRaster", 64);
        put_fixed_str(out, &self.media_color, 64);
        put_fixed_str(out, &self.media_type, 64);
        put_fixed_str(out, &self.print_content_optimize, 64);
        out.put_bytes(0, 12);

        out.put_u32(self.cut_media);
        out.put_u32(self.duplex as u32);
        out.put_u32(self.hw_resolution.0);
        out.put_u32(self.hw_resolution.1);
        out.put_bytes(0, 16);

        out.put_u32(self.insert_sheet);
        out.put_u32(self.jog);
        out.put_u32(self.leading_edge);
        out.put_bytes(0, 12);

        out.put_u32(self.media_position);
        out.put_u32(self.media_weight_metric);
        out.put_bytes(0, 8);

        out.put_u32(self.num_copies);
        out.put_u32(self.orientation.to_code());
        out.put_bytes(0, 4);

        out.put_u32(self.page_size.0);
        out.put_u32(self.page_size.1);
        out.put_bytes(0, 8);

        out.put_u32(self.tumble as u32);
        out.put_u32(self.width);
        out.put_u32(self.height);
        out.put_bytes(0, 4);

        out.put_u32(self.bits_per_color);
        out.put_u32(self.bits_per_pixel);
        out.put_u32(self.bytes_per_line);
        out.put_u32(self.color_order);
        out.put_u32(self.color_space);
        out.put_bytes(0, 16);

        out.put_u32(self.num_colors);
        out.put_bytes(0, 28);

        out.put_i32(self.total_page_count);
        out.put_i32(self.cross_feed_transform);
        out.put_i32(self.feed_transform);
        out.put_u32(self.image_box.0);
        out.put_u32(self.image_box.1);
        out.put_u32(self.image_box.2);
        out.put_u32(self.image_box.3);

        out.put_slice(&self.alternate_primary);

        out.put_u32(self.print_quality);
        out.put_bytes(0, 20);

        out.put_u32(self.vendor_identifier);
        out.put_u32(self.vendor_data.len() as u32);
        out.put_slice(&self.vendor_data);
        out.put_bytes(0, 1088 - self.vendor_data.len());
        out.put_bytes(0, 64);

        put_fixed_str(out, &self.rendering_intent, 64);
        put_fixed_str(out, &self.page_size_name, 64);
    }

    /// `bytes-per-line = floor((bits-per-pixel * width + 7) / 8)` (spec §3).
    pub fn expected_bytes_per_line(&self) -> u32 {
        (self.bits_per_pixel * self.width + 7) / 8
    }
}

/// A decoded PWG page: header plus pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwgPage {
    pub header: PwgPageHeader,
    pub grid: PixelGrid,
}

/// Decode a full PWG stream.
pub fn decode(mut data: Bytes) -> Result<(Vec<PwgPage>, Vec<RasterWarning>), RasterError> {
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
    let mut pages = Vec::new();
    while data.has_remaining() {
        let header = PwgPageHeader::decode(&mut data, &mut warnings)?;
        PixelGrid::check_bounds(header.width, header.height, header.bits_per_pixel)?;

        let channels = ColorSpace::from_code(header.color_space as u8).map(|c| c.channels()).unwrap_or(1);
        let bits_per_channel = header.bits_per_color as u8;
        let bytes_per_pixel = (header.bits_per_pixel as usize + 7) / 8;
        let pixels = packbits::decode_page(&mut data, header.width, header.height, bytes_per_pixel.max(1))?;

        pages.push(PwgPage {
            header,
            grid: PixelGrid::new(header.width, header.height, channels, bits_per_channel, pixels),
        });
    }

    Ok((pages, warnings))
}

/// Encode a full PWG stream: magic once, then each page's header and body.
pub fn encode(pages: &[PwgPage]) -> Bytes {
    let mut out = BytesMut::new();
    out.put_slice(MAGIC);

    for page in pages {
        page.header.encode(&mut out);
        let bytes_per_pixel = (page.header.bits_per_pixel as usize + 7) / 8;
        let body = packbits::encode_page(&page.grid.pixels, page.header.width, page.header.height, bytes_per_pixel.max(1));
        out.put_slice(&body);
    }

    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header(width: u32, height: u32, bits_per_pixel: u32, color_space: u32) -> PwgPageHeader {
        let bytes_per_line = (bits_per_pixel * width + 7) / 8;
        PwgPageHeader {
            media_color: String::new(),
            media_type: String::new(),
            print_content_optimize: String::new(),
            cut_media: 0,
            duplex: false,
            hw_resolution: (300, 300),
            insert_sheet: 0,
            jog: 0,
            leading_edge: 0,
            media_position: 0,
            media_weight_metric: 0,
            num_copies: 1,
            orientation: Orientation::Portrait,
            page_size: (0, 0),
            tumble: false,
            width,
            height,
            bits_per_color: 8,
            bits_per_pixel,
            bytes_per_line,
            color_order: 0,
            color_space,
            num_colors: 3,
            total_page_count: 1,
            cross_feed_transform: 1,
            feed_transform: 1,
            image_box: (0, 0, 0, 0),
            alternate_primary: [0, 0, 0, 0],
            print_quality: 4,
            vendor_identifier: 0,
            vendor_data: Bytes::new(),
            rendering_intent: String::new(),
            page_size_name: "na_letter_8.5x11in".to_string(),
        }
    }

    #[test]
    fn single_pixel_page_matches_scenario_s3() {
        let header = sample_header(1, 1, 24, 1);
        let page = PwgPage {
            header,
            grid: PixelGrid::new(1, 1, 3, 8, vec![0x11, 0x22, 0x33]),
        };
        let encoded = encode(std::slice::from_ref(&page));

        assert_eq!(&encoded[0..4], MAGIC);
        assert_eq!(encoded.len(), 4 + PAGE_HEADER_LEN + 5);
        assert_eq!(&encoded[encoded.len() - 5..], &[0x00, 0x00, 0x11, 0x22, 0x33]);

        let (decoded, _warnings) = decode(encoded).unwrap();
        assert_eq!(decoded[0].grid.pixels, vec![0x11, 0x22, 0x33]);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let bytes = Bytes::from_static(b"NOPE");
        assert!(matches!(decode(bytes), Err(RasterError::BadMagic { .. })));
    }

    #[test]
    fn bytes_per_line_mismatch_is_fatal() {
        let mut header = sample_header(4, 1, 8, 3);
        header.bytes_per_line = 99;
        let page = PwgPage {
            header,
            grid: PixelGrid::new(4, 1, 1, 8, vec![0u8; 4]),
        };
        let mut out = BytesMut::new();
        out.put_slice(MAGIC);
        page.header.encode(&mut out);
        out.put_slice(&packbits::encode_page(&page.grid.pixels, 4, 1, 1));
        assert!(matches!(decode(out.freeze()), Err(RasterError::BytesPerLineMismatch { .. })));
    }

    #[test]
    fn reserved_bytes_do_not_affect_decoded_pixels() {
        let header = sample_header(2, 1, 8, 3);
        let page = PwgPage {
            header,
            grid: PixelGrid::new(2, 1, 1, 8, vec![7, 9]),
        };
        let mut encoded = encode(std::slice::from_ref(&page)).to_vec();

        // Flip a byte inside a reserved region (the 12 bytes after the
        // three 64-byte strings, before cut_media).
        let reserved_offset = 4 + 64 * 4;
        encoded[reserved_offset] ^= 0xFF;

        let (decoded, _warnings) = decode(Bytes::from(encoded)).unwrap();
        assert_eq!(decoded[0].grid.pixels, vec![7, 9]);
    }

    #[test]
    fn multi_page_stream_round_trips() {
        let header_a = sample_header(1, 1, 8, 3);
        let header_b = sample_header(1, 1, 8, 3);
        let pages = vec![
            PwgPage { header: header_a, grid: PixelGrid::new(1, 1, 1, 8, vec![1]) },
            PwgPage { header: header_b, grid: PixelGrid::new(1, 1, 1, 8, vec![2]) },
        ];
        let encoded = encode(&pages);
        let (decoded, _warnings) = decode(encoded).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].grid.pixels, vec![1]);
        assert_eq!(decoded[1].grid.pixels, vec![2]);
    }
}
