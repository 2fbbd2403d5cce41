//! Crate-level round-trip tests for the PWG and URF raster containers
//! and the format autodetector (spec §8, testable properties 2-5).
use std::path::Path;

use bytes::Bytes;

use ipp_raster::raster::{detect_format, pwg, urf, RasterFormat};

fn urf_header(pages: u32, width: u32, height: u32) -> urf::UrfHeader {
    urf::UrfHeader {
        pages,
        bpp: 8,
        colorspace: 18, // Sgray
        duplex: 0,
        quality: 4,
        unknown0: 0,
        unknown1: 0,
        page_width: width,
        page_height: height,
        dpi: 300,
        unknown2: 0,
        unknown3: 0,
    }
}

fn pwg_header(width: u32, height: u32) -> pwg::PwgPageHeader {
    let bits_per_pixel = 8;
    let bytes_per_line = (bits_per_pixel * width + 7) / 8;
    pwg::PwgPageHeader {
        media_color: "white".to_string(),
        media_type: "stationery".to_string(),
        print_content_optimize: "auto".to_string(),
        cut_media: 0,
        duplex: false,
        hw_resolution: (300, 300),
        insert_sheet: 0,
        jog: 0,
        leading_edge: 0,
        media_position: 0,
        media_weight_metric: 0,
        num_copies: 1,
        orientation: pwg::Orientation::Portrait,
        page_size: (21590, 27940),
        tumble: false,
        width,
        height,
        bits_per_color: 8,
        bits_per_pixel,
        bytes_per_line,
        color_order: 0,
        color_space: 18,
        num_colors: 1,
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
fn urf_multi_page_stream_round_trips() {
    // Every page in a URF stream shares the one stream-level header, so
    // both pages here share the same 4x2 dimensions (spec §4.5: "for each
    // of `pages` pages, invoke C5 to decode a page of dimensions
    // (page-width x page-height)").
    let stream = urf::UrfStream {
        header: urf_header(2, 4, 2),
        pages: vec![
            ipp_raster::PixelGrid::new(4, 2, 1, 8, vec![1, 2, 3, 4, 1, 2, 3, 4]),
            ipp_raster::PixelGrid::new(4, 2, 1, 8, vec![9, 9, 9, 9, 9, 9, 9, 9]),
        ],
    };
    let encoded = urf::encode(&stream);
    let (decoded, warnings) = urf::decode(encoded).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(decoded.pages.len(), 2);
    assert_eq!(decoded.pages[0].pixels, vec![1, 2, 3, 4, 1, 2, 3, 4]);
    assert_eq!(decoded.pages[1].pixels, vec![9, 9, 9, 9, 9, 9, 9, 9]);
}

#[test]
fn pwg_stream_round_trips_with_varied_pixel_data() {
    let pixels: Vec<u8> = (0..(6 * 3)).map(|i| (i * 7) as u8).collect();
    let page = pwg::PwgPage {
        header: pwg_header(6, 3),
        grid: ipp_raster::PixelGrid::new(6, 3, 1, 8, pixels.clone()),
    };
    let encoded = pwg::encode(std::slice::from_ref(&page));
    let (decoded, warnings) = pwg::decode(encoded).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(decoded[0].grid.pixels, pixels);
}

#[test]
fn detect_format_prefers_magic_over_extension() {
    let path = Path::new("job.pwg");
    assert_eq!(detect_format(path, urf::MAGIC).unwrap(), RasterFormat::Urf);
}

#[test]
fn detect_format_reads_a_pwg_stream_it_identifies() {
    let page = pwg::PwgPage {
        header: pwg_header(1, 1),
        grid: ipp_raster::PixelGrid::new(1, 1, 1, 8, vec![5]),
    };
    let encoded = pwg::encode(std::slice::from_ref(&page));
    let format = detect_format(Path::new("scan"), &encoded[..8]).unwrap();
    assert_eq!(format, RasterFormat::Pwg);
    let (decoded, _) = pwg::decode(encoded).unwrap();
    assert_eq!(decoded[0].grid.pixels, vec![5]);
}

#[test]
fn urf_bad_colorspace_is_a_warning_not_a_rejection() {
    let mut header = urf_header(1, 2, 1);
    header.colorspace = 200;
    let stream = urf::UrfStream {
        header,
        pages: vec![ipp_raster::PixelGrid::new(2, 1, 1, 8, vec![1, 2])],
    };
    let encoded = urf::encode(&stream);
    let (decoded, warnings) = urf::decode(encoded).unwrap();
    assert_eq!(decoded.pages.len(), 1);
    assert!(warnings.iter().any(|w| w.field == "colorspace"));
}
