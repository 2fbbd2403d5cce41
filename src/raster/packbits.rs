//!
//! PackBits-like run-length codec shared by the PWG and URF raster
//! containers.
//!
//! Each encoded line is a sequence of control bytes, each followed by a
//! run of pixel-group-sized data:
//!
//! - `0..=127`: repeat the next pixel group `n + 1` times.
//! - `-127..=-1` (as `u8`, `0x81..=0xFF`): copy the next `1 - n` pixel
//!   groups verbatim (a literal run).
//! - `-128` (`0x80`): fill the remainder of the line with `0xFF` bytes.
//!
//! A "pixel group" is `bytes_per_pixel` bytes — the PackBits run unit is
//! one full pixel, not one byte, so multi-byte color formats stay
//! aligned.
use bytes::{Buf, Bytes};

use crate::error::RasterError;

/// Encode one decompressed line into PackBits-like run codes.
///
/// `line` must be a whole number of `bytes_per_pixel`-sized pixel groups.
/// Always emits repeat-style runs (control byte `0..=127`, one pixel
/// group), collapsing a run of one identical pixel into a control byte
/// of `0`; never emits a literal run or a fill-to-end-of-line, since a
/// run of non-repeating pixels encodes correctly (if less compactly) as
/// a sequence of length-one repeats. `decode_line` still accepts all
/// three control byte forms, since data from other encoders may use them.
pub fn encode_line(line: &[u8], bytes_per_pixel: usize) -> Vec<u8> {
    assert!(bytes_per_pixel > 0);
    let mut out = Vec::new();
    let pixels: Vec<&[u8]> = line.chunks_exact(bytes_per_pixel).collect();
    let mut i = 0;
    while i < pixels.len() {
        let mut run_len = 1;
        while i + run_len < pixels.len() && pixels[i + run_len] == pixels[i] && run_len < 128 {
            run_len += 1;
        }
        out.push((run_len - 1) as u8);
        out.extend_from_slice(pixels[i]);
        i += run_len;
    }
    out
}

/// Decode one line from PackBits-like run codes, stopping once exactly
/// `bytes_per_line` bytes have been produced.
pub fn decode_line(data: &mut Bytes, bytes_per_line: usize, bytes_per_pixel: usize) -> Result<Vec<u8>, RasterError> {
    let mut out = Vec::with_capacity(bytes_per_line);

    while out.len() < bytes_per_line {
        if !data.has_remaining() {
            return Err(RasterError::TruncatedInput {
                needed: 1,
                available: 0,
            });
        }
        let control = data.get_u8() as i8;

        if control == -128_i8 {
            out.resize(bytes_per_line, 0xFF);
            break;
        } else if control >= 0 {
            let count = control as usize + 1;
            if data.remaining() < bytes_per_pixel {
                return Err(RasterError::TruncatedInput {
                    needed: bytes_per_pixel,
                    available: data.remaining(),
                });
            }
            let pixel = data.copy_to_bytes(bytes_per_pixel);
            for _ in 0..count {
                out.extend_from_slice(&pixel);
            }
        } else {
            let count = (1 - control as i32) as usize;
            let needed = count * bytes_per_pixel;
            if data.remaining() < needed {
                return Err(RasterError::TruncatedInput {
                    needed,
                    available: data.remaining(),
                });
            }
            out.extend_from_slice(&data.copy_to_bytes(needed));
        }
    }

    if out.len() != bytes_per_line {
        return Err(RasterError::BytesPerLineMismatch {
            line: 0,
            expected: bytes_per_line,
            actual: out.len(),
        });
    }

    Ok(out)
}

/// Decode a full page of `height` lines, each `width` pixel groups wide.
///
/// Each line is preceded by a one-byte line-repeat count `r`: the line,
/// once decoded, is emitted `r + 1` times before moving to the next
/// encoded line (spec §4.4 / testable property 3). Decoding stops once
/// `height` output rows have been produced, even if the final encoded
/// line's repeat count would have produced more.
pub fn decode_page(data: &mut Bytes, width: u32, height: u32, bytes_per_pixel: usize) -> Result<Vec<u8>, RasterError> {
    let bytes_per_line = width as usize * bytes_per_pixel;
    let total_rows = height as usize;
    let mut out = Vec::with_capacity(bytes_per_line * total_rows);
    let mut row = 0;

    while row < total_rows {
        if !data.has_remaining() {
            return Err(RasterError::TruncatedInput { needed: 1, available: 0 });
        }
        let line_repeat = data.get_u8();
        let line = decode_line(data, bytes_per_line, bytes_per_pixel).map_err(|e| match e {
            RasterError::BytesPerLineMismatch { expected, actual, .. } => {
                RasterError::BytesPerLineMismatch { line: row, expected, actual }
            }
            other => other,
        })?;

        for _ in 0..=line_repeat {
            if row >= total_rows {
                break;
            }
            out.extend_from_slice(&line);
            row += 1;
        }
    }

    Ok(out)
}

/// Encode a full page of `height` lines, each `width` pixel groups wide.
/// Collapses runs of byte-identical consecutive rows into one encoded
/// line with a line-repeat count, per spec §4.4's "recommended" collapse.
pub fn encode_page(pixels: &[u8], width: u32, height: u32, bytes_per_pixel: usize) -> Vec<u8> {
    let bytes_per_line = width as usize * bytes_per_pixel;
    let mut out = Vec::new();
    let mut row = 0usize;
    let total_rows = height as usize;

    while row < total_rows {
        let line = &pixels[row * bytes_per_line..(row + 1) * bytes_per_line];
        let mut repeat = 0u8;
        while row + repeat as usize + 1 < total_rows && repeat < 255 {
            let next = &pixels[(row + repeat as usize + 1) * bytes_per_line..(row + repeat as usize + 2) * bytes_per_line];
            if next != line {
                break;
            }
            repeat += 1;
        }
        out.push(repeat);
        out.extend(encode_line(line, bytes_per_pixel));
        row += repeat as usize + 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_pixel_round_trips() {
        let line = vec![0x11, 0x22, 0x11, 0x22, 0x11, 0x22];
        let encoded = encode_line(&line, 2);
        let mut buf = Bytes::from(encoded);
        let decoded = decode_line(&mut buf, line.len(), 2).unwrap();
        assert_eq!(decoded, line);
    }

    #[test]
    fn literal_run_round_trips() {
        let line = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let encoded = encode_line(&line, 1);
        let mut buf = Bytes::from(encoded);
        let decoded = decode_line(&mut buf, line.len(), 1).unwrap();
        assert_eq!(decoded, line);
    }

    #[test]
    fn fill_to_end_of_line() {
        let mut buf = Bytes::from(vec![0x80u8]);
        let decoded = decode_line(&mut buf, 10, 1).unwrap();
        assert_eq!(decoded, vec![0xFF; 10]);
    }

    #[test]
    fn truncated_run_errors() {
        // literal run of 2 pixels declared, 0 bytes follow
        let mut short = Bytes::from(vec![0x81u8]);
        assert!(matches!(decode_line(&mut short, 2, 1), Err(RasterError::TruncatedInput { .. })));
    }

    #[test]
    fn single_pixel_page_matches_scenario_s3() {
        // S3: one 1x1 RGB page, pixel (0x11, 0x22, 0x33).
        let pixels = vec![0x11, 0x22, 0x33];
        let body = encode_page(&pixels, 1, 1, 3);
        assert_eq!(body, vec![0x00, 0x00, 0x11, 0x22, 0x33]);
        let mut buf = Bytes::from(body);
        let decoded = decode_page(&mut buf, 1, 1, 3).unwrap();
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn line_repeat_matches_scenario_s4() {
        // S4: 4x3 RGB image, every row equal to [0xAA,0xAA,0xAA] x 4.
        let row = [0xAAu8; 3];
        let pixels: Vec<u8> = row.iter().cloned().cycle().take(4 * 3 * 3).collect();
        let body = encode_page(&pixels, 4, 3, 3);
        assert_eq!(body, vec![0x02, 0x03, 0xAA, 0xAA, 0xAA]);
        let mut buf = Bytes::from(body);
        let decoded = decode_page(&mut buf, 4, 3, 3).unwrap();
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn line_repeat_equivalence_with_expanded_rows() {
        // Testable property 3: a page encoded with line-repeat collapse
        // decodes identically to the same rows each encoded separately.
        let row = vec![1u8, 2, 3, 4];
        let pixels: Vec<u8> = row.iter().cloned().cycle().take(row.len() * 5).collect();

        let collapsed = encode_page(&pixels, 4, 5, 1);
        let mut expanded = Vec::new();
        for _ in 0..5 {
            expanded.push(0u8);
            expanded.extend(encode_line(&row, 1));
        }

        let mut collapsed_buf = Bytes::from(collapsed);
        let mut expanded_buf = Bytes::from(expanded);
        assert_eq!(decode_page(&mut collapsed_buf, 4, 5, 1).unwrap(), decode_page(&mut expanded_buf, 4, 5, 1).unwrap());
    }
}
