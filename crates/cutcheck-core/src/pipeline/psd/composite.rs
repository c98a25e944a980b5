//! Merged image data: decompression and conversion to an RGBA raster.
//!
//! The merged (flattened) image is stored planar, one channel after another,
//! either raw or PackBits-compressed per row.

use image::RgbaImage;

use crate::error::PsdError;
use crate::pipeline::cancel::CancelToken;
use crate::types::ColorMode;

use super::cursor::Cursor;
use super::PsdHeader;

const RAW: u16 = 0;
const RLE: u16 = 1;

/// Decode the merged image into RGBA8.
///
/// `palette` is the color-mode data section (768 bytes for indexed documents).
pub(crate) fn read_composite(
    mut cur: Cursor<'_>,
    header: &PsdHeader,
    palette: &[u8],
    cancel: &CancelToken,
) -> Result<RgbaImage, PsdError> {
    let planes_needed = planes_for(header)?;
    let compression = cur.u16()?;
    let rows = header.height as usize;
    let row_bytes = (header.width as usize * header.depth as usize).div_ceil(8);

    let planes = match compression {
        RAW => read_raw(&mut cur, rows, row_bytes, planes_needed, cancel)?,
        RLE => read_rle(&mut cur, header, rows, row_bytes, planes_needed, cancel)?,
        other => return Err(PsdError::UnsupportedCompression(other)),
    };

    let samples: Vec<Vec<u8>> = planes
        .iter()
        .map(|plane| to_samples(plane, header, row_bytes))
        .collect::<Result<_, _>>()?;

    Ok(assemble(header, &samples, palette))
}

/// Peak bytes held while decoding: raw planes, 8-bit samples, and the RGBA
/// output are all alive at once.
pub(crate) fn buffer_bytes(header: &PsdHeader) -> Result<u64, PsdError> {
    let planes = planes_for(header)? as u64;
    let rows = u64::from(header.height);
    let pixels = u64::from(header.width) * rows;
    let row_bytes = (u64::from(header.width) * u64::from(header.depth)).div_ceil(8);
    Ok(planes * rows * row_bytes + planes * pixels + pixels * 4)
}

/// Number of planes the conversion reads (color planes plus optional alpha).
fn planes_for(header: &PsdHeader) -> Result<usize, PsdError> {
    let channels = header.channels as usize;
    let color = match header.color_mode {
        ColorMode::Rgb | ColorMode::Lab => 3,
        ColorMode::Cmyk => 4,
        _ => 1,
    };
    if channels < color {
        return Err(PsdError::InvalidChannelCount {
            channels: header.channels,
            mode: header.mode_code,
        });
    }
    let with_alpha = match header.color_mode {
        ColorMode::Multichannel | ColorMode::Indexed | ColorMode::Bitmap => color,
        _ => (color + 1).min(channels),
    };
    Ok(with_alpha)
}

fn read_raw(
    cur: &mut Cursor<'_>,
    rows: usize,
    row_bytes: usize,
    planes: usize,
    cancel: &CancelToken,
) -> Result<Vec<Vec<u8>>, PsdError> {
    let mut out = Vec::with_capacity(planes);
    for _ in 0..planes {
        let mut plane = Vec::with_capacity(rows * row_bytes);
        for _ in 0..rows {
            if cancel.is_cancelled() {
                return Err(PsdError::Cancelled);
            }
            plane.extend_from_slice(cur.bytes(row_bytes)?);
        }
        out.push(plane);
    }
    Ok(out)
}

fn read_rle(
    cur: &mut Cursor<'_>,
    header: &PsdHeader,
    rows: usize,
    row_bytes: usize,
    planes: usize,
    cancel: &CancelToken,
) -> Result<Vec<Vec<u8>>, PsdError> {
    // Byte counts for every row of every channel precede the data.
    let total_rows = header.channels as usize * rows;
    let mut counts = Vec::with_capacity(total_rows);
    for _ in 0..total_rows {
        counts.push(cur.u16()? as usize);
    }

    let mut out = Vec::with_capacity(planes);
    for plane_index in 0..planes {
        let mut plane = Vec::with_capacity(rows * row_bytes);
        for row in 0..rows {
            if cancel.is_cancelled() {
                return Err(PsdError::Cancelled);
            }
            let packed = cur.bytes(counts[plane_index * rows + row])?;
            unpack_bits(packed, row_bytes, &mut plane)?;
        }
        out.push(plane);
    }
    Ok(out)
}

/// PackBits: a header byte `n` in 0..=127 copies the next n+1 literal bytes,
/// -127..=-1 repeats the next byte 1-n times, and -128 is a no-op.
pub(crate) fn unpack_bits(packed: &[u8], expected: usize, out: &mut Vec<u8>) -> Result<(), PsdError> {
    let start = out.len();
    let mut i = 0;
    while i < packed.len() && out.len() - start < expected {
        let n = packed[i] as i8;
        i += 1;
        if n >= 0 {
            let len = n as usize + 1;
            let literal = packed.get(i..i + len).ok_or(PsdError::BadRunLength)?;
            out.extend_from_slice(literal);
            i += len;
        } else if n != -128 {
            let value = *packed.get(i).ok_or(PsdError::BadRunLength)?;
            let len = (1 - n as isize) as usize;
            out.extend(std::iter::repeat(value).take(len));
            i += 1;
        }
    }
    if out.len() - start != expected {
        return Err(PsdError::BadRunLength);
    }
    Ok(())
}

/// Reduce a plane to one 8-bit sample per pixel.
fn to_samples(plane: &[u8], header: &PsdHeader, row_bytes: usize) -> Result<Vec<u8>, PsdError> {
    let width = header.width as usize;
    match header.depth {
        8 => Ok(plane.to_vec()),
        // big-endian: keep the high byte
        16 => Ok(plane.chunks_exact(2).map(|pair| pair[0]).collect()),
        1 => {
            let mut out = Vec::with_capacity(width * header.height as usize);
            for row in plane.chunks_exact(row_bytes) {
                for x in 0..width {
                    let bit = row[x / 8] & (0x80 >> (x % 8));
                    // set bit is black ink
                    out.push(if bit != 0 { 0 } else { 255 });
                }
            }
            Ok(out)
        }
        other => Err(PsdError::UnsupportedDepth(other)),
    }
}

fn assemble(header: &PsdHeader, planes: &[Vec<u8>], palette: &[u8]) -> RgbaImage {
    let pixel_count = header.width as usize * header.height as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    let alpha_plane = |color_planes: usize| planes.get(color_planes);

    match header.color_mode {
        ColorMode::Rgb => {
            let alpha = alpha_plane(3);
            for i in 0..pixel_count {
                rgba.extend_from_slice(&[
                    planes[0][i],
                    planes[1][i],
                    planes[2][i],
                    alpha.map_or(255, |a| a[i]),
                ]);
            }
        }
        ColorMode::Cmyk => {
            let alpha = alpha_plane(4);
            for i in 0..pixel_count {
                let (r, g, b) = cmyk_to_rgb(planes[0][i], planes[1][i], planes[2][i], planes[3][i]);
                rgba.extend_from_slice(&[r, g, b, alpha.map_or(255, |a| a[i])]);
            }
        }
        ColorMode::Lab => {
            let alpha = alpha_plane(3);
            for i in 0..pixel_count {
                let (r, g, b) = lab_to_rgb(planes[0][i], planes[1][i], planes[2][i]);
                rgba.extend_from_slice(&[r, g, b, alpha.map_or(255, |a| a[i])]);
            }
        }
        ColorMode::Indexed if palette.len() >= 768 => {
            for &index in &planes[0][..pixel_count] {
                let index = index as usize;
                rgba.extend_from_slice(&[
                    palette[index],
                    palette[256 + index],
                    palette[512 + index],
                    255,
                ]);
            }
        }
        _ => {
            let alpha = alpha_plane(1);
            for i in 0..pixel_count {
                let v = planes[0][i];
                rgba.extend_from_slice(&[v, v, v, alpha.map_or(255, |a| a[i])]);
            }
        }
    }

    // Buffer length is exactly width * height * 4.
    RgbaImage::from_raw(header.width, header.height, rgba)
        .unwrap_or_else(|| RgbaImage::new(header.width, header.height))
}

/// CMYK planes are stored inverted (255 = no ink).
fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> (u8, u8, u8) {
    let channel = |ink: u8| ((ink as u16 * k as u16 + 127) / 255) as u8;
    (channel(c), channel(m), channel(y))
}

/// CIE L*a*b* (D65) to sRGB.
fn lab_to_rgb(l: u8, a: u8, b: u8) -> (u8, u8, u8) {
    let l = l as f64 * 100.0 / 255.0;
    let a = a as f64 - 128.0;
    let b = b as f64 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    let finv = |t: f64| {
        let cube = t * t * t;
        if cube > 0.008856 {
            cube
        } else {
            (t - 16.0 / 116.0) / 7.787
        }
    };
    let x = 0.95047 * finv(fx);
    let y = finv(fy);
    let z = 1.08883 * finv(fz);

    let gamma = |c: f64| {
        let c = if c > 0.0031308 {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        } else {
            12.92 * c
        };
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    (
        gamma(3.2406 * x - 1.5372 * y - 0.4986 * z),
        gamma(-0.9689 * x + 1.8758 * y + 0.0415 * z),
        gamma(0.0557 * x - 0.2040 * y + 1.0570 * z),
    )
}
