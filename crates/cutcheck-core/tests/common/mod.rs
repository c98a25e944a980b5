//! Fixtures built in memory.

#![allow(dead_code)]

use cutcheck_core::Config;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Default config with previews off.
pub fn config() -> Config {
    let mut config = Config::default();
    config.preview.enabled = false;
    config
}

pub fn png(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn gray_png(width: u32, height: u32, value: u8) -> Vec<u8> {
    png(&RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255])))
}

/// An uncompressed 8-bit document with `layers` plain layer records.
///
/// `mode` is the header color mode code; one plane per entry of `fill`.
pub fn psd(width: u32, height: u32, mode: u16, fill: &[u8], layers: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"8BPS");
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&[0; 6]);
    out.extend_from_slice(&(fill.len() as u16).to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&8u16.to_be_bytes());
    out.extend_from_slice(&mode.to_be_bytes());
    // color mode data, image resources
    out.extend_from_slice(&[0; 8]);

    if layers == 0 {
        out.extend_from_slice(&0u32.to_be_bytes());
    } else {
        let mut info = Vec::new();
        info.extend_from_slice(&(layers as i16).to_be_bytes());
        for i in 0..layers {
            info.extend(layer_record(&format!("Layer {i}")));
        }
        if info.len() % 2 == 1 {
            info.push(0);
        }
        let mut body = Vec::new();
        body.extend_from_slice(&(info.len() as u32).to_be_bytes());
        body.extend(info);
        body.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend(body);
    }

    out.extend_from_slice(&0u16.to_be_bytes());
    let plane = (width * height) as usize;
    for &v in fill {
        out.extend(std::iter::repeat(v).take(plane));
    }
    out
}

fn layer_record(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&[0; 16]);
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(b"8BIMnorm");
    out.extend_from_slice(&[255, 0, 0, 0]);

    let mut extra = Vec::new();
    extra.extend_from_slice(&[0; 8]);
    extra.push(name.len() as u8);
    extra.extend_from_slice(name.as_bytes());
    while (extra.len() - 8) % 4 != 0 {
        extra.push(0);
    }
    out.extend_from_slice(&(extra.len() as u32).to_be_bytes());
    out.extend(extra);
    out
}
