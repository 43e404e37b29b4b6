//! RGB565 frame decoding.

use image::RgbaImage;

/// Decode a big-endian RGB565 byte stream into an RGBA bitmap.
///
/// Each 16-bit sample packs 5 bits red, 6 bits green, 5 bits blue. Every
/// channel is expanded by left-shifting into the high bits of its byte
/// (no interpolation of the low bits), alpha fixed at opaque. A stream
/// shorter than `width * height * 2` bytes yields `None`; trailing
/// surplus bytes are ignored.
pub fn decode(data: &[u8], width: u32, height: u32) -> Option<RgbaImage> {
    let pixels = width as usize * height as usize;
    if data.len() < pixels * 2 {
        return None;
    }

    let mut out = Vec::with_capacity(pixels * 4);
    for sample in data.chunks_exact(2).take(pixels) {
        let value = u16::from_be_bytes([sample[0], sample[1]]);
        out.push((((value >> 11) & 0x1F) << 3) as u8);
        out.push((((value >> 5) & 0x3F) << 2) as u8);
        out.push(((value & 0x1F) << 3) as u8);
        out.push(255);
    }

    RgbaImage::from_raw(width, height, out)
}
