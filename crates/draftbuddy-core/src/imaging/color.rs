//! Predominant-color estimation for the upload canvas backfill.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

/// Sample every 4th pixel; exact counts do not need a full pass.
const SAMPLE_STRIDE: usize = 4;

/// Bucket width of the quantized fallback histogram.
const GROUP_SIZE: u8 = 8;

/// Estimate the predominant color of an image.
///
/// Samples on a fixed stride, skipping mostly-transparent pixels
/// (alpha < 128) and near-white pixels (all channels > 240), and returns
/// the most frequent exact color. When every sample is excluded, falls
/// back to a quantized histogram over the same stride with no
/// exclusions. An empty image yields white. The result is always opaque.
pub fn predominant_color(image: &RgbaImage) -> Rgba<u8> {
    let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
    let mut best = [255u8, 255, 255];
    let mut best_count = 0u32;

    for pixel in image.pixels().step_by(SAMPLE_STRIDE) {
        let [r, g, b, a] = pixel.0;
        if a < 128 || (r > 240 && g > 240 && b > 240) {
            continue;
        }

        let count = counts.entry([r, g, b]).or_insert(0);
        *count += 1;
        // Strict comparison keeps the earliest color on ties
        if *count > best_count {
            best_count = *count;
            best = [r, g, b];
        }
    }

    if best_count == 0 {
        return predominant_color_grouped(image);
    }

    Rgba([best[0], best[1], best[2], 255])
}

/// Fallback histogram over `GROUP_SIZE`-wide channel buckets, counting
/// every sampled pixel regardless of alpha or brightness.
fn predominant_color_grouped(image: &RgbaImage) -> Rgba<u8> {
    let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
    let mut best = [255u8, 255, 255];
    let mut best_count = 0u32;

    for pixel in image.pixels().step_by(SAMPLE_STRIDE) {
        let [r, g, b, _] = pixel.0;
        let key = [
            (r / GROUP_SIZE) * GROUP_SIZE,
            (g / GROUP_SIZE) * GROUP_SIZE,
            (b / GROUP_SIZE) * GROUP_SIZE,
        ];

        let count = counts.entry(key).or_insert(0);
        *count += 1;
        if *count > best_count {
            best_count = *count;
            best = key;
        }
    }

    Rgba([best[0], best[1], best[2], 255])
}
