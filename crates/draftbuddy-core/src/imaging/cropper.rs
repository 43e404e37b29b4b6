//! Crop state and background compositing for the upload pipeline.
//!
//! Uploads go through two stages. [`prepare_canvas`] composites the
//! source picture onto an oversized square canvas filled with its
//! predominant color, so zooming all the way out never exposes blank
//! margin. [`Cropper`] then tracks a pan/zoom view over that canvas and
//! renders the visible region into the square frame export.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, ExtendedColorType, RgbaImage};

use crate::error::Result;
use crate::imaging::color::predominant_color;

/// Upper bound on the uniform zoom factor.
pub const MAX_SCALE: f64 = 1.25;

/// Square export edge the frame expects.
pub const OUTPUT_SIZE: u32 = 480;

/// Sources larger than this on either edge are downscaled first.
pub const MAX_SOURCE_EDGE: u32 = 1500;

/// Zoom delta of one wheel detent.
pub const WHEEL_STEP: f64 = 0.1;

/// JPEG quality of the exported frame.
pub const JPEG_QUALITY: u8 = 85;

/// Composite a source picture onto its editing canvas.
///
/// Oversized sources are downscaled so the longest edge is
/// [`MAX_SOURCE_EDGE`]. The result sits centered on a square canvas
/// twice its longest side, filled with the picture's predominant color.
pub fn prepare_canvas(source: &RgbaImage) -> RgbaImage {
    let (mut width, mut height) = source.dimensions();

    let scaled;
    let source = if width > MAX_SOURCE_EDGE || height > MAX_SOURCE_EDGE {
        let factor = (width as f64 / MAX_SOURCE_EDGE as f64)
            .max(height as f64 / MAX_SOURCE_EDGE as f64);
        width = (width as f64 / factor).round() as u32;
        height = (height as f64 / factor).round() as u32;
        scaled = imageops::resize(source, width, height, imageops::FilterType::Triangle);
        &scaled
    } else {
        source
    };

    let fill = predominant_color(source);
    let side = width.max(height) * 2;

    let mut canvas = RgbaImage::from_pixel(side, side, fill);
    let offset_x = (side - width) / 2;
    let offset_y = (side - height) / 2;
    imageops::overlay(&mut canvas, source, i64::from(offset_x), i64::from(offset_y));
    canvas
}

/// JPEG-encode an export frame at the device's expected quality.
pub fn encode_jpeg(image: &RgbaImage) -> Result<Vec<u8>> {
    // JPEG carries no alpha channel
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode(
        rgb.as_raw(),
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

/// Pan/zoom state over a fixed viewport.
///
/// `x`/`y` are the translation of the scaled image in viewport pixels,
/// so `(0, 0)` pins the image's top-left corner to the viewport's. The
/// zoom range runs from the fit scale up to [`MAX_SCALE`].
#[derive(Debug, Clone)]
pub struct Cropper {
    image: RgbaImage,
    viewport_w: f64,
    viewport_h: f64,
    scale: f64,
    min_scale: f64,
    max_scale: f64,
    x: f64,
    y: f64,
}

impl Cropper {
    /// Create a cropper over `image`, fitted inside the viewport and
    /// centered.
    pub fn new(image: RgbaImage, viewport_w: u32, viewport_h: u32) -> Self {
        let viewport_w = f64::from(viewport_w);
        let viewport_h = f64::from(viewport_h);
        let (w, h) = image.dimensions();

        let fit = (viewport_w / f64::from(w)).min(viewport_h / f64::from(h));

        // Centering is not clamped; only pans and zooms constrain
        Self {
            x: (viewport_w - f64::from(w) * fit) / 2.0,
            y: (viewport_h - f64::from(h) * fit) / 2.0,
            image,
            viewport_w,
            viewport_h,
            scale: fit,
            min_scale: fit,
            max_scale: MAX_SCALE,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// Current translation of the scaled image, in viewport pixels.
    pub fn offset(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Slider position as a fraction of the zoom range.
    pub fn zoom_fraction(&self) -> f64 {
        let range = self.max_scale - self.min_scale;
        if range.abs() < f64::EPSILON {
            return 0.0;
        }
        ((self.scale - self.min_scale) / range).min(1.0).max(0.0)
    }

    /// Pan by a viewport-pixel delta, clamped to the image bounds.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.constrain(self.x + dx, self.y + dy);
        self.x = x;
        self.y = y;
    }

    /// Zoom by a signed wheel delta, keeping the viewport center fixed.
    pub fn zoom_by(&mut self, delta: f64) {
        self.rescale(self.scale + delta);
    }

    /// Set zoom from a slider fraction in `[0, 1]`, keeping the viewport
    /// center fixed.
    pub fn set_zoom_fraction(&mut self, fraction: f64) {
        let fraction = fraction.min(1.0).max(0.0);
        self.rescale(self.min_scale + fraction * (self.max_scale - self.min_scale));
    }

    /// Render the viewport-visible region into the square export frame.
    pub fn crop(&self) -> RgbaImage {
        let src_x = -self.x / self.scale;
        let src_y = -self.y / self.scale;
        let src_size = self.viewport_w / self.scale;

        let (w, h) = self.image.dimensions();
        let x0 = (src_x.max(0.0) as u32).min(w.saturating_sub(1));
        let y0 = (src_y.max(0.0) as u32).min(h.saturating_sub(1));
        let crop_w = (src_size.round() as u32).min(w - x0).max(1);
        let crop_h = (src_size.round() as u32).min(h - y0).max(1);

        let region = imageops::crop_imm(&self.image, x0, y0, crop_w, crop_h).to_image();
        imageops::resize(&region, OUTPUT_SIZE, OUTPUT_SIZE, imageops::FilterType::Triangle)
    }

    fn rescale(&mut self, target: f64) {
        // Lower bound wins, matching the wheel handler's clamp order
        let clamped = target.min(self.max_scale).max(self.min_scale);
        if clamped == self.scale {
            return;
        }

        let change = clamped / self.scale;
        self.scale = clamped;

        // Keep the source point under the viewport center apparently
        // stationary across the scale change
        let center_x = self.viewport_w / 2.0;
        let center_y = self.viewport_h / 2.0;
        let (x, y) = self.constrain(
            center_x - (center_x - self.x) * change,
            center_y - (center_y - self.y) * change,
        );
        self.x = x;
        self.y = y;
    }

    /// Clamp a translation so the scaled image never slides out of the
    /// viewport. When the scaled image is smaller than the viewport on
    /// an axis, the lower bound wins and pins it to that edge.
    fn constrain(&self, x: f64, y: f64) -> (f64, f64) {
        let (w, h) = self.image.dimensions();
        let min_x = self.viewport_w - f64::from(w) * self.scale;
        let min_y = self.viewport_h - f64::from(h) * self.scale;

        (x.min(0.0).max(min_x), y.min(0.0).max(min_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_wide_image_fits_and_centers() {
        let cropper = Cropper::new(RgbaImage::new(960, 480), 480, 480);

        assert!((cropper.scale() - 0.5).abs() < EPS);
        assert!((cropper.min_scale() - 0.5).abs() < EPS);

        // 960 * 0.5 fills the width; 480 * 0.5 leaves 240 split evenly
        let (x, y) = cropper.offset();
        assert!(x.abs() < EPS);
        assert!((y - 120.0).abs() < EPS);
    }

    #[test]
    fn test_square_image_fits_exactly() {
        let cropper = Cropper::new(RgbaImage::new(1000, 1000), 480, 480);

        assert!((cropper.scale() - 0.48).abs() < EPS);
        let (x, y) = cropper.offset();
        assert!(x.abs() < EPS);
        assert!(y.abs() < EPS);
    }

    #[test]
    fn test_pan_clamped_at_fit_scale() {
        let mut cropper = Cropper::new(RgbaImage::new(1000, 1000), 480, 480);

        // At fit scale the square image covers the viewport exactly, so
        // every pan lands back at the origin
        cropper.pan(50.0, -30.0);
        let (x, y) = cropper.offset();
        assert!(x.abs() < EPS);
        assert!(y.abs() < EPS);
    }

    #[test]
    fn test_pan_clamped_when_zoomed() {
        let mut cropper = Cropper::new(RgbaImage::new(1000, 1000), 480, 480);
        cropper.set_zoom_fraction(1.0);

        cropper.pan(-1e6, -1e6);
        let (x, y) = cropper.offset();
        let min = 480.0 - 1000.0 * 1.25;
        assert!((x - min).abs() < EPS);
        assert!((y - min).abs() < EPS);

        cropper.pan(1e6, 1e6);
        let (x, y) = cropper.offset();
        assert!(x.abs() < EPS);
        assert!(y.abs() < EPS);
    }

    #[test]
    fn test_zoom_keeps_viewport_center_fixed() {
        let mut cropper = Cropper::new(RgbaImage::new(1000, 1000), 480, 480);

        // Source point under the viewport center: (240 - x) / scale
        let before = (240.0 - cropper.offset().0) / cropper.scale();
        cropper.zoom_by(WHEEL_STEP);
        let after = (240.0 - cropper.offset().0) / cropper.scale();

        assert!((cropper.scale() - 0.58).abs() < EPS);
        assert!((before - after).abs() < 1e-6);
        assert!((before - 500.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let mut cropper = Cropper::new(RgbaImage::new(1000, 1000), 480, 480);

        cropper.zoom_by(10.0);
        assert!((cropper.scale() - MAX_SCALE).abs() < EPS);
        assert!((cropper.zoom_fraction() - 1.0).abs() < EPS);

        cropper.zoom_by(-10.0);
        assert!((cropper.scale() - cropper.min_scale()).abs() < EPS);
        assert!(cropper.zoom_fraction().abs() < EPS);
    }

    #[test]
    fn test_zoom_fraction_round_trips() {
        let mut cropper = Cropper::new(RgbaImage::new(1000, 1000), 480, 480);

        cropper.set_zoom_fraction(0.5);
        let mid = cropper.min_scale() + 0.5 * (MAX_SCALE - cropper.min_scale());
        assert!((cropper.scale() - mid).abs() < EPS);
        assert!((cropper.zoom_fraction() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_crop_exports_visible_region() {
        // Left half red, right half blue, viewed at fit scale
        let image = RgbaImage::from_fn(960, 960, |x, _| {
            if x < 480 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let cropper = Cropper::new(image, 480, 480);

        let out = cropper.crop();
        assert_eq!(out.dimensions(), (OUTPUT_SIZE, OUTPUT_SIZE));

        let left = out.get_pixel(100, 240).0;
        assert!(left[0] > 200 && left[2] < 50);
        let right = out.get_pixel(380, 240).0;
        assert!(right[2] > 200 && right[0] < 50);
    }

    #[test]
    fn test_crop_follows_pan() {
        let image = RgbaImage::from_fn(960, 960, |x, _| {
            if x < 480 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let mut cropper = Cropper::new(image, 480, 480);

        // Zoom to 1:1, then slide the view fully onto the blue half
        cropper.set_zoom_fraction(2.0 / 3.0);
        assert!((cropper.scale() - 1.0).abs() < EPS);
        cropper.pan(-1e6, 0.0);

        let out = cropper.crop();
        let pixel = out.get_pixel(10, 240).0;
        assert!(pixel[2] > 200 && pixel[0] < 50);
    }

    #[test]
    fn test_prepare_canvas_doubles_longest_side() {
        let source = RgbaImage::from_pixel(100, 50, Rgba([0, 0, 200, 255]));
        let canvas = prepare_canvas(&source);

        assert_eq!(canvas.dimensions(), (200, 200));
        // Fill and picture agree here, so the whole canvas is blue
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 200, 255]);
        assert_eq!(canvas.get_pixel(100, 100).0, [0, 0, 200, 255]);
    }

    #[test]
    fn test_prepare_canvas_fills_with_predominant_color() {
        let source = RgbaImage::from_fn(8, 8, |x, y| {
            if x == 0 || y == 0 || x == 7 || y == 7 {
                Rgba([250, 250, 250, 255])
            } else {
                Rgba([180, 10, 10, 255])
            }
        });
        let canvas = prepare_canvas(&source);

        assert_eq!(canvas.dimensions(), (16, 16));
        // Corners are canvas fill, not source
        assert_eq!(canvas.get_pixel(0, 0).0, [180, 10, 10, 255]);
        assert_eq!(canvas.get_pixel(15, 15).0, [180, 10, 10, 255]);
        // The source ring survives in the centered overlay
        assert_eq!(canvas.get_pixel(4, 4).0, [250, 250, 250, 255]);
    }

    #[test]
    fn test_prepare_canvas_downscales_oversized_sources() {
        let source = RgbaImage::from_pixel(1600, 800, Rgba([0, 200, 0, 255]));
        let canvas = prepare_canvas(&source);

        // 1600x800 scales by 1500/1600 to 1500x750, then doubles
        assert_eq!(canvas.dimensions(), (3000, 3000));
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg_magic() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([120, 30, 200, 255]));
        let jpeg = encode_jpeg(&image).unwrap();

        assert!(jpeg.len() > 4);
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
