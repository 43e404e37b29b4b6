//! Imaging support: on-device frame decoding and the upload crop
//! pipeline.

pub mod color;
pub mod cropper;
pub mod rgb565;

pub use color::predominant_color;
pub use cropper::{
    encode_jpeg, prepare_canvas, Cropper, JPEG_QUALITY, MAX_SCALE, MAX_SOURCE_EDGE, OUTPUT_SIZE,
    WHEEL_STEP,
};
pub use rgb565::decode;
