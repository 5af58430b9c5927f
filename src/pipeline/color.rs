//! Color-mode normalization.
//!
//! Grayscale output is collapsed to luminance and then re-expanded to three
//! identical channels. Keeping every processed image RGB means the encoder
//! and the PDF assembler only ever see one channel layout.

use crate::config::ProcessingMode;
use image::DynamicImage;

/// Apply `mode` to a decoded image.
///
/// `Color` returns the image untouched.
pub fn normalize(img: DynamicImage, mode: ProcessingMode) -> DynamicImage {
    match mode {
        ProcessingMode::Color => img,
        ProcessingMode::Grayscale => {
            let luma = DynamicImage::ImageLuma8(img.to_luma8());
            DynamicImage::ImageRgb8(luma.to_rgb8())
        }
    }
}
