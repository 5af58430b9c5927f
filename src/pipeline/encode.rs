//! Image encoding: processed `DynamicImage` → JPEG bytes for the PDF.
//!
//! Every image is flattened to RGB8 before encoding, so the embedded JPEG is
//! always 3-channel regardless of what the decoder produced.

use crate::error::Jpg2PdfError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use tracing::debug;

/// Encode a processed image as a baseline JPEG at `quality` (1–100).
///
/// `index` is only used to label errors.
pub fn encode_jpeg(img: &DynamicImage, quality: u8, index: usize) -> Result<Vec<u8>, Jpg2PdfError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| Jpg2PdfError::EncodeFailed {
            index,
            detail: e.to_string(),
        })?;

    debug!("Encoded image {} → {} bytes JPEG (q={})", index, buf.len(), quality);
    Ok(buf)
}
