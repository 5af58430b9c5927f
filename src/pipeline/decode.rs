//! JPEG decoding: `UploadedFile` → `DynamicImage`.

use crate::error::Jpg2PdfError;
use crate::pipeline::input::UploadedFile;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

/// Decode an uploaded JPEG into pixels.
pub fn decode_image(file: &UploadedFile) -> Result<DynamicImage, Jpg2PdfError> {
    let img = image::load_from_memory_with_format(&file.bytes, ImageFormat::Jpeg).map_err(|e| {
        Jpg2PdfError::DecodeFailed {
            name: file.name.clone(),
            detail: e.to_string(),
        }
    })?;
    debug!(
        "Decoded {} → {}x{} {:?}",
        file.name,
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_jpeg;
    use image::{Rgb, RgbImage};

    #[test]
    fn decodes_what_the_encoder_wrote() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 16, Rgb([10, 200, 30])));
        let bytes = encode_jpeg(&img, 90, 0).unwrap();
        let file = UploadedFile::new("pixel.jpg", bytes).unwrap();
        let decoded = decode_image(&file).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn truncated_jpeg_fails_to_decode() {
        let file = UploadedFile {
            name: "broken.jpg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00],
        };
        let err = decode_image(&file).unwrap_err();
        match err {
            Jpg2PdfError::DecodeFailed { name, .. } => assert_eq!(name, "broken.jpg"),
            other => panic!("expected DecodeFailed, got {other:?}"),
        }
    }
}
