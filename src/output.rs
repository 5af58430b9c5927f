//! Result types returned by the conversion entry points.

use crate::config::{PageSize, ProcessingMode};
use crate::format::{aspect_ratio, format_file_size};
use serde::{Deserialize, Serialize};

/// Preview facts about one input image, as shown next to its thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// 0-based position in the batch.
    pub index: usize,
    /// Original file name (or URL tail for downloads).
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Reduced ratio such as `"16:9"`.
    pub aspect_ratio: String,
    /// Size of the uploaded file in bytes.
    pub size_bytes: u64,
    /// `size_bytes` formatted for display.
    pub size: String,
    pub mode: ProcessingMode,
}

impl ImageInfo {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        (width, height): (u32, u32),
        size_bytes: u64,
        mode: ProcessingMode,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            width,
            height,
            aspect_ratio: aspect_ratio(width, height),
            size_bytes,
            size: format_file_size(size_bytes),
            mode,
        }
    }
}

/// Aggregate numbers for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    pub image_count: usize,
    pub page_count: usize,
    pub pdf_bytes: usize,
    pub mode: ProcessingMode,
    pub page_size: PageSize,
    pub dpi: u32,
    /// Wall-clock time for the whole run, including input resolution.
    pub total_duration_ms: u64,
    /// Decode + normalize + re-encode time.
    pub process_duration_ms: u64,
    /// PDF assembly time.
    pub assemble_duration_ms: u64,
}

/// The finished PDF plus per-image metadata and run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The PDF document. Skipped in JSON output.
    #[serde(skip)]
    pub pdf: Vec<u8>,
    pub images: Vec<ImageInfo>,
    pub stats: ConversionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_info_derives_display_fields() {
        let info = ImageInfo::new(0, "holiday.jpg", (1920, 1080), 2048, ProcessingMode::Color);
        assert_eq!(info.aspect_ratio, "16:9");
        assert_eq!(info.size, "2.0 KB");
        assert_eq!(info.name, "holiday.jpg");
    }

    #[test]
    fn pdf_bytes_are_not_serialised() {
        let out = ConversionOutput {
            pdf: vec![b'%'; 16],
            images: vec![],
            stats: ConversionStats {
                image_count: 0,
                page_count: 0,
                pdf_bytes: 16,
                mode: ProcessingMode::Grayscale,
                page_size: PageSize::A3,
                dpi: 72,
                total_duration_ms: 1,
                process_duration_ms: 0,
                assemble_duration_ms: 0,
            },
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("\"pdf\""), "got: {json}");
        assert!(json.contains("\"grayscale\""));
        assert!(json.contains("\"a3\""));
    }
}
