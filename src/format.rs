//! Display helpers for image previews and output naming.

use chrono::{DateTime, Local, TimeZone};

const SIZE_UNITS: [&str; 3] = ["B", "KB", "MB"];

/// Human-readable byte count with one decimal, 1024-based.
///
/// Walks B → KB → MB and falls through to GB for anything larger.
///
/// ```
/// assert_eq!(jpg2pdf::format_file_size(2048), "2.0 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in SIZE_UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} GB")
}

/// Aspect ratio reduced to lowest terms, e.g. `1920×1080 → "16:9"`.
pub fn aspect_ratio(width: u32, height: u32) -> String {
    let r = gcd(width, height);
    if r == 0 {
        return "0:0".to_string();
    }
    format!("{}:{}", width / r, height / r)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Download name for a generated PDF: `converted_images_YYYYMMDD-HHMMSS.pdf`.
pub fn output_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("converted_images_{}.pdf", at.format("%Y%m%d-%H%M%S"))
}

/// [`output_filename`] stamped with the current local time.
pub fn default_output_filename() -> String {
    output_filename(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(500), "500.0 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(3_145_728), "3.0 MB");
        assert_eq!(format_file_size(0), "0.0 B");
        assert_eq!(format_file_size(1023), "1023.0 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn aspect_ratios() {
        assert_eq!(aspect_ratio(1920, 1080), "16:9");
        assert_eq!(aspect_ratio(100, 100), "1:1");
        assert_eq!(aspect_ratio(1024, 768), "4:3");
        assert_eq!(aspect_ratio(3, 7), "3:7");
        assert_eq!(aspect_ratio(0, 0), "0:0");
        assert_eq!(aspect_ratio(5, 0), "1:0");
    }

    #[test]
    fn filename_uses_compact_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(output_filename(&at), "converted_images_20240309-070501.pdf");
    }

    #[test]
    fn default_filename_shape() {
        let name = default_output_filename();
        assert!(name.starts_with("converted_images_"));
        assert!(name.ends_with(".pdf"));
        // converted_images_ + 15-char stamp + .pdf
        assert_eq!(name.len(), "converted_images_".len() + 15 + 4);
    }
}
