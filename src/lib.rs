//! # jpg2pdf
//!
//! Combine a batch of JPEG images into a single PDF, one page per image,
//! optionally converting everything to grayscale first.
//!
//! ## Pipeline Overview
//!
//! ```text
//! JPEGs
//!  │
//!  ├─ 1. Input     read local files or download URLs, check JPEG magic
//!  ├─ 2. Decode    JPEG → pixels (image crate, spawn_blocking)
//!  ├─ 3. Color     keep colors, or collapse to 3-channel grayscale
//!  ├─ 4. Encode    pixels → RGB JPEG at the configured quality
//!  └─ 5. Assemble  one DCTDecode page per image (lopdf), sized to A4/Letter/Legal/A3
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jpg2pdf::{convert_to_file, ConversionConfig, PageSize, ProcessingMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .mode(ProcessingMode::Grayscale)
//!         .page_size(PageSize::Letter)
//!         .dpi(200)
//!         .build()?;
//!     let stats = convert_to_file(&["scan-1.jpg", "scan-2.jpg"], "scans.pdf", &config).await?;
//!     eprintln!("{} pages, {} bytes", stats.page_count, stats.pdf_bytes);
//!     Ok(())
//! }
//! ```
//!
//! For an interactive front end that keeps uploads and previews between user
//! actions, use [`Session`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `jpg2pdf` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, FitMode, PageSize, ProcessingMode};
pub use convert::{convert, convert_files, convert_sync, convert_to_file, inspect, ProcessedImage};
pub use error::Jpg2PdfError;
pub use format::{aspect_ratio, default_output_filename, format_file_size, output_filename};
pub use output::{ConversionOutput, ConversionStats, ImageInfo};
pub use pipeline::assemble::{assemble_pdf, pdf_page_count, LayoutOptions};
pub use pipeline::color::normalize;
pub use pipeline::input::UploadedFile;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::Session;
