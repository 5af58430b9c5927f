//! Error types for the jpg2pdf library.
//!
//! Every failure is fatal for the batch: a PDF is either produced for all
//! images or not at all. [`Jpg2PdfError`] is returned from the top-level
//! `convert*` functions and from [`crate::session::Session::create_pdf`].
//!
//! Two variants correspond to the user-facing outcomes of the original
//! upload-and-convert flow:
//!
//! * [`Jpg2PdfError::NoImages`]: nothing was uploaded; a warning, not a crash.
//! * [`Jpg2PdfError::PdfAssemblyFailed`]: the encoder rejected the batch;
//!   no partial PDF is kept.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the jpg2pdf library.
#[derive(Debug, Error)]
pub enum Jpg2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// The file name does not carry a `.jpg` / `.jpeg` extension.
    #[error("Unsupported file '{name}': only JPG/JPEG images are accepted")]
    UnsupportedFormat { name: String },

    /// The bytes do not start with the JPEG SOI marker.
    #[error("'{name}' is not a valid JPEG image\nFirst bytes: {magic:?}")]
    NotAJpeg { name: String, magic: [u8; 3] },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Processing errors ─────────────────────────────────────────────────
    /// The JPEG header was valid but the image data could not be decoded.
    #[error("Failed to decode '{name}': {detail}")]
    DecodeFailed { name: String, detail: String },

    /// Re-encoding a processed image to JPEG failed.
    #[error("Failed to encode image {index} as JPEG: {detail}")]
    EncodeFailed { index: usize, detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF creation was requested with an empty batch.
    #[error("Please upload at least one image first")]
    NoImages,

    /// The PDF encoder rejected the batch. No output was produced.
    #[error("Error creating PDF: {0}")]
    PdfAssemblyFailed(String),

    /// An existing PDF could not be parsed.
    #[error("Unreadable PDF: {0}")]
    PdfReadFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Jpg2PdfError {
    /// `true` for the "nothing uploaded" case, which callers usually surface
    /// as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, Jpg2PdfError::NoImages)
    }
}
