//! Configuration types for JPEG-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The three user-facing choices of the
//! original upload form live here ([`ProcessingMode`], [`PageSize`], DPI)
//! next to the knobs the library adds (fit mode, JPEG quality, download
//! settings).

use crate::error::Jpg2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest accepted DPI.
pub const MIN_DPI: u32 = 72;
/// Highest accepted DPI.
pub const MAX_DPI: u32 = 300;
/// Default DPI, matching the original slider position.
pub const DEFAULT_DPI: u32 = 150;
/// Default JPEG re-encode quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Configuration for a JPEG-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use jpg2pdf::{ConversionConfig, PageSize, ProcessingMode};
///
/// let config = ConversionConfig::builder()
///     .mode(ProcessingMode::Grayscale)
///     .page_size(PageSize::Letter)
///     .dpi(200)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 200);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Color or grayscale, applied to every image. Default: color.
    pub mode: ProcessingMode,

    /// Paper size of every PDF page. Default: A4.
    pub page_size: PageSize,

    /// Dots per inch used to map image pixels to physical size. Range: 72–300.
    /// Default: 150.
    ///
    /// An image of `w` pixels occupies `w / dpi` inches on the page before
    /// any fit scaling is applied.
    pub dpi: u32,

    /// How an image larger (or smaller) than the page is scaled. Default: shrink.
    pub fit: FitMode,

    /// Quality (1–100) used when re-encoding processed images. Default: 75.
    pub jpeg_quality: u8,

    /// Optional document title written to the PDF info dictionary.
    pub title: Option<String>,

    /// Number of URL inputs downloaded at once. Default: 4.
    pub concurrency: usize,

    /// Download timeout for URL inputs in seconds. Default: 60.
    pub download_timeout_secs: u64,

    /// Optional per-image progress reporting.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::default(),
            page_size: PageSize::default(),
            dpi: DEFAULT_DPI,
            fit: FitMode::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            title: None,
            concurrency: 4,
            download_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("mode", &self.mode)
            .field("page_size", &self.page_size)
            .field("dpi", &self.dpi)
            .field("fit", &self.fit)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("title", &self.title)
            .field("concurrency", &self.concurrency)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The page-layout subset of this config, as consumed by the assembler.
    pub fn layout(&self) -> crate::pipeline::assemble::LayoutOptions {
        crate::pipeline::assemble::LayoutOptions {
            page_size: self.page_size,
            dpi: self.dpi,
            fit: self.fit,
            title: self.title.clone(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn mode(mut self, mode: ProcessingMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn fit(mut self, fit: FitMode) -> Self {
        self.config.fit = fit;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Jpg2PdfError> {
        let c = &self.config;
        if c.dpi < MIN_DPI || c.dpi > MAX_DPI {
            return Err(Jpg2PdfError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(Jpg2PdfError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.concurrency == 0 {
            return Err(Jpg2PdfError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Whether output pages keep their colors or are converted to grayscale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Keep the decoded image as-is. (default)
    #[default]
    Color,
    /// Collapse to luminance, stored as 3 identical channels.
    Grayscale,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Color => "color",
            ProcessingMode::Grayscale => "grayscale",
        }
    }

    /// Short badge shown next to each image preview.
    pub fn badge(&self) -> &'static str {
        match self {
            ProcessingMode::Color => "Color",
            ProcessingMode::Grayscale => "B&W",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingMode {
    type Err = Jpg2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "color" | "colour" => Ok(ProcessingMode::Color),
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(ProcessingMode::Grayscale),
            other => Err(Jpg2PdfError::InvalidConfig(format!(
                "Unknown processing mode '{other}' (expected color or grayscale)"
            ))),
        }
    }
}

/// Standard paper sizes a PDF page can be laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// 210 × 297 mm. (default)
    #[default]
    A4,
    /// 8.5 × 11 in.
    Letter,
    /// 8.5 × 14 in.
    Legal,
    /// 297 × 420 mm.
    A3,
}

const POINTS_PER_MM: f32 = 72.0 / 25.4;

impl PageSize {
    /// Every supported page size, in display order.
    pub const ALL: [PageSize; 4] = [PageSize::A4, PageSize::Letter, PageSize::Legal, PageSize::A3];

    /// Page `(width, height)` in PDF points (1/72 inch), portrait.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0 * POINTS_PER_MM, 297.0 * POINTS_PER_MM),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::A3 => (297.0 * POINTS_PER_MM, 420.0 * POINTS_PER_MM),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A4 => "a4",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
            PageSize::A3 => "a3",
        }
    }

    /// Human-readable label with physical dimensions.
    pub fn label(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4 (210×297mm)",
            PageSize::Letter => "Letter (8.5×11in)",
            PageSize::Legal => "Legal (8.5×14in)",
            PageSize::A3 => "A3 (297×420mm)",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PageSize {
    type Err = Jpg2PdfError;

    /// Accepts the identifier (`a4`) or a full label (`A4 (210×297mm)`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.split_whitespace().next().unwrap_or("").to_lowercase();
        match token.as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            "a3" => Ok(PageSize::A3),
            _ => Err(Jpg2PdfError::InvalidConfig(format!(
                "Unknown page size '{}' (expected a4, letter, legal or a3)",
                s.trim()
            ))),
        }
    }
}

/// How an image is scaled onto its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Keep the DPI-derived size; scale down only if it overflows the page. (default)
    #[default]
    Shrink,
    /// Scale up or down to the largest size that fits the page.
    Into,
}

impl FromStr for FitMode {
    type Err = Jpg2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shrink" => Ok(FitMode::Shrink),
            "into" => Ok(FitMode::Into),
            other => Err(Jpg2PdfError::InvalidConfig(format!(
                "Unknown fit mode '{other}' (expected shrink or into)"
            ))),
        }
    }
}
