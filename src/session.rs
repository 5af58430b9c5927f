//! Caller-owned conversion session.
//!
//! Holds the state an interactive front end needs between user actions: the
//! current upload set, the processing mode, processed previews, and the last
//! generated PDF. Derived state is cleared explicitly:
//!
//! | Event                         | processed images | PDF     |
//! |-------------------------------|------------------|---------|
//! | file set changes              | cleared          | cleared |
//! | processing mode changes       | cleared          | cleared |
//! | `create_pdf` fails            | kept             | cleared |
//! | `clear`                       | cleared          | cleared |
//!
//! Processed images stay positionally aligned with the uploaded files.

use crate::config::{ConversionConfig, ProcessingMode};
use crate::convert::{process_file, ProcessedImage};
use crate::error::Jpg2PdfError;
use crate::format::output_filename;
use crate::pipeline::{assemble, encode};
use crate::pipeline::input::UploadedFile;
use chrono::{DateTime, TimeZone};
use tracing::{debug, info, warn};

/// Upload, preview, and PDF state for one user.
#[derive(Debug, Default)]
pub struct Session {
    files: Vec<UploadedFile>,
    mode: ProcessingMode,
    processed: Vec<ProcessedImage>,
    pdf: Option<Vec<u8>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    /// The last successfully generated PDF, if still valid.
    pub fn pdf(&self) -> Option<&[u8]> {
        self.pdf.as_deref()
    }

    /// Replace the upload set.
    ///
    /// Returns `true` if the set differs from the current one, in which case
    /// processed images and the PDF are dropped.
    pub fn set_files(&mut self, files: Vec<UploadedFile>) -> bool {
        if files == self.files {
            return false;
        }
        debug!("File set changed: {} → {} files", self.files.len(), files.len());
        self.files = files;
        self.invalidate();
        true
    }

    /// Switch processing mode. Returns `true` if the mode changed.
    pub fn set_mode(&mut self, mode: ProcessingMode) -> bool {
        if mode == self.mode {
            return false;
        }
        debug!("Processing mode changed: {} → {}", self.mode, mode);
        self.mode = mode;
        self.invalidate();
        true
    }

    /// Drop uploads and all derived state.
    pub fn clear(&mut self) {
        self.files.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.processed.clear();
        self.pdf = None;
    }

    /// Processed previews for every upload, decoding only what is missing.
    pub fn processed_images(&mut self) -> Result<&[ProcessedImage], Jpg2PdfError> {
        for index in self.processed.len()..self.files.len() {
            let processed = process_file(index, &self.files[index], self.mode)?;
            self.processed.push(processed);
        }
        Ok(&self.processed)
    }

    /// Build a PDF from the current uploads using the layout and quality in
    /// `config`. The session's own mode wins over `config.mode`.
    ///
    /// # Errors
    /// - [`Jpg2PdfError::NoImages`] when nothing is uploaded; nothing is stored
    /// - any decode/encode/assembly error; the previous PDF is dropped
    pub fn create_pdf(&mut self, config: &ConversionConfig) -> Result<&[u8], Jpg2PdfError> {
        if self.files.is_empty() {
            warn!("PDF requested with no uploaded images");
            return Err(Jpg2PdfError::NoImages);
        }
        self.pdf = None;
        info!("Creating PDF from {} images", self.files.len());

        let quality = config.jpeg_quality;
        let jpegs = self
            .processed_images()?
            .iter()
            .enumerate()
            .map(|(index, p)| encode::encode_jpeg(&p.image, quality, index))
            .collect::<Result<Vec<_>, _>>()?;

        let pdf = assemble::assemble_pdf(&jpegs, &config.layout())?;
        Ok(self.pdf.insert(pdf).as_slice())
    }

    /// Download name for the current PDF, stamped with `at`.
    pub fn download_filename<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        output_filename(at)
    }
}
