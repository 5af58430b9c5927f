//! Batch conversion entry points.
//!
//! [`convert`] resolves every input first (local paths and URLs), then runs
//! decode → normalize → encode → assemble on a single `spawn_blocking` task.
//! Nothing is written and no PDF is returned unless every image made it
//! through. For interactive, incremental use see [`crate::session::Session`].

use crate::config::{ConversionConfig, ProcessingMode};
use crate::error::Jpg2PdfError;
use crate::output::{ConversionOutput, ConversionStats, ImageInfo};
use crate::pipeline::{assemble, color, decode, encode, input};
use crate::pipeline::input::UploadedFile;
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// A decoded image after the processing mode has been applied.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub info: ImageInfo,
    pub image: DynamicImage,
}

/// Convert JPEG files or URLs into one PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `inputs`: local JPEG paths and/or HTTP/HTTPS URLs, in page order
/// * `config`: conversion configuration
///
/// # Errors
/// - [`Jpg2PdfError::NoImages`] if `inputs` is empty
/// - any input error (missing file, not a JPEG, download failure)
/// - [`Jpg2PdfError::PdfAssemblyFailed`] if the PDF could not be built
pub async fn convert<S: AsRef<str>>(
    inputs: &[S],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Jpg2PdfError> {
    let total_start = Instant::now();
    if inputs.is_empty() {
        return Err(Jpg2PdfError::NoImages);
    }
    info!("Starting conversion of {} inputs", inputs.len());

    // ── Step 1: Resolve inputs ───────────────────────────────────────────
    let files =
        input::resolve_inputs(inputs, config.concurrency, config.download_timeout_secs).await?;

    // ── Step 2: Process + assemble off the async runtime ─────────────────
    let config_clone = config.clone();
    let mut output = tokio::task::spawn_blocking(move || convert_files(&files, &config_clone))
        .await
        .map_err(|e| Jpg2PdfError::Internal(format!("Conversion task panicked: {}", e)))??;

    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Conversion complete: {} pages, {} bytes, {}ms total",
        output.stats.page_count, output.stats.pdf_bytes, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Convert already-loaded uploads into one PDF. Blocking.
///
/// Use this when the image bytes come from a form upload, a database, or any
/// other in-memory source.
pub fn convert_files(
    files: &[UploadedFile],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Jpg2PdfError> {
    let start = Instant::now();
    if files.is_empty() {
        return Err(Jpg2PdfError::NoImages);
    }
    let total = files.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    // ── Decode, normalize, re-encode ─────────────────────────────────────
    let process_start = Instant::now();
    let mut infos = Vec::with_capacity(total);
    let mut jpegs = Vec::with_capacity(total);
    for (index, file) in files.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_image_start(index, total);
        }
        let processed = process_file(index, file, config.mode)?;
        let jpeg = encode::encode_jpeg(&processed.image, config.jpeg_quality, index)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_image_complete(index, total, jpeg.len());
        }
        infos.push(processed.info);
        jpegs.push(jpeg);
    }
    let process_duration_ms = process_start.elapsed().as_millis() as u64;

    // ── Assemble ─────────────────────────────────────────────────────────
    let assemble_start = Instant::now();
    let pdf = assemble::assemble_pdf(&jpegs, &config.layout())?;
    let assemble_duration_ms = assemble_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total, pdf.len());
    }

    let stats = ConversionStats {
        image_count: total,
        page_count: jpegs.len(),
        pdf_bytes: pdf.len(),
        mode: config.mode,
        page_size: config.page_size,
        dpi: config.dpi,
        total_duration_ms: start.elapsed().as_millis() as u64,
        process_duration_ms,
        assemble_duration_ms,
    };

    Ok(ConversionOutput {
        pdf,
        images: infos,
        stats,
    })
}

/// Convert and write the PDF directly to a file.
///
/// Uses atomic write (temp file + rename) so a failed run never leaves a
/// partial PDF behind.
pub async fn convert_to_file<S: AsRef<str>>(
    inputs: &[S],
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Jpg2PdfError> {
    let output = convert(inputs, config).await?;
    let path = output_path.as_ref();
    write_atomic(path, &output.pdf).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync<S: AsRef<str>>(
    inputs: &[S],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Jpg2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Jpg2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(inputs, config))
}

/// Decode every input and report its preview facts without building a PDF.
pub async fn inspect<S: AsRef<str>>(
    inputs: &[S],
    config: &ConversionConfig,
) -> Result<Vec<ImageInfo>, Jpg2PdfError> {
    let files =
        input::resolve_inputs(inputs, config.concurrency, config.download_timeout_secs).await?;
    let mode = config.mode;
    tokio::task::spawn_blocking(move || {
        files
            .iter()
            .enumerate()
            .map(|(index, file)| process_file(index, file, mode).map(|p| p.info))
            .collect::<Result<Vec<_>, _>>()
    })
    .await
    .map_err(|e| Jpg2PdfError::Internal(format!("Inspect task panicked: {}", e)))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Decode one upload and apply `mode`.
pub(crate) fn process_file(
    index: usize,
    file: &UploadedFile,
    mode: ProcessingMode,
) -> Result<ProcessedImage, Jpg2PdfError> {
    let decoded = decode::decode_image(file)?;
    let info = ImageInfo::new(
        index,
        file.name.as_str(),
        (decoded.width(), decoded.height()),
        file.len() as u64,
        mode,
    );
    let image = color::normalize(decoded, mode);
    debug!("Processed image {} ({}) as {}", index + 1, file.name, mode);
    Ok(ProcessedImage { info, image })
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Jpg2PdfError> {
    let write_err = |e: std::io::Error| Jpg2PdfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}
