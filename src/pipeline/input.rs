//! Input resolution: turn a path, URL, or in-memory upload into an
//! [`UploadedFile`].
//!
//! Only JPEG/JPG input is accepted. Local paths and named uploads must carry a
//! `.jpg` / `.jpeg` extension; every input, including downloads, must start
//! with the JPEG SOI marker (`FF D8 FF`) so callers get a meaningful error
//! instead of a decoder failure deep in the pipeline.

use crate::error::Jpg2PdfError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Raw bytes of one input image plus the name it was uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Validate an in-memory upload: JPG/JPEG extension and JPEG magic bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, Jpg2PdfError> {
        let name = name.into();
        if !has_jpeg_extension(&name) {
            return Err(Jpg2PdfError::UnsupportedFormat { name });
        }
        check_magic(&name, &bytes)?;
        Ok(Self { name, bytes })
    }

    /// Size of the upload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// `true` when the name ends in `.jpg` or `.jpeg`, ignoring case.
pub fn has_jpeg_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

fn check_magic(name: &str, bytes: &[u8]) -> Result<(), Jpg2PdfError> {
    if bytes.len() >= 3 && bytes[..3] == JPEG_MAGIC {
        return Ok(());
    }
    let mut magic = [0u8; 3];
    let n = bytes.len().min(3);
    magic[..n].copy_from_slice(&bytes[..n]);
    Err(Jpg2PdfError::NotAJpeg {
        name: name.to_string(),
        magic,
    })
}

/// Resolve the input string to an [`UploadedFile`].
///
/// If the input is a URL, download it. Otherwise read it as a local file.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<UploadedFile, Jpg2PdfError> {
    if input.trim().is_empty() {
        return Err(Jpg2PdfError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input).await
    }
}

/// Resolve several inputs, downloading up to `concurrency` URLs at once.
///
/// The result preserves input order; the first failure aborts the batch.
pub async fn resolve_inputs<S: AsRef<str>>(
    inputs: &[S],
    concurrency: usize,
    timeout_secs: u64,
) -> Result<Vec<UploadedFile>, Jpg2PdfError> {
    stream::iter(inputs.iter().map(|s| resolve_input(s.as_ref(), timeout_secs)))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Read a local file, validating existence, extension, and JPEG magic bytes.
async fn resolve_local(path_str: &str) -> Result<UploadedFile, Jpg2PdfError> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(Jpg2PdfError::FileNotFound { path });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_str.to_string());

    if !has_jpeg_extension(&name) {
        return Err(Jpg2PdfError::UnsupportedFormat { name });
    }

    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Jpg2PdfError::PermissionDenied { path });
        }
        Err(_) => return Err(Jpg2PdfError::FileNotFound { path }),
    };

    check_magic(&name, &bytes)?;
    debug!("Resolved local image: {} ({} bytes)", path.display(), bytes.len());
    Ok(UploadedFile { name, bytes })
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<UploadedFile, Jpg2PdfError> {
    info!("Downloading image from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Jpg2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Jpg2PdfError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Jpg2PdfError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Jpg2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Jpg2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let name = filename_from_url(url);
    check_magic(&name, &bytes)?;
    info!("Downloaded {} ({} bytes)", name, bytes.len());

    Ok(UploadedFile {
        name,
        bytes: bytes.to_vec(),
    })
}

/// Last non-empty path segment of the URL, or `downloaded.jpg`.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.jpg".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_JPEG_PREFIX: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/photo.jpg"));
        assert!(is_url("http://example.com/photo.jpg"));
        assert!(!is_url("/tmp/photo.jpg"));
        assert!(!is_url("photo.jpg"));
        assert!(!is_url(""));
    }

    #[test]
    fn jpeg_extensions_are_case_insensitive() {
        assert!(has_jpeg_extension("a.jpg"));
        assert!(has_jpeg_extension("a.JPEG"));
        assert!(has_jpeg_extension("dir/b.Jpg"));
        assert!(!has_jpeg_extension("a.png"));
        assert!(!has_jpeg_extension("jpg"));
        assert!(!has_jpeg_extension(""));
    }

    #[test]
    fn upload_requires_extension_and_magic() {
        assert!(UploadedFile::new("ok.jpg", TINY_JPEG_PREFIX.to_vec()).is_ok());

        let wrong_ext = UploadedFile::new("scan.png", TINY_JPEG_PREFIX.to_vec());
        assert!(matches!(wrong_ext, Err(Jpg2PdfError::UnsupportedFormat { .. })));

        let wrong_magic = UploadedFile::new("fake.jpg", b"\x89PNG".to_vec());
        match wrong_magic {
            Err(Jpg2PdfError::NotAJpeg { magic, .. }) => assert_eq!(magic, [0x89, b'P', b'N']),
            other => panic!("expected NotAJpeg, got {other:?}"),
        }

        let empty = UploadedFile::new("empty.jpg", Vec::new());
        assert!(matches!(empty, Err(Jpg2PdfError::NotAJpeg { .. })));
    }

    #[test]
    fn url_filename_extraction() {
        assert_eq!(filename_from_url("https://example.com/a/b/cat.jpg"), "cat.jpg");
        assert_eq!(filename_from_url("https://example.com/"), "downloaded.jpg");
        assert_eq!(filename_from_url("not a url"), "downloaded.jpg");
    }

    #[tokio::test]
    async fn missing_local_file_is_reported() {
        let err = resolve_input("/definitely/not/here.jpg", 5).await.unwrap_err();
        assert!(matches!(err, Jpg2PdfError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn blank_input_is_invalid() {
        let err = resolve_input("   ", 5).await.unwrap_err();
        assert!(matches!(err, Jpg2PdfError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn local_files_resolve_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.JPEG");
        std::fs::write(&a, TINY_JPEG_PREFIX).unwrap();
        std::fs::write(&b, [0xFF, 0xD8, 0xFF, 0xDB, 0x00]).unwrap();

        let inputs = vec![
            b.to_string_lossy().into_owned(),
            a.to_string_lossy().into_owned(),
        ];
        let files = resolve_inputs(&inputs, 2, 5).await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "b.JPEG");
        assert_eq!(files[1].name, "a.jpg");
        assert_eq!(files[0].len(), 5);
    }

    #[tokio::test]
    async fn local_non_jpeg_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("image.png");
        std::fs::write(&p, TINY_JPEG_PREFIX).unwrap();
        let err = resolve_input(p.to_str().unwrap(), 5).await.unwrap_err();
        assert!(matches!(err, Jpg2PdfError::UnsupportedFormat { .. }));
    }
}
