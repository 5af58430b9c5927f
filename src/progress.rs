//! Progress-callback trait for per-image conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline processes each image. The callbacks fire from the
//! blocking worker thread, so implementations must be `Send + Sync`.
//!
//! # Example
//!
//! ```rust
//! use jpg2pdf::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, index: usize, total: usize, jpeg_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Image {}/{} ready ({} bytes)", index + 1, total, jpeg_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each image.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Image indices are 0-based.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first image is decoded.
    fn on_conversion_start(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called just before an image is decoded.
    fn on_image_start(&self, index: usize, total_images: usize) {
        let _ = (index, total_images);
    }

    /// Called after an image has been normalized and re-encoded.
    ///
    /// `jpeg_len` is the size of the JPEG that will be embedded in the PDF.
    fn on_image_complete(&self, index: usize, total_images: usize, jpeg_len: usize) {
        let _ = (index, total_images, jpeg_len);
    }

    /// Called once after the PDF has been assembled.
    fn on_conversion_complete(&self, total_images: usize, pdf_len: usize) {
        let _ = (total_images, pdf_len);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        pdf_len: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_images: usize) {
            self.started_total.store(total_images, Ordering::SeqCst);
        }

        fn on_image_start(&self, _index: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_complete(&self, _index: usize, _total: usize, _jpeg_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _total_images: usize, pdf_len: usize) {
            self.pdf_len.store(pdf_len, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(2);
        cb.on_image_start(0, 2);
        cb.on_image_complete(0, 2, 1024);
        cb.on_conversion_complete(2, 4096);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(2);
        tracker.on_image_start(0, 2);
        tracker.on_image_complete(0, 2, 100);
        tracker.on_image_start(1, 2);
        tracker.on_image_complete(1, 2, 200);
        tracker.on_conversion_complete(2, 900);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.pdf_len.load(Ordering::SeqCst), 900);
    }
}
