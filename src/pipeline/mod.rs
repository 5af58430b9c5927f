//! Pipeline stages for JPEG-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ decode ──▶ color ──▶ encode ──▶ assemble
//! (path/URL) (image)   (mode)    (JPEG)     (lopdf)
//! ```
//!
//! 1. [`input`]    : read local files, download URLs, validate JPEG magic
//! 2. [`decode`]   : JPEG bytes → `DynamicImage`
//! 3. [`color`]    : apply the processing mode (color / grayscale)
//! 4. [`encode`]   : re-encode each processed image as RGB JPEG
//! 5. [`assemble`] : embed the JPEGs one per page into a single PDF

pub mod assemble;
pub mod color;
pub mod decode;
pub mod encode;
pub mod input;
