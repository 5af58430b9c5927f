//! PDF assembly: ordered JPEG buffers → one PDF, one page per image.
//!
//! Each JPEG is embedded verbatim as a `DCTDecode` image XObject, so no pixel
//! data is re-compressed here. The page is sized from [`PageSize`]; the image
//! is drawn at its DPI-derived physical size, scaled per [`FitMode`], and
//! centered.
//!
//! ```text
//! Catalog ─▶ Pages ─┬─▶ Page 1 ─▶ Contents: q w 0 0 h x y cm /Im0 Do Q
//!                   │            Resources/XObject/Im0 ─▶ Image (DCTDecode)
//!                   └─▶ Page N …
//! ```

use crate::config::{FitMode, PageSize, DEFAULT_DPI};
use crate::error::Jpg2PdfError;
use chrono::Local;
use image::codecs::jpeg::JpegDecoder;
use image::ImageDecoder;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Cursor;
use tracing::{debug, info};

const POINTS_PER_INCH: f32 = 72.0;

/// Page layout parameters shared by every page in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub page_size: PageSize,
    pub dpi: u32,
    pub fit: FitMode,
    pub title: Option<String>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            dpi: DEFAULT_DPI,
            fit: FitMode::default(),
            title: None,
        }
    }
}

/// Where an image lands on its page, in PDF points from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Compute the drawn size and offset of a `width_px × height_px` image.
pub fn place_image(
    (width_px, height_px): (u32, u32),
    dpi: u32,
    (page_w, page_h): (f32, f32),
    fit: FitMode,
) -> Placement {
    let dpi = dpi.max(1) as f32;
    let natural_w = width_px as f32 * POINTS_PER_INCH / dpi;
    let natural_h = height_px as f32 * POINTS_PER_INCH / dpi;

    let fit_scale = (page_w / natural_w).min(page_h / natural_h);
    let scale = match fit {
        FitMode::Shrink => fit_scale.min(1.0),
        FitMode::Into => fit_scale,
    };

    let width = natural_w * scale;
    let height = natural_h * scale;
    Placement {
        x: (page_w - width) / 2.0,
        y: (page_h - height) / 2.0,
        width,
        height,
    }
}

struct JpegHeader {
    width: u32,
    height: u32,
    color_space: &'static str,
}

fn read_jpeg_header(jpeg: &[u8], index: usize) -> Result<JpegHeader, Jpg2PdfError> {
    let decoder = JpegDecoder::new(Cursor::new(jpeg)).map_err(|e| {
        Jpg2PdfError::PdfAssemblyFailed(format!("image {} is not a readable JPEG: {}", index + 1, e))
    })?;
    let (width, height) = decoder.dimensions();
    if width == 0 || height == 0 {
        return Err(Jpg2PdfError::PdfAssemblyFailed(format!(
            "image {} has zero size",
            index + 1
        )));
    }
    // The decoder reports 4-component (CMYK/YCCK) frames as Rgb8, so the
    // component count comes from the frame header instead.
    let color_space = match frame_components(jpeg) {
        Some(1) => "DeviceGray",
        Some(3) => "DeviceRGB",
        Some(n) => {
            return Err(Jpg2PdfError::PdfAssemblyFailed(format!(
                "image {} has {} color components; only grayscale and RGB JPEGs are supported",
                index + 1,
                n
            )))
        }
        None => {
            return Err(Jpg2PdfError::PdfAssemblyFailed(format!(
                "image {} has no JPEG frame header",
                index + 1
            )))
        }
    };
    Ok(JpegHeader {
        width,
        height,
        color_space,
    })
}

/// Component count `Nf` of the first SOFn segment, or `None` if the marker
/// stream ends before a frame header.
fn frame_components(jpeg: &[u8]) -> Option<u8> {
    if !jpeg.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 1 < jpeg.len() {
        if jpeg[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = jpeg[pos + 1];
        match marker {
            // fill byte
            0xFF => pos += 1,
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => pos += 2,
            // EOI or start of scan before any frame
            0xD9 | 0xDA => return None,
            // SOF0..SOF15, excluding DHT, JPG and DAC
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                // length(2) precision(1) height(2) width(2) Nf(1)
                return jpeg.get(pos + 9).copied();
            }
            _ => {
                let len_hi = *jpeg.get(pos + 2)? as usize;
                let len_lo = *jpeg.get(pos + 3)? as usize;
                pos += 2 + ((len_hi << 8) | len_lo);
            }
        }
    }
    None
}

/// Build a PDF with one page per JPEG buffer, in order.
///
/// # Errors
/// - [`Jpg2PdfError::NoImages`] when `jpegs` is empty
/// - [`Jpg2PdfError::PdfAssemblyFailed`] when any buffer is unusable or the
///   document cannot be serialised. Nothing is returned in that case.
pub fn assemble_pdf<B: AsRef<[u8]>>(
    jpegs: &[B],
    options: &LayoutOptions,
) -> Result<Vec<u8>, Jpg2PdfError> {
    if jpegs.is_empty() {
        return Err(Jpg2PdfError::NoImages);
    }

    let page_dims = options.page_size.dimensions_pt();
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(jpegs.len());

    for (index, jpeg) in jpegs.iter().enumerate() {
        let jpeg = jpeg.as_ref();
        let header = read_jpeg_header(jpeg, index)?;
        let page_id = add_image_page(&mut doc, pages_id, jpeg, &header, page_dims, options)?;
        kids.push(page_id.into());
        debug!(
            "Page {}: {}x{} px {} on {}",
            index + 1,
            header.width,
            header.height,
            header.color_space,
            options.page_size.as_str()
        );
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(info_dictionary(options.title.as_deref()));
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| Jpg2PdfError::PdfAssemblyFailed(format!("failed to serialise PDF: {e}")))?;

    info!("Assembled PDF: {} pages, {} bytes", count, out.len());
    Ok(out)
}

fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    jpeg: &[u8],
    header: &JpegHeader,
    (page_w, page_h): (f32, f32),
    options: &LayoutOptions,
) -> Result<ObjectId, Jpg2PdfError> {
    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => header.width as i64,
            "Height" => header.height as i64,
            "ColorSpace" => header.color_space,
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        },
        jpeg.to_vec(),
    );
    let image_id = doc.add_object(image);

    let at = place_image(
        (header.width, header.height),
        options.dpi,
        (page_w, page_h),
        options.fit,
    );
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(at.width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(at.height),
                    Object::Real(at.x),
                    Object::Real(at.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| Jpg2PdfError::PdfAssemblyFailed(format!("content stream: {e}")))?;
    let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_w),
            Object::Real(page_h),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    }))
}

fn info_dictionary(title: Option<&str>) -> lopdf::Dictionary {
    let mut info = dictionary! {
        "Producer" => Object::string_literal(format!("jpg2pdf {}", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(format!("D:{}", Local::now().format("%Y%m%d%H%M%S"))),
    };
    if let Some(title) = title {
        info.set("Title", Object::string_literal(title));
    }
    info
}

/// Count the pages of an existing PDF.
pub fn pdf_page_count(pdf: &[u8]) -> Result<usize, Jpg2PdfError> {
    let doc = Document::load_mem(pdf)
        .map_err(|e| Jpg2PdfError::PdfReadFailed(e.to_string()))?;
    Ok(doc.get_pages().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_jpeg;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

    fn jpeg(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([20, 120, 220])));
        encode_jpeg(&img, 80, 0).unwrap()
    }

    fn number(obj: &Object) -> f32 {
        match obj {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r as f32,
            other => panic!("not a number: {other:?}"),
        }
    }

    fn media_boxes(pdf: &[u8]) -> Vec<(f32, f32)> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|id| {
                let page = doc.get_object(*id).unwrap().as_dict().unwrap();
                let mb = page.get(b"MediaBox").unwrap().as_array().unwrap();
                (number(&mb[2]), number(&mb[3]))
            })
            .collect()
    }

    #[test]
    fn one_page_per_image_for_every_page_size() {
        let images = vec![jpeg(40, 30), jpeg(30, 40), jpeg(16, 16)];
        for page_size in PageSize::ALL {
            let options = LayoutOptions {
                page_size,
                ..LayoutOptions::default()
            };
            let pdf = assemble_pdf(&images, &options).unwrap();
            assert!(pdf.starts_with(b"%PDF-1.5"));
            assert_eq!(pdf_page_count(&pdf).unwrap(), images.len(), "{page_size:?}");
        }
    }

    #[test]
    fn pages_use_the_requested_paper_size() {
        let options = LayoutOptions {
            page_size: PageSize::Legal,
            ..LayoutOptions::default()
        };
        let pdf = assemble_pdf(&[jpeg(10, 10), jpeg(20, 10)], &options).unwrap();
        for (w, h) in media_boxes(&pdf) {
            assert!((w - 612.0).abs() < 0.01);
            assert!((h - 1008.0).abs() < 0.01);
        }
    }

    #[test]
    fn empty_batch_is_no_images() {
        let empty: Vec<Vec<u8>> = Vec::new();
        let err = assemble_pdf(&empty, &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, Jpg2PdfError::NoImages));
    }

    #[test]
    fn garbage_buffer_fails_without_output() {
        let images = vec![jpeg(10, 10), b"not a jpeg".to_vec()];
        let err = assemble_pdf(&images, &LayoutOptions::default()).unwrap_err();
        match err {
            Jpg2PdfError::PdfAssemblyFailed(msg) => assert!(msg.contains("image 2"), "got: {msg}"),
            other => panic!("expected PdfAssemblyFailed, got {other:?}"),
        }
    }

    #[test]
    fn grayscale_jpeg_is_accepted() {
        let mut buf = Vec::new();
        let gray = GrayImage::from_pixel(8, 8, Luma([90]));
        image::codecs::jpeg::JpegEncoder::new(&mut buf)
            .encode_image(&gray)
            .unwrap();
        let pdf = assemble_pdf(&[buf], &LayoutOptions::default()).unwrap();
        assert_eq!(pdf_page_count(&pdf).unwrap(), 1);
    }

    fn cmyk_jpeg(w: u16, h: u16) -> Vec<u8> {
        let pixels = vec![0x40u8; w as usize * h as usize * 4];
        let mut buf = Vec::new();
        jpeg_encoder::Encoder::new(&mut buf, 90)
            .encode(&pixels, w, h, jpeg_encoder::ColorType::Cmyk)
            .unwrap();
        buf
    }

    #[test]
    fn frame_header_component_counts() {
        assert_eq!(frame_components(&jpeg(4, 4)), Some(3));
        assert_eq!(frame_components(&cmyk_jpeg(4, 4)), Some(4));
        assert_eq!(frame_components(b"\xFF\xD8\xFF\xD9"), None);
        assert_eq!(frame_components(b"not a jpeg"), None);
    }

    #[test]
    fn cmyk_jpeg_is_rejected_without_output() {
        let images = vec![jpeg(10, 10), cmyk_jpeg(16, 16)];
        let err = assemble_pdf(&images, &LayoutOptions::default()).unwrap_err();
        match err {
            Jpg2PdfError::PdfAssemblyFailed(msg) => {
                assert!(msg.contains("image 2"), "got: {msg}");
                assert!(msg.contains("4 color components"), "got: {msg}");
            }
            other => panic!("expected PdfAssemblyFailed, got {other:?}"),
        }
    }

    #[test]
    fn page_count_of_garbage_is_a_read_error() {
        let err = pdf_page_count(b"%PDF-1.5 truncated").unwrap_err();
        assert!(matches!(err, Jpg2PdfError::PdfReadFailed(_)), "got {err:?}");
    }

    #[test]
    fn repeated_assembly_keeps_page_count() {
        let images = vec![jpeg(12, 8), jpeg(8, 12)];
        let options = LayoutOptions {
            page_size: PageSize::A3,
            dpi: 300,
            fit: FitMode::Into,
            title: Some("Scans".into()),
        };
        let a = assemble_pdf(&images, &options).unwrap();
        let b = assemble_pdf(&images, &options).unwrap();
        assert_eq!(pdf_page_count(&a).unwrap(), pdf_page_count(&b).unwrap());
    }

    #[test]
    fn small_image_keeps_natural_size_when_shrinking() {
        // 150 px at 150 DPI is one inch.
        let at = place_image((150, 300), 150, (612.0, 792.0), FitMode::Shrink);
        assert!((at.width - 72.0).abs() < 1e-3);
        assert!((at.height - 144.0).abs() < 1e-3);
        assert!((at.x - (612.0 - 72.0) / 2.0).abs() < 1e-3);
        assert!((at.y - (792.0 - 144.0) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn large_image_is_scaled_down_to_fit() {
        // 4000×2000 px at 72 DPI is far wider than Letter.
        let at = place_image((4000, 2000), 72, (612.0, 792.0), FitMode::Shrink);
        assert!((at.width - 612.0).abs() < 1e-2);
        assert!((at.height - 306.0).abs() < 1e-2);
        assert!(at.x.abs() < 1e-2);
    }

    #[test]
    fn into_mode_enlarges_small_images() {
        let at = place_image((100, 100), 300, (612.0, 792.0), FitMode::Into);
        assert!((at.width - 612.0).abs() < 1e-2);
        assert!((at.height - 612.0).abs() < 1e-2);
        assert!((at.y - 90.0).abs() < 1e-2);
    }

    #[test]
    fn higher_dpi_means_smaller_pages_content() {
        let low = place_image((300, 300), 72, (612.0, 792.0), FitMode::Shrink);
        let high = place_image((300, 300), 300, (612.0, 792.0), FitMode::Shrink);
        assert!(high.width < low.width);
    }
}
