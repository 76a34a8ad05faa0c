//! Page raster access for the optical-recognition fallback.
//!
//! Scanner-produced documents carry each page as an image XObject. This
//! module pulls the largest raster off a page, normalizes it to PNG, and
//! upscales it 2x so small glyphs survive recognition.

use image::imageops::FilterType;
use image::ImageOutputFormat;
use lopdf::{Document, Object, ObjectId};

use super::ExtractionError;

/// Recognition accuracy drops sharply on low-resolution scans; every page
/// is upscaled by this factor before it reaches the vision model.
const UPSCALE_FACTOR: u32 = 2;

pub(super) fn page_count(document: &[u8]) -> Result<usize, ExtractionError> {
    let doc = load(document)?;
    Ok(doc.page_iter().count())
}

/// Render one page for recognition: largest embedded raster, upscaled
/// [`UPSCALE_FACTOR`]x, re-encoded as PNG.
pub(super) fn page_image_upscaled(
    document: &[u8],
    page_index: usize,
) -> Result<Vec<u8>, ExtractionError> {
    let doc = load(document)?;

    let page_ids: Vec<ObjectId> = doc.page_iter().collect();
    let &page_id = page_ids.get(page_index).ok_or_else(|| {
        ExtractionError::PdfParsing(format!(
            "page {} not found (document has {} pages)",
            page_index,
            page_ids.len()
        ))
    })?;

    let raw = largest_page_image(&doc, page_id)?;

    let decoded = image::load_from_memory(&raw).map_err(|err| {
        ExtractionError::ImageProcessing(format!("failed to decode page raster: {err}"))
    })?;

    let upscaled = decoded.resize_exact(
        decoded.width() * UPSCALE_FACTOR,
        decoded.height() * UPSCALE_FACTOR,
        FilterType::CatmullRom,
    );

    let mut png = std::io::Cursor::new(Vec::new());
    upscaled
        .write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|err| ExtractionError::ImageProcessing(format!("failed to encode PNG: {err}")))?;

    tracing::debug!(
        page = page_index,
        raw_bytes = raw.len(),
        png_bytes = png.get_ref().len(),
        "prepared page raster for recognition"
    );

    Ok(png.into_inner())
}

fn load(document: &[u8]) -> Result<Document, ExtractionError> {
    Document::load_mem(document)
        .map_err(|err| ExtractionError::PdfParsing(format!("failed to parse document: {err}")))
}

/// Walk page dict -> /Resources -> /XObject and return the bytes of the
/// largest /Image stream, which is the page scan on scanner output.
fn largest_page_image(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, ExtractionError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(|obj| obj.as_dict())
        .map_err(|err| ExtractionError::PdfParsing(format!("page object error: {err}")))?;

    let resources = resolve_dict_entry(doc, page_dict, b"Resources")?;
    let xobjects = resolve_dict_entry(doc, resources, b"XObject")?;

    let mut largest: Option<Vec<u8>> = None;

    for (_name, entry) in xobjects.iter() {
        let object = match entry {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(obj) => obj,
                Err(_) => continue,
            },
            other => other,
        };

        let stream = match object {
            Object::Stream(ref stream) => stream,
            _ => continue,
        };

        if !is_image_subtype(&stream.dict) {
            continue;
        }

        let bytes = image_stream_bytes(&stream.dict, stream)?;
        if largest.as_ref().map_or(true, |prev| bytes.len() > prev.len()) {
            largest = Some(bytes);
        }
    }

    largest.ok_or_else(|| {
        ExtractionError::PdfParsing("no embedded raster image on this page".to_string())
    })
}

fn is_image_subtype(dict: &lopdf::Dictionary) -> bool {
    dict.get(b"Subtype")
        .map(|obj| matches!(obj, Object::Name(ref name) if name == b"Image"))
        .unwrap_or(false)
}

/// Decode an image stream into something `image::load_from_memory` can
/// read. DCTDecode streams are JPEG files verbatim; Flate streams either
/// hold a complete image file or raw pixels that need reassembly.
fn image_stream_bytes(
    dict: &lopdf::Dictionary,
    stream: &lopdf::Stream,
) -> Result<Vec<u8>, ExtractionError> {
    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    if is_dct_encoded(dict) || image::load_from_memory(&content).is_ok() {
        return Ok(content);
    }

    reassemble_raw_pixels(dict, &content)
}

fn is_dct_encoded(dict: &lopdf::Dictionary) -> bool {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => name == b"DCTDecode",
        Ok(Object::Array(filters)) => filters
            .iter()
            .any(|f| matches!(f, Object::Name(ref name) if name == b"DCTDecode")),
        _ => false,
    }
}

/// Rebuild an image from raw pixel data using /Width, /Height, and
/// /ColorSpace. Gray, RGB, and RGBA layouts cover scanner output; anything
/// more exotic is rejected.
fn reassemble_raw_pixels(
    dict: &lopdf::Dictionary,
    pixels: &[u8],
) -> Result<Vec<u8>, ExtractionError> {
    let width = dict_u32(dict, b"Width")?;
    let height = dict_u32(dict, b"Height")?;
    let channels = match dict.get(b"ColorSpace") {
        Ok(Object::Name(name)) if name == b"DeviceGray" => 1,
        Ok(Object::Name(name)) if name == b"DeviceCMYK" => 4,
        _ => 3,
    };

    let expected = (width * height * channels) as usize;
    if pixels.len() < expected {
        return Err(ExtractionError::ImageProcessing(format!(
            "raster buffer holds {} bytes, expected {expected} ({width}x{height}x{channels})",
            pixels.len()
        )));
    }

    let img = match channels {
        1 => image::GrayImage::from_raw(width, height, pixels.to_vec())
            .map(image::DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(width, height, pixels.to_vec())
            .map(image::DynamicImage::ImageRgb8),
        4 => image::RgbaImage::from_raw(width, height, pixels.to_vec())
            .map(image::DynamicImage::ImageRgba8),
        _ => None,
    }
    .ok_or_else(|| ExtractionError::ImageProcessing("failed to assemble raster".to_string()))?;

    let mut png = std::io::Cursor::new(Vec::new());
    img.write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|err| ExtractionError::ImageProcessing(format!("failed to encode PNG: {err}")))?;
    Ok(png.into_inner())
}

fn dict_u32(dict: &lopdf::Dictionary, key: &[u8]) -> Result<u32, ExtractionError> {
    dict.get(key)
        .and_then(|obj| obj.as_i64())
        .map(|value| value as u32)
        .map_err(|_| {
            ExtractionError::PdfParsing(format!(
                "missing /{} in image dictionary",
                String::from_utf8_lossy(key)
            ))
        })
}

fn resolve_dict_entry<'a>(
    doc: &'a Document,
    dict: &'a lopdf::Dictionary,
    key: &[u8],
) -> Result<&'a lopdf::Dictionary, ExtractionError> {
    let entry = dict.get(key).map_err(|_| {
        ExtractionError::PdfParsing(format!("missing /{}", String::from_utf8_lossy(key)))
    })?;

    let resolved = match entry {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(entry),
        other => other,
    };

    resolved.as_dict().map_err(|_| {
        ExtractionError::PdfParsing(format!(
            "/{} is not a dictionary",
            String::from_utf8_lossy(key)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::super::tests::support;
    use super::*;

    #[test]
    fn page_scan_is_upscaled_and_png_encoded() {
        let pdf = support::scanned_pdf_with_text("Stub");
        let png = page_image_upscaled(&pdf, 0).expect("page renders");

        assert_eq!(&png[0..4], b"\x89PNG");
        let img = image::load_from_memory(&png).expect("valid image");
        // Source raster is 200x300; the recognition copy doubles it.
        assert_eq!(img.width(), 400);
        assert_eq!(img.height(), 600);
    }

    #[test]
    fn out_of_range_page_is_rejected() {
        let pdf = support::scanned_pdf_with_text("Stub");
        let err = page_image_upscaled(&pdf, 3).expect_err("single-page document");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn text_only_page_has_no_raster() {
        let pdf = support::text_pdf("A document without any embedded scan image at all");
        let err = page_image_upscaled(&pdf, 0).expect_err("nothing to recognize");
        assert!(err.to_string().contains("no embedded raster image"));
    }

    #[test]
    fn page_count_matches_document() {
        let pdf = support::text_pdf("counting pages");
        assert_eq!(page_count(&pdf).expect("parses"), 1);
    }
}
