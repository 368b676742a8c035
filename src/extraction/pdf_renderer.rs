//! Page rasterization for scanned PDFs, built on `lopdf`.
//!
//! A scanned page is almost always a single full-page image XObject. Instead
//! of rendering vector content, this renderer recovers the largest embedded
//! image on the page and re-encodes it as PNG for the OCR engine. The scan
//! bitmap is already at capture resolution, so the requested scale factor is
//! only a hint here.

use std::io::Cursor;

use image::ImageOutputFormat;
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::types::PdfPageRenderer;
use super::ExtractionError;

/// Recovers the page scan image embedded in a PDF page.
pub struct ScanImageRenderer;

impl PdfPageRenderer for ScanImageRenderer {
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        _scale: f32,
    ) -> Result<Vec<u8>, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(format!("failed to parse PDF: {e}")))?;

        let page_number = page_index as u32 + 1;
        let page_id = *doc.get_pages().get(&page_number).ok_or_else(|| {
            ExtractionError::PdfRender(format!("page {page_number} not present in document"))
        })?;

        let raw = largest_page_image(&doc, page_id)?;

        let decoded = image::load_from_memory(&raw).map_err(|e| {
            ExtractionError::ImageProcessing(format!("embedded scan did not decode: {e}"))
        })?;

        let mut png = Cursor::new(Vec::new());
        decoded
            .write_to(&mut png, ImageOutputFormat::Png)
            .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encode failed: {e}")))?;

        tracing::debug!(
            page = page_number,
            raw_bytes = raw.len(),
            png_bytes = png.get_ref().len(),
            "recovered scan image from PDF page"
        );

        Ok(png.into_inner())
    }
}

/// Walk page resources and return the bytes of the largest image XObject,
/// which for scans is the page bitmap itself.
fn largest_page_image(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, ExtractionError> {
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| ExtractionError::PdfParsing(format!("bad page object: {e}")))?;

    let resources = dict_entry(doc, page, b"Resources")?;
    let xobjects = dict_entry(doc, resources, b"XObject")?;

    let mut best: Option<Vec<u8>> = None;
    for (_, entry) in xobjects.iter() {
        let Object::Stream(stream) = deref(doc, entry) else {
            continue;
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .map(|o| matches!(o, Object::Name(n) if n == b"Image"))
            .unwrap_or(false);
        if !is_image {
            continue;
        }

        let bytes = image_stream_bytes(stream)?;
        if best.as_ref().map_or(true, |b| bytes.len() > b.len()) {
            best = Some(bytes);
        }
    }

    best.ok_or_else(|| ExtractionError::PdfRender("no image XObject on page".into()))
}

/// Pull decodable image bytes out of an image stream. DCTDecode content is a
/// complete JPEG; anything else is decompressed and reconstructed from raw
/// pixels when the buffer is not a self-contained image file.
fn image_stream_bytes(stream: &lopdf::Stream) -> Result<Vec<u8>, ExtractionError> {
    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    if has_filter(&stream.dict, b"DCTDecode") || image::load_from_memory(&content).is_ok() {
        return Ok(content);
    }

    rebuild_raw_pixels(&stream.dict, &content)
}

fn has_filter(dict: &Dictionary, name: &[u8]) -> bool {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => n == name,
        Ok(Object::Array(filters)) => filters
            .iter()
            .any(|f| matches!(f, Object::Name(n) if n == name)),
        _ => false,
    }
}

/// Rebuild an image from raw pixel data using /Width, /Height, /ColorSpace.
/// Dimensions come straight from a hostile file, so the size arithmetic must
/// never overflow.
fn rebuild_raw_pixels(dict: &Dictionary, pixels: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let width = dict_i64(dict, b"Width")?;
    let height = dict_i64(dict, b"Height")?;
    if width <= 0 || height <= 0 || width > i64::from(u32::MAX) || height > i64::from(u32::MAX) {
        return Err(ExtractionError::ImageProcessing(format!(
            "implausible image dimensions {width}x{height}"
        )));
    }
    let width = width as u32;
    let height = height as u32;

    let channels = match dict.get(b"ColorSpace") {
        Ok(Object::Name(n)) if n == b"DeviceGray" => 1usize,
        Ok(Object::Name(n)) if n == b"DeviceCMYK" => 4,
        _ => 3,
    };

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|p| p.checked_mul(channels))
        .ok_or_else(|| {
            ExtractionError::ImageProcessing(format!(
                "implausible image dimensions {width}x{height}x{channels}"
            ))
        })?;
    if pixels.len() < expected {
        return Err(ExtractionError::ImageProcessing(format!(
            "raw pixel buffer too small: {} bytes for {width}x{height}x{channels}",
            pixels.len()
        )));
    }

    let dynamic = match channels {
        1 => image::GrayImage::from_raw(width, height, pixels[..expected].to_vec())
            .map(image::DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(width, height, pixels[..expected].to_vec())
            .map(image::DynamicImage::ImageRgb8),
        4 => image::RgbaImage::from_raw(width, height, pixels[..expected].to_vec())
            .map(image::DynamicImage::ImageRgba8),
        _ => None,
    }
    .ok_or_else(|| ExtractionError::ImageProcessing("raw pixel reconstruction failed".into()))?;

    let mut png = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encode failed: {e}")))?;
    Ok(png.into_inner())
}

fn deref<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn dict_entry<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Result<&'a Dictionary, ExtractionError> {
    let obj = dict.get(key).map_err(|_| {
        ExtractionError::PdfParsing(format!("missing /{}", String::from_utf8_lossy(key)))
    })?;
    deref(doc, obj).as_dict().map_err(|_| {
        ExtractionError::PdfParsing(format!("/{} is not a dictionary", String::from_utf8_lossy(key)))
    })
}

fn dict_i64(dict: &Dictionary, key: &[u8]) -> Result<i64, ExtractionError> {
    dict.get(key)
        .and_then(Object::as_i64)
        .map_err(|_| {
            ExtractionError::PdfParsing(format!(
                "missing or non-integer /{}",
                String::from_utf8_lossy(key)
            ))
        })
}
