//! Image files to and from `data:` URIs

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use sow_types::{Error, Result};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Read an image file and encode it as `data:{mime};base64,…`
pub fn encode_image_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let mime = guess_mime(&bytes, path);
    Ok(encode_bytes(&bytes, mime))
}

pub fn encode_bytes(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// MIME from the content, then the extension
fn guess_mime(bytes: &[u8], path: &Path) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if extension == "svg" {
        return "image/svg+xml";
    }
    ImageFormat::from_extension(&extension)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// Split a data URI into its MIME type and decoded bytes
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::Validation("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Validation("data URI without payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::Validation("only base64 data URIs are supported".to_string()))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::Validation(format!("invalid base64 payload: {}", e)))?;
    let mime = if mime.is_empty() { FALLBACK_MIME } else { mime };
    Ok((mime.to_string(), bytes))
}

/// Decode a data URI into pixels, scaled down to fit `max_side`
pub fn decode_preview(uri: &str, max_side: u32) -> Result<DynamicImage> {
    let (_, bytes) = decode_data_uri(uri)?;
    let img = image::load_from_memory(&bytes)?;
    if img.width() > max_side || img.height() > max_side {
        Ok(img.thumbnail(max_side, max_side))
    } else {
        Ok(img)
    }
}
