//! Decoding and validation of images submitted inline as base64.

use base64::Engine;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Allowed image formats for recipe images and avatars.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum decoded image size (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Content type detected from the bytes, not the one claimed by the data URL.
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Decode a `data:image/...;base64,` URL (or bare base64) into validated image bytes.
pub fn decode_data_url(input: &str) -> Result<DecodedImage, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("No image provided".to_string());
    }

    let payload = match input.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| "Malformed data URL".to_string())?;
            if !meta.ends_with(";base64") {
                return Err("Image data URL must be base64 encoded".to_string());
            }
            payload
        }
        None => input,
    };

    // Upper bound on decoded size without decoding first.
    if payload.len() / 4 * 3 > MAX_FILE_SIZE + 3 {
        return Err(format!(
            "Image too large. Maximum size is {} bytes",
            MAX_FILE_SIZE
        ));
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| format!("Invalid base64 image data: {}", e))?;

    if data.len() > MAX_FILE_SIZE {
        return Err(format!(
            "Image too large. Maximum size is {} bytes",
            MAX_FILE_SIZE
        ));
    }

    let content_type = validate_image(&data)?;
    Ok(DecodedImage { content_type, data })
}

/// Detect the format from magic bytes, check it is allowed and that the header
/// parses. Returns the content type (e.g. "image/png").
pub fn validate_image(data: &[u8]) -> Result<String, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    reader
        .into_dimensions()
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    Ok(format.to_mime_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn b64(data: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(data)
    }

    #[test]
    fn test_decode_data_url() {
        let png = png_bytes();
        let url = format!("data:image/png;base64,{}", b64(&png));

        let decoded = decode_data_url(&url).unwrap();

        assert_eq!(decoded.content_type, "image/png");
        assert_eq!(decoded.data, png);
    }

    #[test]
    fn test_decode_bare_base64() {
        let decoded = decode_data_url(&b64(&png_bytes())).unwrap();
        assert_eq!(decoded.content_type, "image/png");
    }

    #[test]
    fn test_claimed_type_is_ignored() {
        let url = format!("data:image/jpeg;base64,{}", b64(&png_bytes()));
        assert_eq!(decode_data_url(&url).unwrap().content_type, "image/png");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(decode_data_url("  ").is_err());
    }

    #[test]
    fn test_rejects_non_base64_data_url() {
        assert!(decode_data_url("data:image/png,rawbytes").is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decode_data_url("!!!not base64!!!").is_err());
        let not_image = b64(b"just some text, definitely not an image");
        assert!(decode_data_url(&not_image).is_err());
    }
}
