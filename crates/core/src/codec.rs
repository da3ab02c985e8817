//! Image payload encoding for the upload and edit paths.
//!
//! Converts a user-selected file into the base64 payload plus MIME type pair
//! the Gemini API expects, and strips the data-URL header back off when the
//! displayed result is re-submitted for editing.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{AppError, Result};

/// A user-supplied photo, held fully in memory.
///
/// Immutable once created; the state machine replaces it wholesale on a new
/// selection and clears it on reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedImage {
    /// Base64 body of the image, without any data-URL header.
    pub payload: String,
    /// Declared MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
}

impl UploadedImage {
    /// Whether the declared MIME type is an image type at all. The upload
    /// path silently ignores anything else.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Reads a file fully into memory and encodes it for upload.
///
/// # Errors
///
/// Returns [`AppError::ImageRead`] if the underlying read fails; the path
/// and OS error are kept as diagnostic detail.
pub fn encode_file(path: &Path) -> Result<UploadedImage> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::ImageRead(format!("{}: {}", path.display(), e)))?;
    Ok(encode_bytes(&bytes, &mime_from_path(path)))
}

/// Encodes raw bytes that already carry a declared MIME type
/// (e.g. a drag-and-drop payload delivered without a filesystem path).
pub fn encode_bytes(bytes: &[u8], mime_type: &str) -> UploadedImage {
    UploadedImage {
        payload: BASE64.encode(bytes),
        mime_type: mime_type.to_string(),
    }
}

/// Guesses a MIME type from the file extension.
pub fn mime_from_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Builds a displayable data-URL from a base64 payload.
pub fn to_data_url(payload: &str, mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, payload)
}

/// Strips the data-URL header, returning the raw base64 payload.
///
/// Only ever applied to URLs this application produced itself, so malformed
/// input is not guarded: a string without a comma comes back unchanged.
pub fn data_url_payload(data_url: &str) -> &str {
    data_url
        .split_once(',')
        .map(|(_, payload)| payload)
        .unwrap_or(data_url)
}

/// Decodes a base64 payload back into raw bytes, for display or saving.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(payload)
        .map_err(|e| AppError::image(format!("Invalid base64 payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn encode_bytes_produces_standard_base64() {
        let image = encode_bytes(b"hello", "image/png");
        assert_eq!(image.payload, "aGVsbG8=");
        assert_eq!(image.mime_type, "image/png");
        assert!(image.is_image());
    }

    #[test]
    fn non_image_mime_is_flagged() {
        let file = encode_bytes(b"plain text", "text/plain");
        assert!(!file.is_image());
    }

    #[test]
    fn mime_guessing_covers_common_extensions() {
        assert_eq!(mime_from_path(Path::new("me.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("me.png")), "image/png");
        assert_eq!(mime_from_path(Path::new("me.webp")), "image/webp");
        assert_eq!(mime_from_path(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(mime_from_path(Path::new("no_extension")), "application/octet-stream");
    }

    #[test]
    fn data_url_header_round_trip() {
        let url = to_data_url("abc123", "image/png");
        assert_eq!(url, "data:image/png;base64,abc123");
        assert_eq!(data_url_payload(&url), "abc123");
    }

    #[test]
    fn payload_decode_round_trip() {
        let image = encode_bytes(&[0x89, 0x50, 0x4e, 0x47], "image/png");
        assert_eq!(decode_payload(&image.payload).unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = encode_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AppError::ImageRead(_)));
        assert_eq!(err.to_string(), "Failed to read the image file.");
    }
}
