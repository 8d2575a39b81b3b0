//! Image payload preparation

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image data is required")]
    Missing,

    #[error("Image data is not valid base64: {0}")]
    InvalidBase64(String),
}

/// Strip an optional `data:<mime>;base64,` prefix and validate the payload
///
/// Returns the bare base64 string that providers expect.
pub fn prepare_image(raw: &str) -> Result<&str, ImageError> {
    let trimmed = raw.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => trimmed,
    }
    .trim();

    if payload.is_empty() {
        return Err(ImageError::Missing);
    }

    STANDARD
        .decode(payload)
        .map_err(|e| ImageError::InvalidBase64(e.to_string()))?;

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_base64_passes_through() {
        assert_eq!(prepare_image("aGVsbG8=").unwrap(), "aGVsbG8=");
    }

    #[test]
    fn test_data_url_prefix_stripped() {
        assert_eq!(
            prepare_image("data:image/jpeg;base64,aGVsbG8=").unwrap(),
            "aGVsbG8="
        );
    }

    #[test]
    fn test_empty_or_prefix_only_is_missing() {
        assert_eq!(prepare_image(""), Err(ImageError::Missing));
        assert_eq!(prepare_image("   "), Err(ImageError::Missing));
        assert_eq!(prepare_image("data:image/png;base64,"), Err(ImageError::Missing));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            prepare_image("not base64 at all!"),
            Err(ImageError::InvalidBase64(_))
        ));
    }
}
