//! Upload validation.
//!
//! The service accepts the same images as the upload widget: JPEG, PNG
//! and TIFF files up to [`MAX_UPLOAD_SIZE`] bytes. The type is decided
//! from the file extension, as browsers do not always send a usable
//! content type.
//!
//! # Example
//!
//! ```rust
//! use waterseg::validation::{validate_upload, ImageFormat};
//!
//! let format = validate_upload(Some("lake.PNG"), 2048).unwrap();
//! assert_eq!(format, ImageFormat::Png);
//! assert!(validate_upload(Some("map.gif"), 10).is_err());
//! ```

use std::path::Path;

use crate::config::{ALLOWED_EXTENSIONS, MAX_UPLOAD_SIZE};
use crate::error::UploadError;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Tiff,
}

impl ImageFormat {
    /// Detect the format from a file name's extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "tiff" => Some(ImageFormat::Tiff),
            _ => None,
        }
    }

    /// MIME type used for the segmented response.
    pub fn media_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Tiff => "image/tiff",
        }
    }
}

/// Extension of `file_name`, lowercased, for error messages.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "none".to_string())
}

/// Check the declared name before reading the body.
pub fn validate_name(file_name: Option<&str>) -> Result<ImageFormat, UploadError> {
    let file_name = file_name.filter(|n| !n.is_empty()).ok_or(UploadError::MissingName)?;
    ImageFormat::from_file_name(file_name)
        .ok_or_else(|| UploadError::TypeNotAllowed(extension_of(file_name)))
}

/// Check the body size.
pub fn validate_size(size: u64) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if size > MAX_UPLOAD_SIZE {
        return Err(UploadError::TooLarge {
            size,
            max_mb: MAX_UPLOAD_SIZE / (1024 * 1024),
        });
    }
    Ok(())
}

/// Validate a complete upload.
pub fn validate_upload(file_name: Option<&str>, size: u64) -> Result<ImageFormat, UploadError> {
    let format = validate_name(file_name)?;
    validate_size(size)?;
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_extensions() {
        assert_eq!(ImageFormat::from_file_name("a.jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("a.JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("a.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_file_name("scan.tiff"), Some(ImageFormat::Tiff));
    }

    #[test]
    fn test_rejected_extensions() {
        assert_eq!(ImageFormat::from_file_name("map.gif"), None);
        assert_eq!(ImageFormat::from_file_name("noext"), None);
        assert_eq!(
            validate_name(Some("map.gif")),
            Err(UploadError::TypeNotAllowed("gif".into()))
        );
        assert_eq!(
            validate_name(Some("README")),
            Err(UploadError::TypeNotAllowed("none".into()))
        );
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(validate_name(None), Err(UploadError::MissingName));
        assert_eq!(validate_name(Some("")), Err(UploadError::MissingName));
    }

    #[test]
    fn test_size_bounds() {
        assert!(validate_size(1).is_ok());
        assert!(validate_size(MAX_UPLOAD_SIZE).is_ok());
        assert_eq!(validate_size(0), Err(UploadError::Empty));
        assert!(matches!(
            validate_size(MAX_UPLOAD_SIZE + 1),
            Err(UploadError::TooLarge { max_mb: 500, .. })
        ));
    }

    #[test]
    fn test_media_types() {
        assert_eq!(ImageFormat::Jpeg.media_type(), "image/jpeg");
        assert_eq!(ImageFormat::Tiff.media_type(), "image/tiff");
    }
}
