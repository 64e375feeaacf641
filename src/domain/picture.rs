//! Uploaded profile picture, as received from the account form.

use std::path::Path;

use crate::config::ALLOWED_PICTURE_EXTENSIONS;

/// Raw upload consumed by picture ingestion.
#[derive(Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    /// Client-supplied file name; only its extension is kept.
    pub filename: String,
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedImage {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }

    /// Extension of the original file name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
    }

    /// Whether the extension is one the account form accepts.
    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .map(|ext| {
                ALLOWED_PICTURE_EXTENSIONS
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(UploadedImage::new(vec![], "me.png").extension(), Some("png"));
        assert_eq!(UploadedImage::new(vec![], "holiday.photo.JPG").extension(), Some("JPG"));
        assert_eq!(UploadedImage::new(vec![], "README").extension(), None);
        assert_eq!(UploadedImage::new(vec![], "trailing.").extension(), None);
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(UploadedImage::new(vec![], "a.jpg").has_allowed_extension());
        assert!(UploadedImage::new(vec![], "a.PNG").has_allowed_extension());
        assert!(!UploadedImage::new(vec![], "a.gif").has_allowed_extension());
        assert!(!UploadedImage::new(vec![], "a.jpeg").has_allowed_extension());
        assert!(!UploadedImage::new(vec![], "noext").has_allowed_extension());
    }
}
