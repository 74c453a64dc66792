//! Uploaded file abstraction.
//!
//! [`UploadedFile`] is the in-memory handle a caller hands to a file field:
//! the original file name, the byte size, and the content. The file field
//! only inspects the name suffix and the size; content is carried through
//! untouched.

use std::fmt;

/// An uploaded binary resource.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadedFile {
    /// The file name as supplied by the client (e.g. `report.pdf`).
    pub name: String,
    /// The size of the content in bytes.
    pub size: u64,
    /// The raw file content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Creates an `UploadedFile` from a name and content, deriving the size.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Returns the lowercased extension of the file name, without the dot.
    ///
    /// Returns `None` when the name has no dot, or nothing after it.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext.to_lowercase())
        }
    }
}

impl fmt::Display for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_size() {
        let f = UploadedFile::new("test.txt", b"test".to_vec());
        assert_eq!(f.size, 4);
        assert_eq!(f.name, "test.txt");
    }

    #[test]
    fn test_extension_lowercased() {
        let f = UploadedFile::new("TEST.PDF", Vec::new());
        assert_eq!(f.extension(), Some("pdf".to_string()));
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(UploadedFile::new("noext", Vec::new()).extension(), None);
        assert_eq!(UploadedFile::new("trailing.", Vec::new()).extension(), None);
    }

    #[test]
    fn test_display() {
        let f = UploadedFile::new("a.txt", b"xy".to_vec());
        assert_eq!(f.to_string(), "a.txt (2 bytes)");
    }
}
