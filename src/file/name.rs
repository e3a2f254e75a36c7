//! Validated filenames.

use std::fmt;

use crate::{Result, ShelfError};

/// Maximum filename length in bytes (common filesystem limit).
pub const MAX_FILENAME_BYTES: usize = 255;

/// A filename that is safe to join onto the storage directory.
///
/// The storage directory is flat, so a valid name is a single path
/// component: not empty, not `.` or `..`, and free of `/`, `\` and NUL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName(String);

impl FileName {
    /// Validate an already-decoded filename.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let name = raw.into();

        if name.is_empty() {
            return Err(ShelfError::InvalidName("empty filename".to_string()));
        }
        if name == "." || name == ".." {
            return Err(ShelfError::InvalidName(name));
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(ShelfError::InvalidName(name));
        }
        if name.len() > MAX_FILENAME_BYTES {
            return Err(ShelfError::InvalidName(format!(
                "filename longer than {MAX_FILENAME_BYTES} bytes"
            )));
        }

        Ok(Self(name))
    }

    /// Validate the filename a client sent with a multipart upload.
    ///
    /// Browsers may send a full client-side path; only the last component
    /// is kept. A name carrying a `..` component anywhere is rejected
    /// outright rather than silently reduced.
    pub fn from_upload(client_name: &str) -> Result<Self> {
        if client_name.split(['/', '\\']).any(|part| part == "..") {
            return Err(ShelfError::InvalidName(client_name.to_string()));
        }
        let base = client_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(client_name);
        Self::parse(base)
    }

    /// The filename as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_names() {
        assert_eq!(FileName::parse("a.txt").unwrap().as_str(), "a.txt");
        assert_eq!(FileName::parse("my file.pdf").unwrap().as_str(), "my file.pdf");
        assert_eq!(FileName::parse(".hidden").unwrap().as_str(), ".hidden");
        assert_eq!(FileName::parse("日本語.txt").unwrap().as_str(), "日本語.txt");
        // Dots inside a single component stay inside the root
        assert!(FileName::parse("a..b.txt").is_ok());
    }

    #[test]
    fn test_parse_rejects_traversal() {
        assert!(FileName::parse("..").is_err());
        assert!(FileName::parse(".").is_err());
        assert!(FileName::parse("../secret").is_err());
        assert!(FileName::parse("..\\secret").is_err());
        assert!(FileName::parse("dir/file.txt").is_err());
        assert!(FileName::parse("/etc/passwd").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_and_nul() {
        assert!(matches!(FileName::parse(""), Err(ShelfError::InvalidName(_))));
        assert!(FileName::parse("a\0b").is_err());
    }

    #[test]
    fn test_parse_rejects_overlong() {
        let name = "x".repeat(MAX_FILENAME_BYTES + 1);
        assert!(FileName::parse(name).is_err());
        let name = "x".repeat(MAX_FILENAME_BYTES);
        assert!(FileName::parse(name).is_ok());
    }

    #[test]
    fn test_from_upload_keeps_base_name() {
        assert_eq!(FileName::from_upload("n.txt").unwrap().as_str(), "n.txt");
        assert_eq!(
            FileName::from_upload("C:\\Users\\me\\report.pdf").unwrap().as_str(),
            "report.pdf"
        );
        assert!(FileName::from_upload("../../etc/passwd").is_err());
        assert!(FileName::from_upload("..\\secret.txt").is_err());
        assert!(FileName::from_upload("uploads/..").is_err());
        assert!(FileName::from_upload("dir/").is_err());
    }
}
