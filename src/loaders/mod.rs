// src/loaders/mod.rs
pub mod docx;
pub mod pdf;
pub mod text;

use crate::utils::error::LoadError;
use std::fmt;
use std::path::Path;

/// Input document formats, resolved once from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    WordDocument,
}

impl DocumentFormat {
    /// Resolves an extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Result<Self, LoadError> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::PlainText),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::WordDocument),
            _ => Err(LoadError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Resolves the format from the text after the last '.' of the file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match file_name.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Err(LoadError::UnsupportedFormat(file_name)),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Pdf => "pdf",
            Self::WordDocument => "docx",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PlainText => "plain text",
            Self::Pdf => "PDF",
            Self::WordDocument => "Word document",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Turns raw document bytes into newline-joined text.
pub fn load(bytes: Vec<u8>, format: DocumentFormat) -> Result<String, LoadError> {
    tracing::debug!("Loading {} bytes as {}", bytes.len(), format);
    let text = match format {
        DocumentFormat::PlainText => text::read_text(bytes)?,
        DocumentFormat::Pdf => pdf::read_pdf(&bytes)?,
        DocumentFormat::WordDocument => docx::read_docx(&bytes)?,
    };
    tracing::debug!("Loaded {} characters of text", text.chars().count());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert_eq!(DocumentFormat::from_path("catalog.txt").unwrap(), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::from_path("dir/specs.pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_path("list.v2.docx").unwrap(), DocumentFormat::WordDocument);
        assert_eq!(DocumentFormat::from_path("LOUD.PDF").unwrap(), DocumentFormat::Pdf);
    }

    #[test]
    fn test_unsupported_extensions() {
        match DocumentFormat::from_path("prices.csv") {
            Err(LoadError::UnsupportedFormat(ext)) => assert_eq!(ext, "csv"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
        match DocumentFormat::from_path("README") {
            Err(LoadError::UnsupportedFormat(name)) => assert_eq!(name, "README"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
        assert!(DocumentFormat::from_extension("doc").is_err());
    }

    #[test]
    fn test_load_dispatches_plain_text() {
        let text = load(b"Dell i5\n".to_vec(), DocumentFormat::PlainText).unwrap();
        assert_eq!(text, "Dell i5\n");
    }

    #[test]
    fn test_format_labels() {
        assert_eq!(DocumentFormat::WordDocument.to_string(), "Word document");
        assert_eq!(DocumentFormat::Pdf.extension(), "pdf");
    }
}
