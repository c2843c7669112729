//! Plain-text extraction from uploaded files.
//!
//! [`FileExtractor`] reads text files directly and, with the `pdf` feature, pulls the text
//! layer out of PDFs. Office formats and images are recognized so they can be reported as
//! unsupported instead of unknown.

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{RagError, Result};

/// The kind of a document file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Plain text.
    Text,
    /// Portable Document Format.
    Pdf,
    /// Word 2007+ document.
    Docx,
    /// Legacy Word document.
    Doc,
    /// PowerPoint 2007+ slide deck.
    Pptx,
    /// Raster image that would need OCR.
    Image,
}

impl FileKind {
    /// Classify `path` by its lowercase extension.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Extraction`] for a missing or unrecognized extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "txt" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "doc" => Ok(Self::Doc),
            "pptx" => Ok(Self::Pptx),
            "png" | "jpg" | "jpeg" | "tiff" | "bmp" | "webp" => Ok(Self::Image),
            _ => Err(RagError::extraction(
                path,
                "unsupported file type; supported: TXT, PDF, DOCX, DOC, PPTX, PNG, JPG, JPEG, \
                 TIFF, BMP, WEBP",
            )),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Doc => "DOC",
            Self::Pptx => "PPTX",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// Maps a stored file to plain text.
pub trait DocumentExtractor: Send + Sync {
    /// Extract the text of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Extraction`] if the type is unsupported or the file has no text.
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Extracts text from `.txt` files and, with the `pdf` feature, text-based PDFs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl FileExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let kind = FileKind::from_path(path)?;
        debug!(path = %path.display(), %kind, "extracting document text");

        let text = match kind {
            FileKind::Text => read_text(path)?,
            FileKind::Pdf => read_pdf(path)?,
            FileKind::Docx | FileKind::Doc | FileKind::Pptx | FileKind::Image => {
                return Err(RagError::extraction(
                    path,
                    format!("{kind} files are not supported by this extractor"),
                ));
            }
        };

        if text.trim().is_empty() {
            return Err(RagError::extraction(path, "no extractable text"));
        }
        info!(path = %path.display(), %kind, text_len = text.len(), "extracted document text");
        Ok(text)
    }
}

/// Read a text file, dropping invalid UTF-8 sequences.
fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| RagError::extraction(path, e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).replace(char::REPLACEMENT_CHARACTER, ""))
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> Result<String> {
    let document =
        lopdf::Document::load(path).map_err(|e| RagError::extraction(path, e.to_string()))?;
    let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let pages: Vec<String> = page_numbers
        .iter()
        .filter_map(|page| document.extract_text(&[*page]).ok())
        .filter(|text| !text.trim().is_empty())
        .collect();
    Ok(pages.join("\n").trim().to_string())
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(path: &Path) -> Result<String> {
    Err(RagError::extraction(path, "PDF support requires the `pdf` feature"))
}
