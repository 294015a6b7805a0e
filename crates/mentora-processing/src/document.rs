//! Document text extraction.
//!
//! PDFs are staged through a temp file (removed on drop) and run through
//! `pdf-extract`; the resulting text is split into ordered units, one per
//! page, with oversized pages re-chunked.

use std::io::Write;

use text_splitter::{ChunkConfig, TextSplitter};
use thiserror::Error;

const MAX_UNIT_CHARS: usize = 4000;

/// One ordered page/chunk of extracted document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document data is empty")]
    Empty,

    #[error("Document is not a PDF")]
    NotPdf,

    #[error("Failed to stage document: {0}")]
    Staging(#[from] std::io::Error),

    #[error("PDF text extraction failed: {0}")]
    Extraction(String),
}

/// Extracts ordered text units from a binary document.
pub trait DocumentExtractor: Send + Sync {
    fn extract_units(&self, data: &[u8]) -> Result<Vec<TextUnit>, DocumentError>;
}

/// `pdf-extract`-backed extractor.
pub struct PdfExtractor {
    max_unit_chars: usize,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            max_unit_chars: MAX_UNIT_CHARS,
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract_units(&self, data: &[u8]) -> Result<Vec<TextUnit>, DocumentError> {
        if data.is_empty() {
            return Err(DocumentError::Empty);
        }
        if data.len() < 4 || &data[0..4] != b"%PDF" {
            return Err(DocumentError::NotPdf);
        }

        let mut temp = tempfile::NamedTempFile::new()?;
        temp.write_all(data)?;
        temp.flush()?;

        let text = pdf_extract::extract_text(temp.path())
            .map_err(|e| DocumentError::Extraction(e.to_string()))?;

        let units = split_into_units(&text, self.max_unit_chars);
        tracing::debug!(
            text_len = text.len(),
            unit_count = units.len(),
            "PDF text extracted"
        );

        Ok(units)
    }
}

/// Split extracted text into ordered units: one per form-feed-separated page,
/// re-chunking any page longer than `max_unit_chars`.
pub fn split_into_units(text: &str, max_unit_chars: usize) -> Vec<TextUnit> {
    let splitter = TextSplitter::new(ChunkConfig::new(max_unit_chars));
    let mut units = Vec::new();

    for page in text.split('\u{0C}') {
        let page = page.trim();
        if page.is_empty() {
            continue;
        }
        if page.len() <= max_unit_chars {
            units.push(page.to_string());
        } else {
            units.extend(splitter.chunks(page).map(|chunk| chunk.to_string()));
        }
    }

    units
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextUnit { index, text })
        .collect()
}
