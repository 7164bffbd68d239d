//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Number of pages.
    pub page_count: u32,
    /// Extracted text of all pages.
    pub text: String,
}

impl PdfContent {
    /// Whether enough text was found for the document to be a text PDF
    /// rather than a scan.
    pub fn has_text(&self, min_text_length: usize) -> bool {
        self.text.trim().chars().count() >= min_text_length
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Extract text and page count from the loaded document.
    pub fn extract_all(&self) -> Result<PdfContent> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let text = self.extract_text()?;
        debug!("PDF text: {} pages, {} chars", page_count, text.len());

        Ok(PdfContent { page_count, text })
    }

    fn decrypt(doc: &mut Document, password: Option<&str>) -> Result<()> {
        match password {
            Some(password) => doc.decrypt(password).map_err(|e| {
                debug!("Decryption failed: {}", e);
                PdfError::WrongPassword
            }),
            None => doc.decrypt("").map_err(|e| {
                debug!("Empty password rejected: {}", e);
                PdfError::PasswordRequired
            }),
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8], password: Option<&str>) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            Self::decrypt(&mut doc, password)?;
            debug!("Decrypted PDF");

            // pdf-extract reads bytes, so keep a decrypted copy
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(matches!(extractor.extract_all(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_garbage() {
        let mut extractor = PdfExtractor::new();
        let result = extractor.load(b"not a pdf", None);
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_content_has_text() {
        let content = PdfContent {
            page_count: 1,
            text: "  Transaction Statement  ".to_string(),
        };
        assert!(content.has_text(20));
        assert!(!content.has_text(30));
    }
}
