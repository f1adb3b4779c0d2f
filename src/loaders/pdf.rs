// src/loaders/pdf.rs
use crate::utils::error::LoadError;
use lopdf::Document;

/// Extracts text page by page and joins the pages with '\n'.
/// Pages without extractable text (scanned images, blank pages) are skipped.
pub fn read_pdf(bytes: &[u8]) -> Result<String, LoadError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| LoadError::Parse(format!("Unreadable PDF: {}", e)))?;

    let pages = doc.get_pages();
    tracing::info!("PDF has {} pages", pages.len());

    let mut page_texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        let text = doc
            .extract_text(&[*page_number])
            .map_err(|e| LoadError::Parse(format!("Page {}: {}", page_number, e)))?;

        // lopdf terminates every text object with a newline
        let text = text.trim_end_matches(|c| c == '\n' || c == '\r');
        if text.trim().is_empty() {
            tracing::debug!("Page {} has no extractable text, skipping", page_number);
            continue;
        }
        page_texts.push(text.to_string());
    }

    Ok(page_texts.join("\n"))
}
