use std::panic::{self, AssertUnwindSafe};

use crate::models::Fragment;

/// Turns raw document bytes into an ordered sequence of text fragments.
///
/// Implementations are shared across worker threads and must not keep per-call state.
pub trait Partitioner: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Extract fragments in reading order. The error is a human-readable reason.
    fn partition(&self, bytes: &[u8]) -> std::result::Result<Vec<Fragment>, String>;
}

/// Partitioner backed by `pdf-extract`.
///
/// Pages are separated at form feeds and each page is cut into blocks at blank
/// lines. A block keeps its internal line breaks.
pub struct PdfExtractPartitioner;

impl Default for PdfExtractPartitioner {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractPartitioner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Partitioner for PdfExtractPartitioner {
    fn name(&self) -> &str {
        "pdf-extract"
    }

    fn partition(&self, bytes: &[u8]) -> std::result::Result<Vec<Fragment>, String> {
        // pdf-extract panics on some malformed inputs instead of returning an error
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }))
        .map_err(|_| "PDF extractor panicked on malformed input".to_string())?;
        let text = extracted.map_err(|e| format!("PDF extraction error: {e}"))?;
        Ok(fragments_from_text(&text))
    }
}

/// Split extracted text into fragments: pages at form feeds, blocks at blank lines.
#[must_use]
pub fn fragments_from_text(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for (i, page) in text.split('\x0C').enumerate() {
        let page_num = u32::try_from(i + 1).unwrap_or(u32::MAX);
        let mut block: Vec<&str> = Vec::new();
        for line in page.lines() {
            if line.trim().is_empty() {
                if !block.is_empty() {
                    fragments.push(Fragment::new(block.join("\n"), page_num));
                    block.clear();
                }
            } else {
                block.push(line);
            }
        }
        if !block.is_empty() {
            fragments.push(Fragment::new(block.join("\n"), page_num));
        }
    }
    fragments
}
