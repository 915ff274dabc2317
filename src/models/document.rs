use serde::{Deserialize, Serialize};

/// A document as read from storage, before extraction.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    /// Path of the source file.
    pub source_path: String,
    /// File content.
    pub raw_bytes: Vec<u8>,
}

impl DocumentRecord {
    #[must_use]
    pub fn new(source_path: impl Into<String>, raw_bytes: Vec<u8>) -> Self {
        Self {
            source_path: source_path.into(),
            raw_bytes,
        }
    }
}

/// A unit of text produced by PDF layout analysis, prior to cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    /// 1-based page the fragment was found on.
    pub page: u32,
}

impl Fragment {
    #[must_use]
    pub fn new(text: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            page,
        }
    }
}

/// One row of the loader output: a document's cleaned text.
///
/// Newlines only occur at fragment boundaries; each fragment itself is newline-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedDocument {
    #[serde(rename = "path")]
    pub source_path: String,
    pub text: String,
}

impl CleanedDocument {
    #[must_use]
    pub fn new(source_path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            text: text.into(),
        }
    }
}
