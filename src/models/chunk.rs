use serde::{Deserialize, Serialize};

/// One row of the splitter output: a single chunk tagged with its document path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    #[serde(rename = "path")]
    pub source_path: String,
    #[serde(rename = "text")]
    pub chunk_text: String,
}

impl ChunkRecord {
    #[must_use]
    pub fn new(source_path: impl Into<String>, chunk_text: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            chunk_text: chunk_text.into(),
        }
    }
}

/// A chunk together with its byte offset in the text it was split from.
///
/// The offset is splitting metadata and is not carried into [`ChunkRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitChunk {
    pub start_index: usize,
    pub text: String,
}
