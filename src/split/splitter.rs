use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use text_splitter::{ChunkConfig, ChunkSizer, TextSplitter};
use tokenizers::Tokenizer;

use crate::config::chunk_overlap;
use crate::error::{DocprepError, Result};
use crate::models::SplitChunk;
use crate::split::tokenizer::resolve_tokenizer;

/// Token-bounded recursive splitter.
///
/// Text is cut at the largest boundary that keeps a chunk within `chunk_size`
/// tokens: runs of line breaks first, then sentences, words, graphemes and finally
/// characters. Consecutive chunks share up to `chunk_size / 10` tokens and chunk
/// edges are trimmed of whitespace.
///
/// A single unit that cannot be split further (one very long word measured by a
/// sub-word tokenizer, say) can still produce a chunk above the budget.
///
/// Read-only once built; a worker builds one and reuses it for all of its rows.
pub struct ChunkSplitter {
    splitter: TextSplitter<Tokenizer>,
    tokenizer: Tokenizer,
    chunk_size: usize,
}

impl std::fmt::Debug for ChunkSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkSplitter")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap())
            .finish_non_exhaustive()
    }
}

impl ChunkSplitter {
    /// Build a splitter measuring chunks with `tokenizer`.
    pub fn new(tokenizer: Tokenizer, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DocprepError::Config(
                "chunk_size must be a positive integer, got 0".into(),
            ));
        }
        let config = ChunkConfig::new(chunk_size)
            .with_sizer(tokenizer.clone())
            .with_trim(true)
            .with_overlap(chunk_overlap(chunk_size))
            .map_err(|e| DocprepError::Split(e.to_string()))?;
        Ok(Self {
            splitter: TextSplitter::new(config),
            tokenizer,
            chunk_size,
        })
    }

    /// Resolve `tokenizer_name` and build a splitter around it.
    pub fn from_name(tokenizer_name: &str, chunk_size: usize) -> Result<Self> {
        Self::new(resolve_tokenizer(tokenizer_name)?, chunk_size)
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub fn chunk_overlap(&self) -> usize {
        chunk_overlap(self.chunk_size)
    }

    /// Split text into chunks, left to right. Empty or blank text yields no chunks.
    pub fn split(&self, text: &str) -> Result<Vec<String>> {
        guarded(|| self.splitter.chunks(text).map(str::to_string).collect())
    }

    /// Like [`ChunkSplitter::split`], keeping each chunk's byte offset in `text`.
    pub fn split_with_offsets(&self, text: &str) -> Result<Vec<SplitChunk>> {
        guarded(|| {
            self.splitter
                .chunk_indices(text)
                .map(|(start_index, chunk)| SplitChunk {
                    start_index,
                    text: chunk.to_string(),
                })
                .collect()
        })
    }

    /// Number of tokens in `text`, measured the way the chunk budget is measured:
    /// padding is not counted and truncation overflow is.
    pub fn count_tokens(&self, text: &str) -> Result<usize> {
        guarded(|| self.tokenizer.size(text))
    }
}

/// Run a tokenizer-backed call. The text-splitter sizer panics when the tokenizer
/// cannot encode a piece of text; that becomes a [`DocprepError::Split`].
fn guarded<T>(f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        DocprepError::Split(format!("tokenizer failed: {}", panic_detail(&*payload)))
    })
}

fn panic_detail(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("panic without message")
}
