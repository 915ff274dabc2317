//! Loader and splitter stages composed over a whole source folder.

pub mod parallel;

use serde::Serialize;
use tokenizers::Tokenizer;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::ingest::loader::{load_and_clean, SkippedDocument};
use crate::ingest::partitioner::Partitioner;
use crate::models::{ChunkRecord, CleanedDocument};
use crate::split::{resolve_tokenizer, ChunkSplitter};

use parallel::map_partitions;

/// Totals for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Documents that reached the splitter.
    pub documents: usize,
    /// Documents dropped by the loader.
    pub skipped: usize,
    /// Output rows; always the sum of per-document chunk counts.
    pub chunks: usize,
}

/// Result of [`run`].
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub chunks: Vec<ChunkRecord>,
    pub skipped: Vec<SkippedDocument>,
    pub stats: RunStats,
}

/// One row per chunk, each tagged with the document path.
#[must_use]
pub fn explode(source_path: &str, chunks: Vec<String>) -> Vec<ChunkRecord> {
    chunks
        .into_iter()
        .map(|chunk| ChunkRecord::new(source_path, chunk))
        .collect()
}

/// Split cleaned documents into chunk rows.
///
/// Every partition builds its own [`ChunkSplitter`] from a clone of `tokenizer` and
/// reuses it for all of its documents.
pub fn split_documents(
    documents: Vec<CleanedDocument>,
    tokenizer: &Tokenizer,
    chunk_size: usize,
    partitions: usize,
) -> Result<Vec<ChunkRecord>> {
    map_partitions(
        documents,
        partitions,
        |_| ChunkSplitter::new(tokenizer.clone(), chunk_size),
        |splitter: &ChunkSplitter, doc: CleanedDocument| {
            let chunks = splitter
                .split(&doc.text)
                .inspect_err(|e| error!(path = %doc.source_path, "{e}"))?;
            Ok(explode(&doc.source_path, chunks))
        },
    )
}

/// Run the whole pipeline: validate, resolve the tokenizer, load, clean and split.
///
/// Configuration and tokenizer problems surface before any document is read.
pub fn run(config: &PipelineConfig, partitioner: &dyn Partitioner) -> Result<RunOutput> {
    let settings = config.validate_split()?;
    config.validate_source()?;
    let tokenizer = resolve_tokenizer(&settings.tokenizer_name)?;
    info!(
        tokenizer = %settings.tokenizer_name,
        chunk_size = settings.chunk_size,
        chunk_overlap = settings.chunk_overlap(),
        "tokenizer resolved"
    );

    let loaded = load_and_clean(config, partitioner)?;
    let documents = loaded.documents.len();
    let chunks = split_documents(
        loaded.documents,
        &tokenizer,
        settings.chunk_size,
        config.partitions,
    )?;

    let stats = RunStats {
        documents,
        skipped: loaded.skipped.len(),
        chunks: chunks.len(),
    };
    info!(
        documents = stats.documents,
        skipped = stats.skipped,
        chunks = stats.chunks,
        "pipeline finished"
    );
    Ok(RunOutput {
        chunks,
        skipped: loaded.skipped,
        stats,
    })
}
