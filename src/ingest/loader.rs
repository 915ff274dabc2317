use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{FailurePolicy, PipelineConfig};
use crate::error::{DocprepError, Result};
use crate::ingest::cleaner::clean_and_join;
use crate::ingest::partitioner::Partitioner;
use crate::ingest::scanner::{ScannedFile, Scanner};
use crate::models::{CleanedDocument, DocumentRecord};
use crate::pipeline::parallel::map_partitions;

/// A document dropped under [`FailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub path: String,
    pub reason: String,
}

/// Loader output: one cleaned document per readable source file.
#[derive(Debug, Clone, Default)]
pub struct LoadOutput {
    pub documents: Vec<CleanedDocument>,
    pub skipped: Vec<SkippedDocument>,
}

enum Loaded {
    Document(CleanedDocument),
    Skipped(SkippedDocument),
}

/// Extract, clean and join one document's fragments.
pub fn parse_and_clean(
    record: &DocumentRecord,
    partitioner: &dyn Partitioner,
) -> Result<CleanedDocument> {
    let fragments =
        partitioner
            .partition(&record.raw_bytes)
            .map_err(|detail| DocprepError::Extraction {
                path: record.source_path.clone(),
                detail,
            })?;
    debug!(
        path = %record.source_path,
        fragments = fragments.len(),
        partitioner = partitioner.name(),
        "partitioned document"
    );
    let text = clean_and_join(fragments.iter().map(|f| f.text.as_str()));
    Ok(CleanedDocument::new(record.source_path.clone(), text))
}

fn read_and_clean(file: &ScannedFile, partitioner: &dyn Partitioner) -> Result<CleanedDocument> {
    let raw_bytes = std::fs::read(&file.path)?;
    parse_and_clean(&DocumentRecord::new(file.source_path(), raw_bytes), partitioner)
}

/// Load every matching file under the configured source folder and clean it.
///
/// Files are read and parsed in parallel partitions. Output follows path order.
pub fn load_and_clean(config: &PipelineConfig, partitioner: &dyn Partitioner) -> Result<LoadOutput> {
    let source = config.validate_source()?;
    let files = Scanner::new(&source)
        .with_glob(config.glob.clone())
        .with_max_file_size(config.max_file_size_mb)
        .scan()?;
    info!(source = %source.display(), files = files.len(), "loading documents");

    let policy = config.on_error;
    let loaded = map_partitions(
        files,
        config.partitions,
        |_| Ok(()),
        |_: &(), file: ScannedFile| match read_and_clean(&file, partitioner) {
            Ok(doc) => Ok(vec![Loaded::Document(doc)]),
            Err(e) if policy == FailurePolicy::Skip => {
                warn!(path = %file.path.display(), error = %e, "skipping document");
                Ok(vec![Loaded::Skipped(SkippedDocument {
                    path: file.source_path(),
                    reason: e.to_string(),
                })])
            }
            Err(e) => Err(e),
        },
    )?;

    let mut output = LoadOutput::default();
    for item in loaded {
        match item {
            Loaded::Document(doc) => output.documents.push(doc),
            Loaded::Skipped(skip) => output.skipped.push(skip),
        }
    }
    info!(
        documents = output.documents.len(),
        skipped = output.skipped.len(),
        "documents loaded"
    );
    Ok(output)
}
