pub mod chunk;
pub mod document;

pub use chunk::{ChunkRecord, SplitChunk};
pub use document::{CleanedDocument, DocumentRecord, Fragment};
