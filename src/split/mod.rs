pub mod splitter;
pub mod tokenizer;

pub use splitter::ChunkSplitter;
pub use tokenizer::resolve_tokenizer;
