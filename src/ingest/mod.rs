pub mod cleaner;
pub mod loader;
pub mod partitioner;
pub mod scanner;

pub use cleaner::clean;
pub use loader::{load_and_clean, LoadOutput};
pub use partitioner::{Partitioner, PdfExtractPartitioner};
pub use scanner::Scanner;
