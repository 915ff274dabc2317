use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocprepError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("source folder not found: {path}")]
    SourceNotFound { path: String },

    #[error("extraction error in {path}: {detail}")]
    Extraction { path: String, detail: String },

    #[error("cannot resolve tokenizer {name}: {detail}")]
    Resolution { name: String, detail: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("splitter error: {0}")]
    Split(String),
}

pub type Result<T> = std::result::Result<T, DocprepError>;
