use std::path::Path;

use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::error::{DocprepError, Result};

/// File looked up when a tokenizer name points at a directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Resolve a tokenizer by name.
///
/// `name` may be a `tokenizer.json` file, a directory holding one, or a Hugging Face
/// hub identifier such as `bert-base-uncased`.
pub fn resolve_tokenizer(name: &str) -> Result<Tokenizer> {
    let resolution_error = |detail: String| DocprepError::Resolution {
        name: name.to_string(),
        detail,
    };

    let path = Path::new(name);
    let tokenizer = if path.is_file() {
        debug!(path = %path.display(), "loading tokenizer file");
        Tokenizer::from_file(path).map_err(|e| resolution_error(e.to_string()))?
    } else if path.is_dir() {
        let file = path.join(TOKENIZER_FILE);
        if !file.is_file() {
            return Err(resolution_error(format!("no {TOKENIZER_FILE} in directory")));
        }
        debug!(path = %file.display(), "loading tokenizer file");
        Tokenizer::from_file(&file).map_err(|e| resolution_error(e.to_string()))?
    } else {
        info!(name, "fetching pretrained tokenizer");
        Tokenizer::from_pretrained(name, None).map_err(|e| resolution_error(e.to_string()))?
    };
    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::test_support::word_level_tokenizer as fixture_path;
    use tempfile::TempDir;

    #[test]
    fn resolves_tokenizer_file() {
        let tokenizer = resolve_tokenizer(&fixture_path()).unwrap();
        let enc = tokenizer.encode("the cat sat .", false).unwrap();
        assert_eq!(enc.len(), 4);
    }

    #[test]
    fn resolves_directory_with_tokenizer_json() {
        let tmp = TempDir::new().unwrap();
        std::fs::copy(fixture_path(), tmp.path().join(TOKENIZER_FILE)).unwrap();
        let name = tmp.path().to_string_lossy().into_owned();
        assert!(resolve_tokenizer(&name).is_ok());
    }

    #[test]
    fn directory_without_tokenizer_json_fails() {
        let tmp = TempDir::new().unwrap();
        let name = tmp.path().to_string_lossy().into_owned();
        let err = resolve_tokenizer(&name).unwrap_err();
        assert!(matches!(err, DocprepError::Resolution { .. }));
    }

    #[test]
    fn malformed_tokenizer_file_fails() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("broken.json");
        std::fs::write(&file, "{ not json").unwrap();
        let err = resolve_tokenizer(&file.to_string_lossy()).unwrap_err();
        match err {
            DocprepError::Resolution { name, .. } => assert!(name.ends_with("broken.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
