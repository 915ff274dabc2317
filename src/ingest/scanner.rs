use std::path::{Path, PathBuf};

use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::debug;

use crate::config::DEFAULT_GLOB;
use crate::error::{DocprepError, Result};

/// A file selected for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
}

impl ScannedFile {
    /// Path as carried in output rows (forward slashes).
    #[must_use]
    pub fn source_path(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }
}

/// Recursive file scanner selecting files by name glob.
///
/// Hidden entries and entries starting with `_` are skipped, the same way
/// distributed storage readers skip their metadata files. Ignore files are not
/// consulted: the source folder is data, not a repository.
///
/// Symbolic links are not followed, so a linked file is skipped even when its name
/// matches the glob (logged at debug level).
pub struct Scanner {
    root: PathBuf,
    glob: String,
    /// Maximum file size in bytes (0 = unlimited).
    max_file_size_bytes: u64,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            glob: DEFAULT_GLOB.into(),
            max_file_size_bytes: 0,
        }
    }

    /// Select files whose name matches `glob` (case-sensitive).
    #[must_use]
    pub fn with_glob(mut self, glob: impl Into<String>) -> Self {
        self.glob = glob.into();
        self
    }

    /// Skip files larger than `max_size_mb` (0 = unlimited).
    #[must_use]
    pub fn with_max_file_size(mut self, max_size_mb: u32) -> Self {
        self.max_file_size_bytes = u64::from(max_size_mb) * 1024 * 1024;
        self
    }

    fn matcher(&self) -> Result<Override> {
        let base = if self.root.is_dir() {
            self.root.as_path()
        } else {
            self.root.parent().unwrap_or(Path::new(""))
        };
        let mut builder = OverrideBuilder::new(base);
        builder
            .add(&self.glob)
            .map_err(|e| DocprepError::Config(format!("invalid glob {:?}: {e}", self.glob)))?;
        builder
            .build()
            .map_err(|e| DocprepError::Config(format!("invalid glob {:?}: {e}", self.glob)))
    }

    /// Walk the root and return matching files, sorted by path.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.exists() {
            return Err(DocprepError::SourceNotFound {
                path: self.root.to_string_lossy().into(),
            });
        }
        let matcher = self.matcher()?;

        let mut entries: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .hidden(true)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .follow_links(false) // Prevent symlink loops
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('_'))
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|e| matcher.matched(e.path(), false).is_whitelist())
            .filter(|e| {
                if e.depth() > 0 && e.path_is_symlink() {
                    debug!(path = %e.path().display(), "skipping symbolic link");
                    return false;
                }
                e.file_type().is_some_and(|ft| ft.is_file())
            })
            .map(ignore::DirEntry::into_path)
            .collect();
        entries.sort();

        let max_size = self.max_file_size_bytes;
        let files: Vec<ScannedFile> = entries
            .par_iter()
            .filter_map(|path| {
                let size = path.metadata().ok()?.len();
                if max_size > 0 && size > max_size {
                    debug!(path = %path.display(), size, "skipping file over size limit");
                    return None;
                }
                Some(ScannedFile {
                    path: path.clone(),
                    size,
                })
            })
            .collect();

        debug!(root = %self.root.display(), glob = %self.glob, files = files.len(), "scan complete");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[ScannedFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn scanner_selects_pdfs_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("report.pdf"), "%PDF").unwrap();
        fs::write(tmp.path().join("notes.txt"), "text").unwrap();
        fs::write(tmp.path().join("pdf"), "no extension").unwrap();
        let files = Scanner::new(tmp.path()).scan().unwrap();
        assert_eq!(names(&files), vec!["report.pdf"]);
        assert_eq!(files[0].size, 4);
    }

    #[test]
    fn scanner_glob_is_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("UPPER.PDF"), "%PDF").unwrap();
        fs::write(tmp.path().join("lower.pdf"), "%PDF").unwrap();
        let files = Scanner::new(tmp.path()).scan().unwrap();
        assert_eq!(names(&files), vec!["lower.pdf"]);
    }

    #[test]
    fn scanner_recurses_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("year=2024").join("q1");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.pdf"), "%PDF").unwrap();
        fs::write(tmp.path().join("c.pdf"), "%PDF").unwrap();
        fs::write(tmp.path().join("a.pdf"), "%PDF").unwrap();
        let files = Scanner::new(tmp.path()).scan().unwrap();
        assert_eq!(files.len(), 3);
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn scanner_skips_hidden_and_underscore_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".hidden.pdf"), "%PDF").unwrap();
        fs::write(tmp.path().join("_SUCCESS.pdf"), "%PDF").unwrap();
        let meta = tmp.path().join("_temporary");
        fs::create_dir_all(&meta).unwrap();
        fs::write(meta.join("part.pdf"), "%PDF").unwrap();
        fs::write(tmp.path().join("kept.pdf"), "%PDF").unwrap();
        let files = Scanner::new(tmp.path()).scan().unwrap();
        assert_eq!(names(&files), vec!["kept.pdf"]);
    }

    #[test]
    fn scanner_ignores_gitignore() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".gitignore"), "*.pdf").unwrap();
        fs::write(tmp.path().join("data.pdf"), "%PDF").unwrap();
        let files = Scanner::new(tmp.path()).scan().unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn scanner_custom_glob() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.pdf"), "%PDF").unwrap();
        fs::write(tmp.path().join("b.txt"), "plain").unwrap();
        let files = Scanner::new(tmp.path()).with_glob("*.txt").scan().unwrap();
        assert_eq!(names(&files), vec!["b.txt"]);
    }

    #[test]
    fn scanner_skips_large_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("large.pdf"), "x".repeat(2000)).unwrap();
        fs::write(tmp.path().join("small.pdf"), "%PDF").unwrap();
        let scanner = Scanner {
            root: tmp.path().to_path_buf(),
            glob: DEFAULT_GLOB.into(),
            max_file_size_bytes: 1000,
        };
        let files = scanner.scan().unwrap();
        assert_eq!(names(&files), vec!["small.pdf"]);
    }

    #[test]
    fn with_max_file_size_converts_megabytes() {
        let scanner = Scanner::new("/tmp").with_max_file_size(10);
        assert_eq!(scanner.max_file_size_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn missing_root_is_reported() {
        let tmp = TempDir::new().unwrap();
        let err = Scanner::new(tmp.path().join("absent")).scan().unwrap_err();
        assert!(matches!(err, DocprepError::SourceNotFound { .. }));
    }

    #[test]
    fn invalid_glob_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let err = Scanner::new(tmp.path()).with_glob("[").scan().unwrap_err();
        assert!(matches!(err, DocprepError::Config(_)));
    }

    #[test]
    fn single_file_root() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("only.pdf");
        fs::write(&file, "%PDF").unwrap();
        let files = Scanner::new(&file).scan().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, file);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_not_followed() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("linked.pdf");
        fs::write(&target, "%PDF").unwrap();
        fs::write(tmp.path().join("real.pdf"), "%PDF").unwrap();
        std::os::unix::fs::symlink(&target, tmp.path().join("linked.pdf")).unwrap();

        let files = Scanner::new(tmp.path()).scan().unwrap();
        assert_eq!(names(&files), vec!["real.pdf"]);
    }
}
