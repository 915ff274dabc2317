use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocprepError, Result};

/// Config filename looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "docprep.toml";
/// File-name filter applied by the scanner.
pub const DEFAULT_GLOB: &str = "*.pdf";
/// Number of row partitions for the parallel map.
pub const DEFAULT_PARTITIONS: usize = 20;

/// What to do when a single document fails to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Propagate the first per-document failure and abort the run.
    #[default]
    Abort,
    /// Log the failure, drop the document and keep going.
    Skip,
}

/// Serialization of the output table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One compact JSON object per row.
    #[default]
    Jsonl,
    /// One compact JSON array.
    Json,
    /// Indented JSON array.
    Pretty,
}

/// Output-related settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Destination file; stdout when absent.
    pub path: Option<PathBuf>,
}

/// Pipeline configuration, usually read from `docprep.toml` and patched by CLI flags.
///
/// The three required values are kept optional here so that a missing value can be
/// reported by [`PipelineConfig::validate_split`] instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Folder holding the documents to ingest.
    pub source_folder: Option<String>,
    /// Tokenizer used to measure chunk length: a `tokenizer.json` path or a hub identifier.
    pub hf_tokenizer_name: Option<String>,
    /// Maximum tokens per chunk. Signed so that non-positive input can be rejected.
    pub chunk_size: Option<i64>,
    /// Glob matched against file names.
    pub glob: String,
    /// Number of partitions rows are spread across.
    pub partitions: usize,
    /// Per-document failure handling.
    pub on_error: FailurePolicy,
    /// Maximum file size in MB (0 = unlimited).
    pub max_file_size_mb: u32,
    pub output: OutputSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_folder: None,
            hf_tokenizer_name: None,
            chunk_size: None,
            glob: DEFAULT_GLOB.into(),
            partitions: DEFAULT_PARTITIONS,
            on_error: FailurePolicy::Abort,
            max_file_size_mb: 0,
            output: OutputSettings::default(),
        }
    }
}

/// Validated splitting parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSettings {
    pub tokenizer_name: String,
    pub chunk_size: usize,
}

impl SplitSettings {
    /// Tokens shared by consecutive chunks: a tenth of the chunk size, truncated.
    #[must_use]
    pub fn chunk_overlap(&self) -> usize {
        chunk_overlap(self.chunk_size)
    }
}

/// Overlap derived from a chunk size.
#[must_use]
pub fn chunk_overlap(chunk_size: usize) -> usize {
    chunk_size / 10
}

impl PipelineConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `docprep.toml` in `dir` is used when
    /// present and defaults otherwise.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = dir.join(CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DocprepError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| DocprepError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DocprepError::Config(format!("invalid config: {e}")))
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DocprepError::Config(format!("failed to serialize config: {e}")))
    }

    /// Check the settings every stage needs and return the source folder.
    pub fn validate_source(&self) -> Result<PathBuf> {
        let folder = self
            .source_folder
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DocprepError::Config("source_folder is required".into()))?;
        if self.partitions == 0 {
            return Err(DocprepError::Config("partitions must be at least 1".into()));
        }
        if self.glob.trim().is_empty() {
            return Err(DocprepError::Config("glob must not be empty".into()));
        }
        Ok(PathBuf::from(folder))
    }

    /// Check everything the splitting stage needs, before any document is read.
    pub fn validate_split(&self) -> Result<SplitSettings> {
        let tokenizer_name = self
            .hf_tokenizer_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DocprepError::Config("hf_tokenizer_name is required".into()))?
            .to_string();
        let raw = self
            .chunk_size
            .ok_or_else(|| DocprepError::Config("chunk_size is required".into()))?;
        let chunk_size = usize::try_from(raw)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                DocprepError::Config(format!("chunk_size must be a positive integer, got {raw}"))
            })?;
        Ok(SplitSettings {
            tokenizer_name,
            chunk_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete() -> PipelineConfig {
        PipelineConfig {
            source_folder: Some("/data/pdfs".into()),
            hf_tokenizer_name: Some("bert-base-uncased".into()),
            chunk_size: Some(500),
            ..Default::default()
        }
    }

    #[test]
    fn default_settings() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.glob, "*.pdf");
        assert_eq!(cfg.partitions, 20);
        assert_eq!(cfg.on_error, FailurePolicy::Abort);
        assert_eq!(cfg.max_file_size_mb, 0);
        assert_eq!(cfg.output.format, OutputFormat::Jsonl);
        assert!(cfg.output.path.is_none());
        assert!(cfg.source_folder.is_none());
    }

    #[test]
    fn overlap_is_a_truncated_tenth() {
        assert_eq!(chunk_overlap(500), 50);
        assert_eq!(chunk_overlap(256), 25);
        assert_eq!(chunk_overlap(9), 0);
        assert_eq!(chunk_overlap(1), 0);
    }

    #[test]
    fn validate_split_accepts_complete_config() {
        let settings = complete().validate_split().unwrap();
        assert_eq!(settings.tokenizer_name, "bert-base-uncased");
        assert_eq!(settings.chunk_size, 500);
        assert_eq!(settings.chunk_overlap(), 50);
    }

    #[test]
    fn validate_split_rejects_non_positive_chunk_size() {
        for bad in [0, -1, -500] {
            let mut cfg = complete();
            cfg.chunk_size = Some(bad);
            let err = cfg.validate_split().unwrap_err();
            assert!(matches!(err, DocprepError::Config(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn validate_split_rejects_missing_values() {
        let mut cfg = complete();
        cfg.chunk_size = None;
        assert!(cfg.validate_split().unwrap_err().to_string().contains("chunk_size"));

        let mut cfg = complete();
        cfg.hf_tokenizer_name = Some("   ".into());
        assert!(cfg
            .validate_split()
            .unwrap_err()
            .to_string()
            .contains("hf_tokenizer_name"));
    }

    #[test]
    fn validate_source_requires_folder_and_partitions() {
        let mut cfg = complete();
        assert_eq!(cfg.validate_source().unwrap(), PathBuf::from("/data/pdfs"));

        cfg.partitions = 0;
        assert!(cfg.validate_source().is_err());

        cfg = complete();
        cfg.source_folder = None;
        assert!(cfg.validate_source().unwrap_err().to_string().contains("source_folder"));
    }

    #[test]
    fn parse_toml() {
        let cfg = PipelineConfig::from_toml_str(
            r#"
source_folder = "/mnt/raw"
hf_tokenizer_name = "intfloat/e5-large-v2"
chunk_size = 400
on_error = "skip"

[output]
format = "pretty"
path = "chunks.json"
"#,
        )
        .unwrap();
        assert_eq!(cfg.source_folder.as_deref(), Some("/mnt/raw"));
        assert_eq!(cfg.chunk_size, Some(400));
        assert_eq!(cfg.on_error, FailurePolicy::Skip);
        assert_eq!(cfg.output.format, OutputFormat::Pretty);
        assert_eq!(cfg.output.path, Some(PathBuf::from("chunks.json")));
        // Unset values keep their defaults
        assert_eq!(cfg.partitions, DEFAULT_PARTITIONS);
        assert_eq!(cfg.glob, DEFAULT_GLOB);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = PipelineConfig::from_toml_str("chunk_size = {{{").unwrap_err();
        assert!(matches!(err, DocprepError::Config(_)));
    }

    #[test]
    fn load_uses_default_file_when_present() {
        let tmp = TempDir::new().unwrap();
        let cfg = PipelineConfig::load(None, tmp.path()).unwrap();
        assert!(cfg.chunk_size.is_none());

        std::fs::write(tmp.path().join(CONFIG_FILE), "chunk_size = 128\n").unwrap();
        let cfg = PipelineConfig::load(None, tmp.path()).unwrap();
        assert_eq!(cfg.chunk_size, Some(128));
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = PipelineConfig::load(Some(&missing), tmp.path()).unwrap_err();
        assert!(matches!(err, DocprepError::Config(_)));
    }

    #[test]
    fn toml_roundtrip_keeps_settings() {
        let mut cfg = complete();
        cfg.on_error = FailurePolicy::Skip;
        cfg.partitions = 4;
        let text = cfg.to_toml_string().unwrap();
        let back = PipelineConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.partitions, 4);
        assert_eq!(back.on_error, FailurePolicy::Skip);
        assert_eq!(back.chunk_size, Some(500));
    }
}
