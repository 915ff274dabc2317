use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{FailurePolicy, OutputFormat, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "docprep",
    version,
    about = "Load PDFs, clean their text and split it into token-bounded chunks",
    after_help = "Settings are read from ./docprep.toml (or --config FILE); flags override them. \
                  Output rows go to stdout unless --output is given, logs go to stderr \
                  (RUST_LOG controls the filter)."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Config file (default: ./docprep.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where documents come from.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Folder containing the documents (overrides `source_folder`)
    pub source_folder: Option<String>,

    /// File-name glob (default: *.pdf)
    #[arg(long)]
    pub glob: Option<String>,

    /// Number of parallel partitions (default: 20)
    #[arg(long)]
    pub partitions: Option<usize>,

    /// Skip documents that fail to extract instead of aborting
    #[arg(long)]
    pub skip_failed: bool,

    /// Skip files larger than this many MB (0 = unlimited)
    #[arg(long)]
    pub max_file_size_mb: Option<u32>,
}

impl SourceArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(folder) = &self.source_folder {
            config.source_folder = Some(folder.clone());
        }
        if let Some(glob) = &self.glob {
            config.glob.clone_from(glob);
        }
        if let Some(n) = self.partitions {
            config.partitions = n;
        }
        if self.skip_failed {
            config.on_error = FailurePolicy::Skip;
        }
        if let Some(mb) = self.max_file_size_mb {
            config.max_file_size_mb = mb;
        }
    }
}

/// Where rows go.
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Row serialization
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write rows to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(path) = &self.output {
            config.output.path = Some(path.clone());
        }
    }
}

/// Tokenizer and chunk budget.
#[derive(Args, Debug, Default)]
pub struct SplitArgs {
    /// Tokenizer: tokenizer.json path, directory, or hub identifier (overrides `hf_tokenizer_name`)
    #[arg(short, long)]
    pub tokenizer: Option<String>,

    /// Maximum tokens per chunk; overlap is a tenth of it (overrides `chunk_size`)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub chunk_size: Option<i64>,
}

impl SplitArgs {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(name) = &self.tokenizer {
            config.hf_tokenizer_name = Some(name.clone());
        }
        if let Some(n) = self.chunk_size {
            config.chunk_size = Some(n);
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a piece of text (argument or stdin): drop newlines, join " ." into "."
    Clean {
        /// Text to clean; read from stdin when omitted
        text: Option<String>,
    },

    /// Extract and clean every document: one {path, text} row per document
    Load {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Full pipeline: load, clean and split into one {path, text} row per chunk
    Split {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        split: SplitArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        split: SplitArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}
