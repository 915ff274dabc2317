use std::fs::File;
use std::io::{self, BufWriter, Write};

use serde::Serialize;

use crate::config::{OutputFormat, OutputSettings};
use crate::error::Result;

/// Serialize rows in the requested format.
pub fn render_rows<T: Serialize>(rows: &[T], format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for row in rows {
                out.push_str(&serde_json::to_string(row)?);
                out.push('\n');
            }
            out
        }
        OutputFormat::Json => serde_json::to_string(rows)? + "\n",
        OutputFormat::Pretty => serde_json::to_string_pretty(rows)? + "\n",
    };
    Ok(text)
}

/// Write rows to the configured file, or stdout.
pub fn write_rows<T: Serialize>(rows: &[T], settings: &OutputSettings) -> Result<()> {
    let rendered = render_rows(rows, settings.format)?;
    match &settings.path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(rendered.as_bytes())?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Format an error as a one-line JSON object.
pub fn format_error(err: &dyn std::fmt::Display) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}
