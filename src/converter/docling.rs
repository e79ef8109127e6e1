//! [`DocumentConverter`] backed by the `docling` command-line tool.
//!
//! One invocation exports the document three ways into a scratch directory:
//!
//! ```text
//! docling [extra args] <input> --to json --to md --to text --output <scratch>
//!   ├─ <stem>.txt   → ConvertedDocument::text
//!   ├─ <stem>.md    → ConvertedDocument::markdown
//!   └─ <stem>.json  → pages, texts, tables, title
//! ```
//!
//! The JSON export is a serialised DoclingDocument. Only the handful of
//! members the gateway reports are read; everything else is ignored, and any
//! member that is missing stays `None`.

use super::{ConvertedDocument, DocumentConverter, TableElement, TableRow, TextElement};
use crate::error::ConvertError;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Runs the `docling` executable for each conversion.
#[derive(Debug, Clone)]
pub struct DoclingCli {
    program: OsString,
    args: Vec<OsString>,
}

impl Default for DoclingCli {
    fn default() -> Self {
        Self {
            program: OsString::from("docling"),
            args: Vec::new(),
        }
    }
}

impl DoclingCli {
    /// `docling` from `PATH`, no extra arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable (absolute path or name on `PATH`).
    pub fn program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Append an argument placed before the input path, e.g. `--no-ocr`.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn program_display(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl DocumentConverter for DoclingCli {
    fn name(&self) -> &str {
        "docling"
    }

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConvertError> {
        let scratch = tempfile::tempdir().map_err(|e| ConvertError::Io {
            path: std::env::temp_dir(),
            source: e,
        })?;

        debug!(
            "Running {} on {} (scratch {})",
            self.program_display(),
            path.display(),
            scratch.path().display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .args(["--to", "json", "--to", "md", "--to", "text", "--output"])
            .arg(scratch.path())
            .output()
            .map_err(|e| ConvertError::Spawn {
                program: self.program_display(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::Failed(format!(
                "{} exited with {}: {}",
                self.program_display(),
                output.status,
                stderr.trim()
            )));
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let export = |ext: &str| scratch.path().join(format!("{stem}.{ext}"));

        let mut doc = match read_optional(&export("json"))? {
            Some(raw) => from_docling_json(&raw)?,
            None => ConvertedDocument::default(),
        };
        doc.text = read_optional(&export("txt"))?;
        doc.markdown = read_optional(&export("md"))?;

        info!(
            "docling converted {}: {} text elements, {} tables",
            path.display(),
            doc.texts.as_ref().map_or(0, Vec::len),
            doc.tables.as_ref().map_or(0, Vec::len)
        );
        Ok(doc)
    }
}

/// Read an export file; a missing file is `None`, not an error.
fn read_optional(path: &Path) -> Result<Option<String>, ConvertError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConvertError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── DoclingDocument JSON (subset) ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DoclingJson {
    pages: Option<serde_json::Map<String, serde_json::Value>>,
    texts: Option<Vec<DoclingText>>,
    tables: Option<Vec<DoclingTable>>,
}

#[derive(Debug, Deserialize)]
struct DoclingText {
    text: Option<String>,
    label: Option<String>,
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DoclingTable {
    data: Option<DoclingTableData>,
}

#[derive(Debug, Deserialize)]
struct DoclingTableData {
    grid: Option<Vec<Vec<DoclingCell>>>,
}

#[derive(Debug, Deserialize)]
struct DoclingCell {
    text: Option<String>,
}

fn from_docling_json(raw: &str) -> Result<ConvertedDocument, ConvertError> {
    let parsed: DoclingJson =
        serde_json::from_str(raw).map_err(|e| ConvertError::Malformed(e.to_string()))?;

    let texts: Option<Vec<TextElement>> = parsed.texts.map(|items| {
        items
            .into_iter()
            .map(|t| TextElement {
                text: t.text,
                label: t.label,
                confidence: t.confidence,
            })
            .collect()
    });

    let title = texts.as_ref().and_then(|items| {
        items
            .iter()
            .find(|t| t.label.as_deref() == Some("title"))
            .and_then(|t| t.text.clone())
    });

    let tables = parsed.tables.map(|items| {
        items
            .into_iter()
            .map(|t| TableElement {
                rows: t.data.and_then(|d| d.grid).map(|g| grid_to_rows(&g)),
            })
            .collect()
    });

    Ok(ConvertedDocument {
        text: None,
        markdown: None,
        title,
        pages: parsed.pages.map(|p| p.len()),
        texts,
        tables,
    })
}

/// Turn a cell grid into records keyed by the header row.
///
/// Empty header cells are named by their column index. A repeated column name
/// keeps its first position and takes the last value.
fn grid_to_rows(grid: &[Vec<DoclingCell>]) -> Vec<TableRow> {
    let Some((header, body)) = grid.split_first() else {
        return Vec::new();
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell.text.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => i.to_string(),
        })
        .collect();

    body.iter()
        .map(|row| {
            let mut record = TableRow::new();
            for (i, column) in columns.iter().enumerate() {
                let value = row
                    .get(i)
                    .and_then(|c| c.text.clone())
                    .unwrap_or_default();
                record.insert(column.clone(), serde_json::Value::String(value));
            }
            record
        })
        .collect()
}
