//! The external document converter seam.
//!
//! The gateway never parses documents itself. It hands a file path to a
//! [`DocumentConverter`] and receives a [`ConvertedDocument`] whose every
//! field is optional. Defaults for missing fields are applied later, in one
//! place ([`crate::output::ParsedDocument::from_converted`]), so converters
//! only report what they actually found.
//!
//! [`DoclingCli`] is the production implementation. Tests inject their own
//! implementation returning canned documents.

mod docling;

pub use docling::DoclingCli;

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One exported table row: column name → cell value, in column order.
pub type TableRow = serde_json::Map<String, serde_json::Value>;

/// Converter output. Any member may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertedDocument {
    /// Plain-text export.
    pub text: Option<String>,
    /// Markdown export.
    pub markdown: Option<String>,
    pub title: Option<String>,
    /// Number of pages, when the format has pages.
    pub pages: Option<usize>,
    /// Text elements in reading order.
    pub texts: Option<Vec<TextElement>>,
    pub tables: Option<Vec<TableElement>>,
}

/// A single text element (paragraph, heading, list item, …).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub text: Option<String>,
    /// Element kind as labelled by the converter, e.g. `section_header`.
    pub label: Option<String>,
    pub confidence: Option<f64>,
}

/// A detected table. `rows` is `None` when the table cannot export rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableElement {
    pub rows: Option<Vec<TableRow>>,
}

/// Converts a document on disk into a [`ConvertedDocument`].
///
/// Implementations are synchronous and may take arbitrarily long; the gateway
/// calls them from `tokio::task::spawn_blocking`. They must be `Send + Sync`
/// because one instance serves all concurrent requests.
pub trait DocumentConverter: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConvertError>;
}
