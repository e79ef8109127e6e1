//! Response payloads.
//!
//! [`ParsedDocument::from_converted`] is the only place converter output is
//! turned into a response, so `/parse` and `/parse-url` share defaults,
//! decoding and word counting and differ only in the identifying key.

use crate::converter::{ConvertedDocument, TableRow, TextElement};
use crate::pipeline::postprocess::{decode_entities, word_count};
use serde::{Deserialize, Serialize};

/// Label used for text elements the converter did not label.
pub const DEFAULT_ELEMENT_TYPE: &str = "text";

/// Confidence reported when the converter gives none.
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

/// Page count reported when the converter gives none.
pub const DEFAULT_PAGES: usize = 1;

/// Where the document came from; serialised as a single top-level key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    /// Uploaded file, keyed `filename`.
    Filename(Option<String>),
    /// Fetched document, keyed `file_url`.
    FileUrl(String),
}

/// Full response for `/parse` and `/parse-url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub success: bool,
    #[serde(flatten)]
    pub source: DocumentSource,
    pub content_type: String,
    pub text: String,
    pub markdown: String,
    pub metadata: DocumentMetadata,
    pub structure: Vec<StructureEntry>,
    /// Present only when the converter reported a tables collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub pages: usize,
    pub word_count: usize,
}

/// One text element in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub rows: Vec<TableRow>,
}

impl ParsedDocument {
    pub fn from_converted(
        source: DocumentSource,
        content_type: impl Into<String>,
        doc: ConvertedDocument,
    ) -> Self {
        let text = decode_optional(doc.text.as_deref());
        let markdown = decode_optional(doc.markdown.as_deref());

        let metadata = DocumentMetadata {
            title: doc.title.unwrap_or_default(),
            pages: doc.pages.unwrap_or(DEFAULT_PAGES),
            word_count: word_count(&text),
        };

        let structure = doc
            .texts
            .unwrap_or_default()
            .into_iter()
            .map(StructureEntry::from)
            .collect();

        let tables = doc.tables.map(|tables| {
            tables
                .into_iter()
                .map(|t| TableEntry {
                    rows: t.rows.unwrap_or_default(),
                })
                .collect()
        });

        Self {
            success: true,
            source,
            content_type: content_type.into(),
            text,
            markdown,
            metadata,
            structure,
            tables,
        }
    }
}

impl From<TextElement> for StructureEntry {
    fn from(element: TextElement) -> Self {
        Self {
            kind: element
                .label
                .unwrap_or_else(|| DEFAULT_ELEMENT_TYPE.to_string()),
            text: decode_optional(element.text.as_deref()),
            confidence: element.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        }
    }
}

/// Response for `/parse-text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub success: bool,
    pub text: String,
    pub word_count: usize,
}

impl ExtractedText {
    pub fn from_converted(doc: ConvertedDocument) -> Self {
        let text = decode_optional(doc.text.as_deref());
        Self {
            success: true,
            word_count: word_count(&text),
            text,
        }
    }
}

/// Fixed liveness payload for `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub docling_available: bool,
    pub message: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            docling_available: true,
            message: "Docling Resume Parser Service".to_string(),
        }
    }
}

/// Echo returned by `/debug-url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugEcho {
    pub received: serde_json::Value,
    /// Type name of the received body, as existing clients expect it.
    #[serde(rename = "type")]
    pub kind: String,
}

fn decode_optional(raw: Option<&str>) -> String {
    raw.map(decode_entities).unwrap_or_default()
}
