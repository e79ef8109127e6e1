//! # docling-gateway
//!
//! An HTTP gateway that turns uploaded or remote documents (PDF, DOCX, plain
//! text) into JSON: plain text, Markdown, per-element structure, tables and
//! metadata.
//!
//! The gateway does no document understanding of its own. Layout analysis,
//! OCR and table detection belong to an external converter behind the
//! [`DocumentConverter`] trait; the production implementation
//! ([`DoclingCli`]) drives the `docling` command-line tool.
//!
//! ## Request Flow
//!
//! ```text
//! client
//!  │
//!  ├─ 1. Validate  exact content-type allow-list (upload header or fetched response)
//!  ├─ 2. Fetch     /parse-url only: GET with a fixed timeout
//!  ├─ 3. Stage     bytes → request-owned temp file with a matching suffix
//!  ├─ 4. Convert   DocumentConverter::convert on the blocking pool
//!  ├─ 5. Discard   temp file removed on every path, errors swallowed
//!  └─ 6. Shape     HTML entities decoded, defaults applied, JSON response
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docling_gateway::{start_server, DoclingCli, Gateway, GatewayConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::builder().bind_addr("127.0.0.1:8081").build()?;
//!     let gateway = Gateway::new(Arc::new(DoclingCli::new()), config)?;
//!     start_server(gateway).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docling-gateway` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod converter;
pub mod error;
pub mod gateway;
pub mod output;
pub mod pipeline;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use converter::{ConvertedDocument, DoclingCli, DocumentConverter, TableElement, TableRow, TextElement};
pub use error::{ConvertError, GatewayError};
pub use gateway::{Gateway, Upload};
pub use output::{
    DebugEcho, DocumentMetadata, DocumentSource, ExtractedText, HealthStatus, ParsedDocument,
    StructureEntry, TableEntry,
};
pub use server::{build_router, serve, serve_with_shutdown, start_server, FileUrlRequest};
