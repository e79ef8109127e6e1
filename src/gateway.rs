//! Conversion entry points.
//!
//! [`Gateway`] owns the injected converter, the configuration and an HTTP
//! client for remote fetches. Each operation follows the same shape:
//!
//! ```text
//! validate ─▶ stage (TransientFile) ─▶ convert (spawn_blocking) ─▶ discard ─▶ shape payload
//! ```
//!
//! Validation happens before staging, so a rejected request never touches
//! the filesystem. Once a file is staged it is discarded before the operation
//! returns, whatever the converter did.

use crate::config::GatewayConfig;
use crate::converter::{ConvertedDocument, DocumentConverter};
use crate::error::{ConvertError, GatewayError};
use crate::output::{DocumentSource, ExtractedText, HealthStatus, ParsedDocument};
use crate::pipeline::input::{self, ContentType};
use crate::pipeline::stage::TransientFile;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A document received as a multipart upload.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Client-supplied filename; only its extension is used.
    pub filename: Option<String>,
    /// Declared content type of the part, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// The conversion gateway. Cheap to clone; clones share the converter.
#[derive(Clone)]
pub struct Gateway {
    converter: Arc<dyn DocumentConverter>,
    config: Arc<GatewayConfig>,
    http: reqwest::Client,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("converter", &self.converter.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Gateway {
    /// Build a gateway around `converter`.
    pub fn new(
        converter: Arc<dyn DocumentConverter>,
        config: GatewayConfig,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            converter,
            config: Arc::new(config),
            http,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Fixed liveness payload.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::default()
    }

    /// Convert an uploaded document into the full payload.
    pub async fn parse(&self, upload: Upload) -> Result<ParsedDocument, GatewayError> {
        let content_type = ContentType::validate(upload.content_type.as_deref())?;
        info!(
            "Parsing upload {:?} ({}, {} bytes)",
            upload.filename,
            content_type.mime(),
            upload.bytes.len()
        );

        let suffix = input::suffix_from_filename(upload.filename.as_deref());
        let doc = self
            .stage_and_convert(&upload.bytes, &suffix)
            .await
            .map_err(GatewayError::ParseFailed)?;

        Ok(ParsedDocument::from_converted(
            DocumentSource::Filename(upload.filename),
            content_type.mime(),
            doc,
        ))
    }

    /// Convert an uploaded document and return only its text.
    ///
    /// The declared content type is not checked on this route.
    pub async fn parse_text(&self, upload: Upload) -> Result<ExtractedText, GatewayError> {
        info!(
            "Extracting text from upload {:?} ({} bytes)",
            upload.filename,
            upload.bytes.len()
        );

        let suffix = input::suffix_from_filename(upload.filename.as_deref());
        let doc = self
            .stage_and_convert(&upload.bytes, &suffix)
            .await
            .map_err(GatewayError::TextExtractionFailed)?;

        Ok(ExtractedText::from_converted(doc))
    }

    /// Fetch `file_url` and convert it into the full payload.
    pub async fn parse_url(&self, file_url: &str) -> Result<ParsedDocument, GatewayError> {
        info!("Received parse-url request for {}", file_url);

        let fetched = input::fetch_document(
            &self.http,
            file_url,
            self.config.fetch_timeout_secs,
            self.config.max_upload_bytes,
        )
        .await?;
        let content_type = ContentType::validate(Some(fetched.content_type.as_str()))?;
        debug!("Using file extension: {:?}", content_type.suffix());

        let doc = self
            .stage_and_convert(&fetched.bytes, content_type.suffix())
            .await
            .map_err(GatewayError::ParseFailed)?;

        info!("Successfully parsed {}", file_url);
        Ok(ParsedDocument::from_converted(
            DocumentSource::FileUrl(file_url.to_string()),
            fetched.content_type,
            doc,
        ))
    }

    /// Stage `bytes`, run the converter on the staged file, discard the file.
    ///
    /// Staging and converter failures both come back as [`ConvertError`],
    /// left for the caller to wrap per route.
    async fn stage_and_convert(
        &self,
        bytes: &[u8],
        suffix: &str,
    ) -> Result<ConvertedDocument, ConvertError> {
        let staged =
            TransientFile::create(bytes, suffix, self.config.temp_dir.as_deref()).await?;

        let start = Instant::now();
        let converter = Arc::clone(&self.converter);
        let path = staged.path().to_path_buf();
        let result = tokio::task::spawn_blocking(move || converter.convert(&path))
            .await
            .unwrap_or_else(|e| Err(ConvertError::Failed(format!("converter task failed: {e}"))));

        staged.discard();
        info!(
            "{} finished in {}ms ({})",
            self.converter.name(),
            start.elapsed().as_millis(),
            if result.is_ok() { "ok" } else { "failed" }
        );
        result
    }
}
