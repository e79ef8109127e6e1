//! Input handling: content-type allow-list, file suffixes, remote fetch.
//!
//! Uploads declare their content type; fetched documents take it from the
//! response's `content-type` header. Both go through [`ContentType::validate`],
//! an exact, case-sensitive match against the allow-list. Anything else is a
//! client error and never reaches the converter.

use crate::error::GatewayError;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Content type assumed when a fetched response has no `content-type` header.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// The document types the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Pdf,
    /// Office Open XML word-processing document (`.docx`).
    Docx,
    PlainText,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Pdf, ContentType::Docx, ContentType::PlainText];

    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Pdf => "application/pdf",
            ContentType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ContentType::PlainText => "text/plain",
        }
    }

    /// File suffix used when staging a fetched document.
    pub fn suffix(self) -> &'static str {
        match self {
            ContentType::Pdf => ".pdf",
            ContentType::Docx => ".docx",
            ContentType::PlainText => ".txt",
        }
    }

    /// Exact match against the allow-list. Parameters such as `; charset=`
    /// are not stripped, so `text/plain; charset=utf-8` does not match.
    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ct| ct.mime() == mime)
    }

    /// Validate a declared content type; `None` means the client sent none.
    pub fn validate(declared: Option<&str>) -> Result<Self, GatewayError> {
        declared
            .and_then(Self::from_mime)
            .ok_or_else(|| GatewayError::UnsupportedFileType {
                content_type: declared.unwrap_or("None").to_string(),
            })
    }
}

/// Suffix of an uploaded filename including the dot (`"cv.PDF"` → `".PDF"`),
/// or empty when there is no filename or no extension.
pub fn suffix_from_filename(filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).extension())
        .map(|ext| ext.to_string_lossy())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Check if the input string looks like an HTTP(S) URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// A document downloaded for `/parse-url`.
#[derive(Debug)]
pub struct FetchedDocument {
    /// Raw `content-type` header value, or [`FALLBACK_CONTENT_TYPE`].
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Download `url` with a whole-request timeout and a body size cap.
///
/// Connection errors, timeouts, non-success statuses, oversized bodies and
/// body read failures all become [`GatewayError::FetchFailed`] or
/// [`GatewayError::FetchTimeout`]. Nothing is retried.
pub async fn fetch_document(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
    max_bytes: usize,
) -> Result<FetchedDocument, GatewayError> {
    if !is_url(url) {
        return Err(GatewayError::FetchFailed {
            url: url.to_string(),
            reason: format!("Invalid URL '{url}': only http:// and https:// are supported"),
        });
    }

    info!("Attempting to fetch file from URL: {}", url);
    let fetch_error = |e: reqwest::Error| {
        if e.is_timeout() {
            GatewayError::FetchTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            GatewayError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let too_large = || GatewayError::FetchFailed {
        url: url.to_string(),
        reason: format!("response body from '{url}' exceeds the {max_bytes} byte limit"),
    };

    let mut response = client
        .get(url)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await
        .map_err(fetch_error)?;

    info!("HTTP response status: {}", response.status());
    debug!("HTTP response headers: {:?}", response.headers());

    if !response.status().is_success() {
        return Err(GatewayError::FetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {} for url: {}", response.status(), url),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();

    if response
        .content_length()
        .is_some_and(|len| len > max_bytes as u64)
    {
        return Err(too_large());
    }

    // Content-Length may be absent or wrong, so the streamed length is checked too.
    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(fetch_error)? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    info!(
        "Fetched {} bytes, content type: {}",
        bytes.len(),
        content_type
    );

    Ok(FetchedDocument {
        content_type,
        bytes,
    })
}
