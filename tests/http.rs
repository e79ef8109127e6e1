//! HTTP contract tests for docling-gateway.
//!
//! Each test binds the real router on an ephemeral port and drives it with
//! reqwest. The converter is a stub that records what it was given and
//! returns a canned document, so no docling install is needed. `/parse-url`
//! tests also start a second local server that plays the remote host.
//!
//! Run with:
//!   cargo test --test http -- --nocapture

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use docling_gateway::config::DEFAULT_MAX_UPLOAD_BYTES;
use docling_gateway::{
    serve, ConvertError, ConvertedDocument, DocumentConverter, Gateway, GatewayConfig,
    TableElement, TableRow, TextElement,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PDF: &str = "application/pdf";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const TXT: &str = "text/plain";

// ── Test helpers ─────────────────────────────────────────────────────────────

/// One call observed by the stub converter.
#[derive(Debug, Clone)]
struct Seen {
    path: PathBuf,
    bytes: Vec<u8>,
}

/// Converter double: returns a fixed outcome and records every call.
struct StubConverter {
    outcome: Result<ConvertedDocument, String>,
    calls: Mutex<Vec<Seen>>,
}

impl StubConverter {
    fn returning(doc: ConvertedDocument) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(doc),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Seen> {
        self.calls.lock().unwrap().clone()
    }
}

impl DocumentConverter for StubConverter {
    fn name(&self) -> &str {
        "stub"
    }

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConvertError> {
        let bytes = std::fs::read(path).expect("staged file must exist during conversion");
        self.calls.lock().unwrap().push(Seen {
            path: path.to_path_buf(),
            bytes,
        });
        self.outcome.clone().map_err(ConvertError::Failed)
    }
}

/// A running gateway plus the directory its transient files go to.
struct TestServer {
    base: String,
    temp: TempDir,
    client: reqwest::Client,
}

/// Route gateway logs through the test harness; `RUST_LOG` picks the level.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl TestServer {
    async fn start(converter: Arc<StubConverter>) -> Self {
        Self::start_with_limit(converter, DEFAULT_MAX_UPLOAD_BYTES).await
    }

    async fn start_with_limit(converter: Arc<StubConverter>, max_upload_bytes: usize) -> Self {
        init_tracing();
        let temp = tempfile::tempdir().unwrap();
        let config = GatewayConfig::builder()
            .temp_dir(temp.path())
            .fetch_timeout_secs(1)
            .max_upload_bytes(max_upload_bytes)
            .build()
            .unwrap();
        let gateway = Gateway::new(converter, config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            serve(listener, gateway).await.expect("gateway server failed");
        });

        Self {
            base: format!("http://{addr}"),
            temp,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn upload(
        &self,
        path: &str,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> (StatusCode, Value) {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(content_type)
            .unwrap();
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    async fn parse_url(&self, file_url: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .post(self.url("/parse-url"))
            .json(&json!({ "file_url": file_url }))
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    /// No transient file survives a finished request.
    fn assert_no_transient_files(&self) {
        let leftovers: Vec<_> = std::fs::read_dir(self.temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert!(leftovers.is_empty(), "transient files left behind: {leftovers:?}");
    }
}

/// Local stand-in for a remote document host.
async fn start_remote_host() -> String {
    async fn pdf() -> impl IntoResponse {
        ([(header::CONTENT_TYPE, PDF)], b"%PDF-1.7 remote".to_vec())
    }
    async fn docx() -> impl IntoResponse {
        ([(header::CONTENT_TYPE, DOCX)], b"PK\x03\x04".to_vec())
    }
    async fn text() -> impl IntoResponse {
        ([(header::CONTENT_TYPE, TXT)], "remote notes")
    }
    async fn text_with_charset() -> &'static str {
        "remote notes"
    }
    async fn image() -> impl IntoResponse {
        ([(header::CONTENT_TYPE, "image/png")], b"\x89PNG".to_vec())
    }
    async fn untyped() -> impl IntoResponse {
        Body::from("no content type")
    }
    async fn missing() -> impl IntoResponse {
        (StatusCode::NOT_FOUND, "gone")
    }
    async fn large() -> impl IntoResponse {
        ([(header::CONTENT_TYPE, PDF)], vec![b'x'; 4096])
    }
    async fn slow() -> impl IntoResponse {
        tokio::time::sleep(Duration::from_secs(5)).await;
        ([(header::CONTENT_TYPE, PDF)], b"%PDF-1.7 late".to_vec())
    }

    let app = Router::new()
        .route("/resume.pdf", get(pdf))
        .route("/resume.docx", get(docx))
        .route("/notes", get(text))
        .route("/notes-utf8", get(text_with_charset))
        .route("/photo", get(image))
        .route("/untyped", get(untyped))
        .route("/missing.pdf", get(missing))
        .route("/large.pdf", get(large))
        .route("/slow.pdf", get(slow));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("remote host failed");
    });
    format!("http://{addr}")
}

/// Serves one chunked response with no `content-length`, then closes.
async fn start_chunked_host(body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let mut response = b"HTTP/1.1 200 OK\r\ncontent-type: application/pdf\r\n\
                             transfer-encoding: chunked\r\nconnection: close\r\n\r\n"
            .to_vec();
        for chunk in body.chunks(256) {
            response.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
            response.extend_from_slice(chunk);
            response.extend_from_slice(b"\r\n");
        }
        response.extend_from_slice(b"0\r\n\r\n");
        // The client may hang up early once the body is over its limit.
        let _ = socket.write_all(&response).await;
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}

fn resume_document() -> ConvertedDocument {
    let mut row = TableRow::new();
    row.insert("Company".into(), json!("Acme &amp; Co"));
    row.insert("Years".into(), json!("3"));
    ConvertedDocument {
        text: Some("Jane Doe\nR&amp;D lead &lt;Rust&gt; &quot;systems&quot;".into()),
        markdown: Some("# Jane Doe\n\nR&amp;D lead".into()),
        title: Some("Jane Doe".into()),
        pages: Some(2),
        texts: Some(vec![
            TextElement {
                text: Some("Jane Doe".into()),
                label: Some("title".into()),
                confidence: Some(0.98),
            },
            TextElement {
                text: Some("R&amp;D lead".into()),
                label: None,
                confidence: None,
            },
        ]),
        tables: Some(vec![
            TableElement {
                rows: Some(vec![row]),
            },
            TableElement { rows: None },
        ]),
    }
}

// ── /health and /debug-url ───────────────────────────────────────────────────

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::start(StubConverter::returning(ConvertedDocument::default())).await;

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "healthy",
            "docling_available": true,
            "message": "Docling Resume Parser Service"
        })
    );
}

#[tokio::test]
async fn test_debug_url_echoes_body() {
    let server = TestServer::start(StubConverter::returning(ConvertedDocument::default())).await;

    let response = server
        .client
        .post(server.url("/debug-url"))
        .json(&json!({"file_url": "https://example.com/cv.pdf", "n": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["type"], "dict");
    assert_eq!(body["received"]["file_url"], "https://example.com/cv.pdf");
    assert_eq!(body["received"]["n"], 1);
}

#[tokio::test]
async fn test_debug_url_rejects_non_object() {
    let server = TestServer::start(StubConverter::returning(ConvertedDocument::default())).await;

    let response = server
        .client
        .post(server.url("/debug-url"))
        .json(&json!([1, 2, 3]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].is_string());
}

// ── /parse ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_parse_accepts_every_allowed_type() {
    for (filename, content_type, suffix) in [
        ("resume.pdf", PDF, "pdf"),
        ("resume.docx", DOCX, "docx"),
        ("resume.txt", TXT, "txt"),
    ] {
        let converter = StubConverter::returning(ConvertedDocument {
            text: Some("minimal".into()),
            ..Default::default()
        });
        let server = TestServer::start(converter.clone()).await;

        let (status, body) = server.upload("/parse", filename, content_type, b"minimal").await;
        assert_eq!(status, StatusCode::OK, "{content_type}: {body}");
        assert_eq!(body["success"], true);
        assert_eq!(body["filename"], filename);
        assert_eq!(body["content_type"], content_type);

        let calls = converter.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bytes, b"minimal");
        assert_eq!(calls[0].path.extension().unwrap(), suffix);
        assert!(!calls[0].path.exists());
        server.assert_no_transient_files();
    }
}

#[tokio::test]
async fn test_parse_full_payload() {
    let server = TestServer::start(StubConverter::returning(resume_document())).await;

    let (status, body) = server.upload("/parse", "jane.pdf", PDF, b"%PDF-1.4").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["text"], "Jane Doe\nR&D lead <Rust> \"systems\"");
    assert_eq!(body["markdown"], "# Jane Doe\n\nR&D lead");
    assert_eq!(
        body["metadata"],
        json!({"title": "Jane Doe", "pages": 2, "word_count": 6})
    );
    assert_eq!(
        body["structure"],
        json!([
            {"type": "title", "text": "Jane Doe", "confidence": 0.98},
            {"type": "text", "text": "R&D lead", "confidence": 1.0}
        ])
    );
    // Table cells are passed through as exported.
    assert_eq!(
        body["tables"],
        json!([
            {"rows": [{"Company": "Acme &amp; Co", "Years": "3"}]},
            {"rows": []}
        ])
    );
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_missing_optional_fields() {
    let server = TestServer::start(StubConverter::returning(ConvertedDocument::default())).await;

    let (status, body) = server.upload("/parse", "empty.pdf", PDF, b"%PDF").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "");
    assert_eq!(body["markdown"], "");
    assert_eq!(body["metadata"]["title"], "");
    assert_eq!(body["metadata"]["pages"], 1);
    assert_eq!(body["metadata"]["word_count"], 0);
    assert_eq!(body["structure"], json!([]));
    assert!(body.get("tables").is_none(), "tables key must be absent: {body}");
}

#[tokio::test]
async fn test_parse_rejects_unsupported_type() {
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start(converter.clone()).await;

    for content_type in ["image/png", "application/msword", "text/plain; charset=utf-8"] {
        let (status, body) = server.upload("/parse", "file.bin", content_type, b"data").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{content_type}");
        assert_eq!(body["detail"], format!("Unsupported file type: {content_type}"));
    }

    assert!(converter.calls().is_empty(), "converter must not run");
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_converter_failure_is_500_and_cleans_up() {
    let converter = StubConverter::failing("unsupported PDF feature");
    let server = TestServer::start(converter.clone()).await;

    let (status, body) = server.upload("/parse", "broken.pdf", PDF, b"%PDF-broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Error parsing document: unsupported PDF feature");

    let calls = converter.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].path.exists());
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_without_file_field_is_422() {
    let converter = StubConverter::returning(ConvertedDocument::default());
    let server = TestServer::start(converter.clone()).await;

    let form = reqwest::multipart::Form::new().text("other", "value");
    let response = server
        .client
        .post(server.url("/parse"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Field required: file");
    assert!(converter.calls().is_empty());
}

#[tokio::test]
async fn test_parse_file_field_without_filename_is_422() {
    let converter = StubConverter::returning(ConvertedDocument::default());
    let server = TestServer::start(converter.clone()).await;

    for path in ["/parse", "/parse-text"] {
        let form = reqwest::multipart::Form::new().text("file", "just a string");
        let response = server
            .client
            .post(server.url(path))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 422, "{path}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["detail"], "Field 'file' must be a file upload");
    }
    assert!(converter.calls().is_empty());
}

#[tokio::test]
async fn test_parse_without_multipart_body_is_422() {
    let server = TestServer::start(StubConverter::returning(ConvertedDocument::default())).await;

    let response = server
        .client
        .post(server.url("/parse"))
        .json(&json!({"file": "nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
}

// ── /parse-text ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_parse_text_is_idempotent() {
    let converter = StubConverter::returning(ConvertedDocument {
        text: Some("Fish &amp; chips, &quot;twice&quot;".into()),
        markdown: Some("ignored".into()),
        ..Default::default()
    });
    let server = TestServer::start(converter.clone()).await;

    let (status_a, first) = server.upload("/parse-text", "menu.txt", TXT, b"same bytes").await;
    let (status_b, second) = server.upload("/parse-text", "menu.txt", TXT, b"same bytes").await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(
        first,
        json!({"success": true, "text": "Fish & chips, \"twice\"", "word_count": 4})
    );
    assert_eq!(first, second);

    let calls = converter.calls();
    assert_eq!(calls.len(), 2);
    assert_ne!(calls[0].path, calls[1].path, "each request gets its own file");
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_text_empty_text_counts_zero() {
    let server = TestServer::start(StubConverter::returning(ConvertedDocument::default())).await;

    let (status, body) = server.upload("/parse-text", "blank.pdf", PDF, b"%PDF").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "text": "", "word_count": 0}));
}

#[tokio::test]
async fn test_parse_text_failure_is_500() {
    let server = TestServer::start(StubConverter::failing("OCR engine missing")).await;

    let (status, body) = server.upload("/parse-text", "scan.pdf", PDF, b"%PDF").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Error extracting text: OCR engine missing");
    server.assert_no_transient_files();
}

// ── /parse-url ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_parse_url_success() {
    let remote = start_remote_host().await;
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start(converter.clone()).await;

    let file_url = format!("{remote}/resume.pdf");
    let (status, body) = server.parse_url(&file_url).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    assert_eq!(body["success"], true);
    assert_eq!(body["file_url"], file_url.as_str());
    assert!(body.get("filename").is_none());
    assert_eq!(body["content_type"], PDF);
    assert_eq!(body["text"], "Jane Doe\nR&D lead <Rust> \"systems\"");
    assert_eq!(body["metadata"]["word_count"], 6);
    assert_eq!(body["structure"][1]["text"], "R&D lead");

    let calls = converter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].bytes, b"%PDF-1.7 remote");
    assert_eq!(calls[0].path.extension().unwrap(), "pdf");
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_url_suffix_follows_content_type() {
    let remote = start_remote_host().await;
    let converter = StubConverter::returning(ConvertedDocument::default());
    let server = TestServer::start(converter.clone()).await;

    let (status, _) = server.parse_url(&format!("{remote}/resume.docx")).await;
    assert_eq!(status, StatusCode::OK);

    // The remote path has no extension; the suffix comes from the header.
    let (status, _) = server.parse_url(&format!("{remote}/notes")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server.parse_url(&format!("{remote}/notes-utf8")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Unsupported file type: text/plain; charset=utf-8");

    let calls = converter.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].path.extension().unwrap(), "docx");
    assert_eq!(calls[1].path.extension().unwrap(), "txt");
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_url_rejects_unsupported_type() {
    let remote = start_remote_host().await;
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start(converter.clone()).await;

    let (status, body) = server.parse_url(&format!("{remote}/photo")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Unsupported file type: image/png");

    let (status, body) = server.parse_url(&format!("{remote}/untyped")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Unsupported file type: application/octet-stream");

    assert!(converter.calls().is_empty());
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_url_http_error_is_400() {
    let remote = start_remote_host().await;
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start(converter.clone()).await;

    let (status, body) = server.parse_url(&format!("{remote}/missing.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error fetching file from URL:"), "got: {detail}");
    assert!(detail.contains("404"), "got: {detail}");

    assert!(converter.calls().is_empty());
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_url_timeout_is_400() {
    let remote = start_remote_host().await;
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start(converter.clone()).await;

    let (status, body) = server.parse_url(&format!("{remote}/slow.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error fetching file from URL:"), "got: {detail}");
    assert!(detail.contains("timed out"), "got: {detail}");

    assert!(converter.calls().is_empty());
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_url_unreachable_host_is_400() {
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start(converter.clone()).await;

    // Bind then drop a listener so the port is very likely closed.
    let closed = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (status, body) = server.parse_url(&format!("http://{closed}/cv.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Error fetching file from URL:"));
    assert!(converter.calls().is_empty());
}

#[tokio::test]
async fn test_parse_url_oversized_body_is_400() {
    let remote = start_remote_host().await;
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start_with_limit(converter.clone(), 1024).await;

    let (status, body) = server.parse_url(&format!("{remote}/large.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error fetching file from URL:"), "got: {detail}");
    assert!(detail.contains("1024 byte limit"), "got: {detail}");

    // Within the limit still converts.
    let (status, _) = server.parse_url(&format!("{remote}/resume.pdf")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(converter.calls().len(), 1);
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_url_oversized_chunked_body_is_400() {
    let remote = start_chunked_host(&[b'y'; 4000]).await;
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start_with_limit(converter.clone(), 1024).await;

    let (status, body) = server.parse_url(&format!("{remote}/stream.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("1024 byte limit"));

    assert!(converter.calls().is_empty());
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_url_chunked_body_within_limit() {
    let remote = start_chunked_host(b"%PDF-1.7 chunked body").await;
    let converter = StubConverter::returning(ConvertedDocument::default());
    let server = TestServer::start(converter.clone()).await;

    let (status, _) = server.parse_url(&format!("{remote}/stream.pdf")).await;
    assert_eq!(status, StatusCode::OK);

    let calls = converter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].bytes, b"%PDF-1.7 chunked body");
}

#[tokio::test]
async fn test_parse_url_converter_failure_is_500() {
    let remote = start_remote_host().await;
    let converter = StubConverter::failing("docling crashed");
    let server = TestServer::start(converter.clone()).await;

    let (status, body) = server.parse_url(&format!("{remote}/resume.pdf")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Error parsing document: docling crashed");

    assert_eq!(converter.calls().len(), 1);
    server.assert_no_transient_files();
}

#[tokio::test]
async fn test_parse_url_missing_field_is_422() {
    let converter = StubConverter::returning(resume_document());
    let server = TestServer::start(converter.clone()).await;

    let response = server
        .client
        .post(server.url("/parse-url"))
        .json(&json!({"url": "https://example.com/cv.pdf"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    assert!(converter.calls().is_empty());
}

// ── Shared payload contract ──────────────────────────────────────────────────

#[tokio::test]
async fn test_parse_and_parse_url_payloads_are_interchangeable() {
    let remote = start_remote_host().await;
    let server = TestServer::start(StubConverter::returning(resume_document())).await;

    let (_, mut uploaded) = server.upload("/parse", "resume.pdf", PDF, b"%PDF").await;
    let (_, mut fetched) = server.parse_url(&format!("{remote}/resume.pdf")).await;

    let uploaded = uploaded.as_object_mut().unwrap();
    let fetched = fetched.as_object_mut().unwrap();
    assert!(uploaded.remove("filename").is_some());
    assert!(fetched.remove("file_url").is_some());
    assert_eq!(uploaded, fetched);
}
