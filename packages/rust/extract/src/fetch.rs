//! Fetching pitch-deck documents by URL or local path.
//!
//! Fetching is an explicitly failable step kept separate from extraction:
//! every failure mode (timeout, HTTP error, unsupported content type,
//! unreadable file) is logged and degrades to `None`, never an error. A
//! company with an unreachable deck still gets a report.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use dealbrief_shared::{DealBriefError, Result};

use crate::{DocumentKind, ExtractedDocument, detect_kind, extract_text, sniff_kind};

/// User-Agent string for document fetch requests.
const USER_AGENT: &str = concat!("DealBrief/", env!("CARGO_PKG_VERSION"));

/// A fetched (or locally read) document, ready for extraction.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Raw document bytes.
    pub bytes: Vec<u8>,
    /// Detected document kind.
    pub kind: DocumentKind,
}

/// Build the HTTP client used for document fetches.
pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DealBriefError::Network(format!("failed to build HTTP client: {e}")))
}

/// Fetch a document over HTTP. Returns `None` on any failure.
#[instrument(skip(client), fields(url = %url))]
pub async fn fetch_document(client: &Client, url: &str) -> Option<FetchedDocument> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "invalid document URL, skipping fetch");
            return None;
        }
    };

    let response = match client.get(parsed).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "document fetch failed");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(%status, "document fetch returned non-success status");
        return None;
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            warn!(error = %e, "failed to read document body");
            return None;
        }
    };

    let kind = detect_kind(url, content_type.as_deref()).or_else(|| sniff_kind(&bytes));
    let Some(kind) = kind else {
        warn!(content_type = ?content_type, "unsupported document type, skipping");
        return None;
    };

    debug!(len = bytes.len(), ?kind, "document fetched");
    Some(FetchedDocument { bytes, kind })
}

/// Read a document from a local path. Returns `None` on any failure.
///
/// Supports the intake convention of dropping `CompanyName_pitch_deck.pdf`
/// style files next to the queue instead of hosting them.
pub fn read_document(path: &Path) -> Option<FetchedDocument> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read document file");
            return None;
        }
    };

    let kind = detect_kind(&path.to_string_lossy(), None).or_else(|| sniff_kind(&bytes));
    let Some(kind) = kind else {
        warn!(path = %path.display(), "unsupported document type, skipping");
        return None;
    };

    Some(FetchedDocument { bytes, kind })
}

/// Resolve a document reference (URL or local path), fetch it, and extract
/// its text. Any failure degrades to `None`.
pub async fn load_document(client: &Client, reference: &str) -> Option<ExtractedDocument> {
    let fetched = if reference.starts_with("http://") || reference.starts_with("https://") {
        fetch_document(client, reference).await?
    } else {
        read_document(Path::new(reference))?
    };

    Some(extract_text(&fetched.bytes, fetched.kind))
}

#[cfg(test)]
mod fetch_tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_plain_text_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("internal deck notes"),
            )
            .mount(&server)
            .await;

        let client = build_client(5).unwrap();
        let doc = fetch_document(&client, &format!("{}/notes.txt", server.uri()))
            .await
            .expect("document");
        assert_eq!(doc.kind, DocumentKind::Text);
        assert_eq!(doc.bytes, b"internal deck notes");
    }

    #[tokio::test]
    async fn fetch_pdf_by_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/deck"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.4 stub".to_vec()),
            )
            .mount(&server)
            .await;

        let client = build_client(5).unwrap();
        let doc = fetch_document(&client, &format!("{}/deck", server.uri()))
            .await
            .expect("document");
        assert_eq!(doc.kind, DocumentKind::Pdf);
    }

    #[tokio::test]
    async fn http_error_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/deck.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_client(5).unwrap();
        let doc = fetch_document(&client, &format!("{}/deck.pdf", server.uri())).await;
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn unsupported_content_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0xff, 0xd8, 0xff]),
            )
            .mount(&server)
            .await;

        let client = build_client(5).unwrap();
        let doc = fetch_document(&client, &format!("{}/logo", server.uri())).await;
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn timeout_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("too late")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = build_client(1).unwrap();
        let doc = fetch_document(&client, &format!("{}/slow.txt", server.uri())).await;
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn invalid_url_yields_none() {
        let client = build_client(5).unwrap();
        assert!(fetch_document(&client, "not a url").await.is_none());
    }

    #[test]
    fn missing_file_yields_none() {
        assert!(read_document(Path::new("/nonexistent/deck.pdf")).is_none());
    }

    #[tokio::test]
    async fn load_document_extracts_fetched_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("traction: 40 pilot customers"),
            )
            .mount(&server)
            .await;

        let client = build_client(5).unwrap();
        let extracted = load_document(&client, &format!("{}/notes.txt", server.uri()))
            .await
            .expect("extraction");
        assert_eq!(extracted.text, "traction: 40 pilot customers");
    }
}
