//! Text extraction from pitch-deck documents.
//!
//! Pulls plain text out of a PDF or plain-text source. Extraction never
//! fails: a malformed page is skipped, an undecodable document degrades to
//! empty text, and the caller decides what an empty result means.

mod fetch;

use std::panic::AssertUnwindSafe;

use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

pub use fetch::{FetchedDocument, build_client, fetch_document, load_document, read_document};

/// Separator inserted between extracted PDF pages (form feed, the
/// conventional page boundary in plain-text extraction output).
pub const PAGE_BREAK: &str = "\n\u{c}\n";

// ---------------------------------------------------------------------------
// Document kinds
// ---------------------------------------------------------------------------

/// Supported source document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// PDF, extracted page by page.
    Pdf,
    /// Plain text, decoded as UTF-8.
    Text,
}

/// Detect the document kind from a content type and/or the reference's
/// file extension. Returns `None` for anything we cannot extract.
pub fn detect_kind(reference: &str, content_type: Option<&str>) -> Option<DocumentKind> {
    if let Some(ct) = content_type {
        let ct = ct.to_ascii_lowercase();
        if ct.contains("application/pdf") {
            return Some(DocumentKind::Pdf);
        }
        if ct.starts_with("text/") || ct.contains("text/plain") {
            return Some(DocumentKind::Text);
        }
    }

    let lower = reference.to_ascii_lowercase();
    // Strip any query string before checking the extension
    let path = lower.split(['?', '#']).next().unwrap_or(&lower);
    if path.ends_with(".pdf") {
        Some(DocumentKind::Pdf)
    } else if path.ends_with(".txt") || path.ends_with(".md") {
        Some(DocumentKind::Text)
    } else {
        None
    }
}

/// Detect the kind from leading magic bytes, as a fallback when neither the
/// content type nor the extension is conclusive.
pub fn sniff_kind(bytes: &[u8]) -> Option<DocumentKind> {
    if bytes.starts_with(b"%PDF-") {
        Some(DocumentKind::Pdf)
    } else if std::str::from_utf8(bytes).is_ok() {
        Some(DocumentKind::Text)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Result of a text extraction, with enough metadata to log partial success.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Extracted text. Empty when nothing could be recovered.
    pub text: String,
    /// Total pages in the source (1 for plain text).
    pub pages_total: usize,
    /// Pages that failed to extract and were skipped.
    pub pages_failed: usize,
    /// SHA-256 hash of the source bytes.
    pub content_hash: String,
}

impl ExtractedDocument {
    /// An extraction that recovered nothing.
    fn empty(bytes: &[u8]) -> Self {
        Self {
            text: String::new(),
            pages_total: 0,
            pages_failed: 0,
            content_hash: compute_hash(bytes),
        }
    }
}

/// Extract text from a document. Never fails; unreadable input yields an
/// empty result.
///
/// PDF pages are extracted independently and joined with [`PAGE_BREAK`]; a
/// page that cannot be extracted is skipped so one bad page never discards
/// the rest of the document.
#[instrument(skip_all, fields(kind = ?kind, len = bytes.len()))]
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> ExtractedDocument {
    match kind {
        DocumentKind::Text => extract_plain_text(bytes),
        DocumentKind::Pdf => extract_pdf(bytes),
    }
}

fn extract_plain_text(bytes: &[u8]) -> ExtractedDocument {
    match std::str::from_utf8(bytes) {
        Ok(text) => ExtractedDocument {
            text: text.to_string(),
            pages_total: 1,
            pages_failed: 0,
            content_hash: compute_hash(bytes),
        },
        Err(e) => {
            warn!(error = %e, "document is not valid UTF-8, treating as empty");
            ExtractedDocument::empty(bytes)
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> ExtractedDocument {
    let doc = match lopdf::Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "failed to parse PDF, treating as empty");
            return ExtractedDocument::empty(bytes);
        }
    };

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let pages = page_numbers
        .iter()
        .map(|&page| {
            // The PDF parser can panic on malformed content streams; contain
            // it so a bad page costs only that page.
            std::panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page])))
                .map_err(|_| "text extraction panicked".to_string())
                .and_then(|r| r.map_err(|e| e.to_string()))
        })
        .collect();

    let (text, pages_failed) = assemble_pages(pages);

    debug!(
        pages_total = page_numbers.len(),
        pages_failed,
        text_len = text.len(),
        "PDF extraction complete"
    );

    ExtractedDocument {
        text,
        pages_total: page_numbers.len(),
        pages_failed,
        content_hash: compute_hash(bytes),
    }
}

/// Join per-page extraction results, skipping failed pages.
fn assemble_pages(pages: Vec<std::result::Result<String, String>>) -> (String, usize) {
    let mut kept: Vec<String> = Vec::new();
    let mut failed = 0usize;

    for (i, page) in pages.into_iter().enumerate() {
        match page {
            Ok(text) if !text.trim().is_empty() => kept.push(text),
            Ok(_) => {}
            Err(e) => {
                failed += 1;
                warn!(page = i + 1, error = %e, "skipping unreadable page");
            }
        }
    }

    (kept.join(PAGE_BREAK), failed)
}

/// Compute SHA-256 hash of the source bytes.
fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a small in-memory PDF with one page of text per entry in `pages`.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("serialize PDF");
        buf
    }

    #[test]
    fn detect_kind_by_content_type() {
        assert_eq!(
            detect_kind("deck", Some("application/pdf")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            detect_kind("notes", Some("text/plain; charset=utf-8")),
            Some(DocumentKind::Text)
        );
        assert_eq!(detect_kind("page", Some("text/html")), Some(DocumentKind::Text));
        assert_eq!(detect_kind("img", Some("image/png")), None);
    }

    #[test]
    fn detect_kind_by_extension() {
        assert_eq!(
            detect_kind("https://cdn.example.com/deck.pdf?v=2", None),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(detect_kind("/tmp/notes.txt", None), Some(DocumentKind::Text));
        assert_eq!(detect_kind("/tmp/logo.png", None), None);
    }

    #[test]
    fn sniff_kind_by_magic() {
        assert_eq!(sniff_kind(b"%PDF-1.7 ..."), Some(DocumentKind::Pdf));
        assert_eq!(sniff_kind(b"just some notes"), Some(DocumentKind::Text));
        assert_eq!(sniff_kind(&[0xff, 0xd8, 0xff, 0x00]), None);
    }

    #[test]
    fn plain_text_roundtrip() {
        let result = extract_text(b"pitch deck notes", DocumentKind::Text);
        assert_eq!(result.text, "pitch deck notes");
        assert_eq!(result.pages_total, 1);
        assert_eq!(result.pages_failed, 0);
        assert_eq!(result.content_hash.len(), 64);
    }

    #[test]
    fn invalid_utf8_degrades_to_empty() {
        let result = extract_text(&[0xff, 0xfe, 0x80], DocumentKind::Text);
        assert_eq!(result.text, "");
        assert_eq!(result.pages_total, 0);
    }

    #[test]
    fn garbage_pdf_degrades_to_empty() {
        let result = extract_text(b"not a pdf at all", DocumentKind::Pdf);
        assert_eq!(result.text, "");
    }

    #[test]
    fn pdf_pages_extract_with_page_breaks() {
        let bytes = build_pdf(&["First page content", "Second page content"]);
        let result = extract_text(&bytes, DocumentKind::Pdf);
        assert_eq!(result.pages_total, 2);
        assert_eq!(result.pages_failed, 0);
        assert!(result.text.contains("First page content"));
        assert!(result.text.contains("Second page content"));
        assert!(result.text.contains(PAGE_BREAK));
    }

    #[test]
    fn assemble_pages_skips_failed_page() {
        // Three pages, the middle one unreadable: output keeps pages 1 and 3.
        let pages = vec![
            Ok("page one".to_string()),
            Err("broken content stream".to_string()),
            Ok("page three".to_string()),
        ];
        let (text, failed) = assemble_pages(pages);
        assert_eq!(failed, 1);
        assert!(text.contains("page one"));
        assert!(text.contains("page three"));
        assert_eq!(text, format!("page one{PAGE_BREAK}page three"));
    }

    #[test]
    fn assemble_pages_drops_blank_pages_silently() {
        let pages = vec![Ok("content".to_string()), Ok("   \n".to_string())];
        let (text, failed) = assemble_pages(pages);
        assert_eq!(failed, 0);
        assert_eq!(text, "content");
    }
}
