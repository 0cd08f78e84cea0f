//! Input resolution: fetch the source PDF into memory.
//!
//! Doc2X takes the document as a multipart upload, so the bytes are held in
//! memory rather than spooled to disk. The server's `Content-Type` is the
//! only format check; it must begin with `application/pdf`.

use crate::error::Doc2xError;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

const PDF_MIME: &str = "application/pdf";

/// The downloaded document, ready for upload.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub url: String,
    pub bytes: Bytes,
    /// Exactly as served; forwarded on the multipart part.
    pub content_type: String,
    pub file_name: String,
}

/// Check if the input string looks like an HTTP(S) URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Download `url` and require a PDF content type.
pub async fn fetch_pdf(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<SourceDocument, Doc2xError> {
    info!("Downloading PDF from: {}", url);

    let download_failed = |reason: String| Doc2xError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    if !is_url(url) {
        return Err(download_failed("not an HTTP/HTTPS URL".to_string()));
    }

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                Doc2xError::DownloadTimeout {
                    url: url.to_string(),
                    secs: timeout.as_secs(),
                }
            } else {
                download_failed(e.to_string())
            }
        })?;

    if !response.status().is_success() {
        return Err(download_failed(format!("HTTP {}", response.status())));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.starts_with(PDF_MIME) {
        return Err(Doc2xError::NotAPdf {
            url: url.to_string(),
            content_type,
        });
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            Doc2xError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            }
        } else {
            download_failed(e.to_string())
        }
    })?;

    debug!("Downloaded {} bytes ({})", bytes.len(), content_type);

    Ok(SourceDocument {
        url: url.to_string(),
        bytes,
        content_type,
        file_name: extract_filename(url),
    })
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "document.pdf".to_string()
}
