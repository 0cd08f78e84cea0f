//! Progress-callback trait for OCR lifecycle events.
//!
//! Inject an [`Arc<dyn OcrProgressCallback>`] via
//! [`crate::config::Doc2xConfigBuilder::progress_callback`] to be told when
//! the adapter moves between stages. A single invocation is strictly
//! sequential, so events arrive in order from one task at a time.
//!
//! # Example
//!
//! ```rust
//! use doc2x_ocr::{Doc2xConfig, OcrProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PollCounter(AtomicUsize);
//!
//! impl OcrProgressCallback for PollCounter {
//!     fn on_poll(&self, _poll: u32, _status: &str) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = Doc2xConfig::builder()
//!     .progress_callback(Arc::new(PollCounter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use crate::credential::CredentialKind;
use std::sync::Arc;
use std::time::Duration;

/// Called by the adapter as an invocation advances.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait OcrProgressCallback: Send + Sync {
    /// The effective credential is known (after an optional refresh).
    fn on_credential_resolved(&self, kind: CredentialKind) {
        let _ = kind;
    }

    /// The source PDF was downloaded.
    ///
    /// # Arguments
    /// * `bytes`: size of the document body
    fn on_document_fetched(&self, bytes: usize) {
        let _ = bytes;
    }

    /// An upload request is about to be sent.
    ///
    /// # Arguments
    /// * `attempt`: 1-indexed attempt number
    /// * `max_attempts`: total attempt budget
    fn on_upload_attempt(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// The upload endpoint answered HTTP 429.
    ///
    /// `wait` is `Duration::ZERO` when no further attempt will be made.
    fn on_rate_limited(&self, attempt: u32, wait: Duration) {
        let _ = (attempt, wait);
    }

    /// The job was accepted and has a submission handle.
    fn on_submitted(&self, uuid: &str) {
        let _ = uuid;
    }

    /// A status poll returned.
    ///
    /// # Arguments
    /// * `poll`: 1-indexed poll count
    /// * `status`: raw status string reported by the service
    fn on_poll(&self, poll: u32, status: &str) {
        let _ = (poll, status);
    }

    /// The job succeeded and the Markdown was assembled.
    fn on_complete(&self, page_count: usize, markdown_len: usize) {
        let _ = (page_count, markdown_len);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl OcrProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::Doc2xConfig`].
pub type ProgressCallback = Arc<dyn OcrProgressCallback>;
