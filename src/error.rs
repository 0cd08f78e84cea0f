//! Error types for the doc2x-ocr library.
//!
//! Every failure is a [`Doc2xError`]. Callers that only care about the two
//! observable categories (bad credential vs. anything else) can match on
//! [`Doc2xError::kind`] instead of the individual variants:
//!
//! * [`ErrorKind::Credential`]: the API key is missing or unusable. Always
//!   raised before any network activity.
//! * [`ErrorKind::Invocation`]: every other failure, such as bad input, a non-200
//!   response at any stage, exhausted upload retries, a page-limit status,
//!   an empty result, timeout or cancellation.
//!
//! Variants that wrap a remote response keep the raw body so the host
//! framework can show the service's own message to the user.

use std::fmt;
use thiserror::Error;

/// The two categories of failure surfaced at the adapter boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid API key.
    Credential,
    /// Any other failure.
    Invocation,
}

/// Which remote call produced an [`Doc2xError::Api`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Refresh,
    Quota,
    Upload,
    Status,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Refresh => "token refresh",
            Stage::Quota => "quota",
            Stage::Upload => "upload",
            Stage::Status => "status",
        };
        f.write_str(s)
    }
}

/// All errors returned by the doc2x-ocr library.
#[derive(Debug, Error)]
pub enum Doc2xError {
    // ── Credential errors ─────────────────────────────────────────────────
    /// No API key was supplied.
    #[error("Please input a Doc2X API key")]
    MissingApiKey,

    /// The key contains characters that cannot be sent in an HTTP header.
    #[error("Invalid Doc2X API key: {reason}")]
    InvalidApiKey { reason: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// The PDF URL was empty.
    #[error("Please input a PDF URL")]
    EmptyUrl,

    /// Fetching the source document failed (transport error or non-success status).
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Fetching the source document exceeded the download timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The document URL did not serve `application/pdf`.
    #[error("The URL is not a PDF: '{url}' returned Content-Type {content_type:?}")]
    NotAPdf { url: String, content_type: String },

    // ── Remote API errors ─────────────────────────────────────────────────
    /// A Doc2X endpoint answered with a non-200 status.
    #[error("Doc2X {stage} request failed (HTTP {status}): {body}")]
    Api {
        stage: Stage,
        status: u16,
        body: String,
    },

    /// The request to a Doc2X endpoint never produced a response.
    #[error("Doc2X {stage} request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    /// A 200 response did not have the expected JSON shape.
    #[error("Unexpected Doc2X {stage} response: {detail}")]
    MalformedResponse { stage: Stage, detail: String },

    /// Every upload attempt was rate limited, or the service returned no job handle.
    #[error("Failed to upload the PDF to Doc2X after {attempts} attempts")]
    UploadFailed { attempts: u32 },

    /// The job status reported that the account's page allowance is used up.
    #[error("Doc2X pages limit exceeded")]
    PagesLimitExceeded,

    /// The job status was not one of the known values.
    #[error("Doc2X returned an unknown job status '{status}' for {uuid}")]
    UnknownStatus { uuid: String, status: String },

    /// The job succeeded but produced no text.
    #[error("Failed to get the result from Doc2X")]
    EmptyResult,

    // ── Lifecycle errors ──────────────────────────────────────────────────
    /// The overall invocation timeout elapsed.
    #[error("Doc2X OCR timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The caller cancelled the invocation.
    #[error("Doc2X OCR was cancelled")]
    Cancelled,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Doc2xError {
    /// Collapse the variant into one of the two boundary categories.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Doc2xError::MissingApiKey | Doc2xError::InvalidApiKey { .. } => ErrorKind::Credential,
            _ => ErrorKind::Invocation,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Credential`.
    pub fn is_credential_error(&self) -> bool {
        self.kind() == ErrorKind::Credential
    }

    pub(crate) fn transport(stage: Stage) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Doc2xError::Transport { stage, source }
    }
}
