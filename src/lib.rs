//! # doc2x-ocr
//!
//! Convert a PDF at a URL to Markdown through the
//! [Doc2X](https://doc2x.noedgeai.com) OCR service.
//!
//! The OCR itself happens remotely; this crate is the client side of the
//! exchange: credential refresh, an optional quota lookup, the upload with
//! its rate-limit retry, and the status poll.
//!
//! ## Pipeline Overview
//!
//! ```text
//! API key + PDF URL
//!  │
//!  ├─ 1. Credential  `sk-` keys as-is, otherwise POST /api/token/refresh
//!  ├─ 2. Quota       (get_limit only) GET …/limit and stop
//!  ├─ 3. Input       GET the PDF, require Content-Type application/pdf
//!  ├─ 4. Upload      multipart POST …/async/pdf, retry on 429
//!  ├─ 5. Poll        GET …/async/status?uuid=… until success
//!  └─ 6. Output      page Markdown joined by newlines
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2x_ocr::{Doc2xConfig, Doc2xOcr, InvocationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Doc2xConfig::builder().timeout_secs(900).build()?;
//!     let ocr = Doc2xOcr::new(config)?;
//!     let request = InvocationRequest::new(
//!         std::env::var("DOC2X_API_KEY")?,
//!         "https://arxiv.org/pdf/1706.03762",
//!     )
//!     .correction(true);
//!     println!("{}", ocr.run(request).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2x` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod adapter;
pub mod api;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use adapter::Doc2xOcr;
pub use client::Doc2xClient;
pub use config::{Doc2xConfig, Doc2xConfigBuilder, UnknownStatusPolicy, DEFAULT_BASE_URL};
pub use credential::{CredentialKind, ResolvedCredential};
pub use error::{Doc2xError, ErrorKind, Stage};
pub use output::{OcrOutput, OcrStats, TextResult};
pub use progress::{NoopProgressCallback, OcrProgressCallback, ProgressCallback};
pub use request::InvocationRequest;
pub use tokio_util::sync::CancellationToken;
