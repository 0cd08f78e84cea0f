//! The Doc2X OCR adapter: one invocation from request to text.
//!
//! ## Call sequence
//!
//! ```text
//! validate ──▶ refresh? ──▶ quota? ──▶ fetch PDF ──▶ upload (429 retry) ──▶ poll ──▶ text
//!              (legacy)     (short-circuit)
//! ```
//!
//! No two requests are ever in flight at once; each step needs the previous
//! one's result. The only suspension points besides the HTTP round trips are
//! the rate-limit back-off and the poll interval.

use crate::client::Doc2xClient;
use crate::config::Doc2xConfig;
use crate::credential::{validate_api_key, CredentialKind, Endpoints, ResolvedCredential};
use crate::error::Doc2xError;
use crate::output::{OcrOutput, OcrStats, TextResult};
use crate::pipeline::{input, poll, upload};
use crate::request::InvocationRequest;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Converts PDF URLs to Markdown through Doc2X.
///
/// Cheap to clone; clones share the underlying connection pool. Holds no
/// per-invocation state.
///
/// # Example
/// ```rust,no_run
/// use doc2x_ocr::{Doc2xConfig, Doc2xOcr, InvocationRequest};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let ocr = Doc2xOcr::new(Doc2xConfig::builder().timeout_secs(600).build()?)?;
///     let req = InvocationRequest::new("sk-...", "https://arxiv.org/pdf/1706.03762");
///     println!("{}", ocr.run(req).await?);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Doc2xOcr {
    client: Doc2xClient,
    config: Doc2xConfig,
}

impl Doc2xOcr {
    /// Validates `config` the same way [`crate::Doc2xConfigBuilder::build`]
    /// does, so struct-literal configs cannot skip the checks.
    pub fn new(config: Doc2xConfig) -> Result<Self, Doc2xError> {
        config.validate()?;
        let client = Doc2xClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// Build around an existing client, e.g. one with a custom `reqwest::Client`.
    pub fn with_client(client: Doc2xClient, config: Doc2xConfig) -> Result<Self, Doc2xError> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Doc2xConfig {
        &self.config
    }

    /// Run one invocation: the remaining quota when `quota_only` is set,
    /// otherwise the OCR'd Markdown.
    ///
    /// # Errors
    /// - [`Doc2xError::MissingApiKey`] / [`Doc2xError::InvalidApiKey`] before any request
    /// - [`Doc2xError::EmptyUrl`] before any request
    /// - any non-200 response, as [`Doc2xError::Api`] with the body
    /// - [`Doc2xError::Timeout`] when `timeout_secs` elapses
    pub async fn run(&self, request: InvocationRequest) -> Result<TextResult, Doc2xError> {
        self.bounded(self.run_unbounded(request)).await
    }

    /// [`Doc2xOcr::run`], aborted with [`Doc2xError::Cancelled`] once `cancel` fires.
    pub async fn run_with_cancel(
        &self,
        request: InvocationRequest,
        cancel: CancellationToken,
    ) -> Result<TextResult, Doc2xError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("OCR invocation cancelled");
                Err(Doc2xError::Cancelled)
            }
            result = self.run(request) => result,
        }
    }

    /// Synchronous wrapper around [`Doc2xOcr::run`].
    ///
    /// Creates a temporary tokio runtime internally; do not call from
    /// inside an async context.
    pub fn run_sync(&self, request: InvocationRequest) -> Result<TextResult, Doc2xError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| Doc2xError::Internal(format!("Failed to create tokio runtime: {}", e)))?
            .block_on(self.run(request))
    }

    /// Convert the PDF regardless of `quota_only`, returning per-job stats.
    pub async fn convert(&self, request: InvocationRequest) -> Result<OcrOutput, Doc2xError> {
        self.bounded(async {
            validate(&request)?;
            let credential = self.resolve_credential(&request.api_key).await?;
            self.convert_with(&credential, &request).await
        })
        .await
    }

    /// Remaining page quota for `api_key`.
    pub async fn remaining_quota(&self, api_key: &str) -> Result<serde_json::Number, Doc2xError> {
        self.bounded(async {
            validate_api_key(api_key)?;
            let credential = self.resolve_credential(api_key).await?;
            self.quota_with(&credential).await
        })
        .await
    }

    /// Turn a raw key into the token sent on every later call.
    ///
    /// `sk-` keys pass through; anything else goes through the refresh
    /// exchange first. The endpoint surface follows the token that is
    /// actually sent, so a refresh that hands back an `sk-` token uses the
    /// advanced endpoints.
    pub async fn resolve_credential(&self, api_key: &str) -> Result<ResolvedCredential, Doc2xError> {
        let credential = match CredentialKind::of(api_key) {
            CredentialKind::Advanced => ResolvedCredential::new(CredentialKind::Advanced, api_key),
            CredentialKind::Legacy => {
                debug!("Refreshing legacy Doc2X key");
                let token = self.client.refresh_token(api_key).await?;
                ResolvedCredential::new(CredentialKind::of(&token), token)
            }
        };
        let kind = credential.kind;
        info!("Using {} Doc2X credential", kind);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_credential_resolved(kind);
        }
        Ok(credential)
    }

    async fn run_unbounded(&self, request: InvocationRequest) -> Result<TextResult, Doc2xError> {
        validate(&request)?;
        let credential = self.resolve_credential(&request.api_key).await?;

        if request.quota_only {
            return self.quota_with(&credential).await.map(TextResult::Quota);
        }

        let output = self.convert_with(&credential, &request).await?;
        Ok(TextResult::Markdown(output.markdown))
    }

    async fn quota_with(
        &self,
        credential: &ResolvedCredential,
    ) -> Result<serde_json::Number, Doc2xError> {
        let endpoints = Endpoints::for_kind(self.client.base_url(), credential.kind);
        let remain = self.client.remaining_quota(credential, &endpoints).await?;
        info!("Doc2X quota remaining: {remain}");
        Ok(remain)
    }

    async fn convert_with(
        &self,
        credential: &ResolvedCredential,
        request: &InvocationRequest,
    ) -> Result<OcrOutput, Doc2xError> {
        let start = Instant::now();
        let endpoints = Endpoints::for_kind(self.client.base_url(), credential.kind);

        // ── Step 1: Fetch the source document ────────────────────────────
        let document = input::fetch_pdf(
            self.client.http(),
            &request.pdf_url,
            self.config.download_timeout(),
        )
        .await?;
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_document_fetched(document.bytes.len());
        }

        // ── Step 2: Submit ───────────────────────────────────────────────
        let submission = upload::submit_with_retry(
            &self.client,
            credential,
            &endpoints,
            &document,
            request.ocr_flag(),
            &self.config,
        )
        .await?;

        // ── Step 3: Poll until terminal ──────────────────────────────────
        let job = poll::wait_for_result(
            &self.client,
            credential,
            &endpoints,
            &submission.uuid,
            &self.config,
        )
        .await?;
        if job.text.is_empty() {
            return Err(Doc2xError::EmptyResult);
        }

        // ── Step 4: Assemble ─────────────────────────────────────────────
        let mut markdown = job.text;
        markdown.push('\n');

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_complete(job.page_count, markdown.len());
        }

        Ok(OcrOutput {
            uuid: submission.uuid,
            stats: OcrStats {
                document_bytes: document.bytes.len(),
                upload_attempts: submission.attempts,
                polls: job.polls,
                page_count: job.page_count,
                total_duration_ms: start.elapsed().as_millis() as u64,
            },
            markdown,
        })
    }

    /// Apply the overall `timeout_secs` bound, if configured.
    async fn bounded<T, F>(&self, fut: F) -> Result<T, Doc2xError>
    where
        F: Future<Output = Result<T, Doc2xError>>,
    {
        match self.config.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
                .await
                .map_err(|_| Doc2xError::Timeout { secs })?,
            None => fut.await,
        }
    }
}

/// Input checks that must pass before any network activity.
fn validate(request: &InvocationRequest) -> Result<(), Doc2xError> {
    validate_api_key(&request.api_key)?;
    if request.pdf_url.trim().is_empty() {
        return Err(Doc2xError::EmptyUrl);
    }
    Ok(())
}
