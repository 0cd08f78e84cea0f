//! PDF submission with the bounded rate-limit retry.
//!
//! ## Retry Strategy
//!
//! Doc2X's upload endpoint has a low requests-per-minute cap and answers
//! HTTP 429 when it is hit. Only 429 is retried: the adapter waits a fixed
//! `rate_limit_backoff_ms` (10 s by default) and tries again, up to
//! `max_upload_attempts` attempts in total. Any other non-200 fails at once.

use crate::client::{Doc2xClient, UploadOutcome};
use crate::config::Doc2xConfig;
use crate::credential::{Endpoints, ResolvedCredential};
use crate::error::Doc2xError;
use crate::pipeline::input::SourceDocument;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// A successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub uuid: String,
    /// 1-indexed attempt that was accepted.
    pub attempts: u32,
}

/// Upload `document`, retrying on HTTP 429.
///
/// A 200 response with an empty `uuid` yields no job handle and fails with
/// [`Doc2xError::UploadFailed`] without polling.
pub async fn submit_with_retry(
    client: &Doc2xClient,
    credential: &ResolvedCredential,
    endpoints: &Endpoints,
    document: &SourceDocument,
    ocr_flag: &'static str,
    config: &Doc2xConfig,
) -> Result<Submission, Doc2xError> {
    let max = config.max_upload_attempts;
    let backoff = config.rate_limit_backoff();

    for attempt in 1..=max {
        if let Some(ref cb) = config.progress_callback {
            cb.on_upload_attempt(attempt, max);
        }

        match client
            .submit_pdf(credential, endpoints, document, ocr_flag)
            .await?
        {
            UploadOutcome::Accepted(uuid) if uuid.trim().is_empty() => {
                warn!("Upload accepted without a job handle (attempt {attempt}/{max})");
                return Err(Doc2xError::UploadFailed { attempts: attempt });
            }
            UploadOutcome::Accepted(uuid) => {
                info!("Submitted PDF as job {uuid} (attempt {attempt}/{max})");
                if let Some(ref cb) = config.progress_callback {
                    cb.on_submitted(&uuid);
                }
                return Ok(Submission {
                    uuid,
                    attempts: attempt,
                });
            }
            UploadOutcome::RateLimited => {
                let wait = if attempt < max { backoff } else { Duration::ZERO };
                warn!(
                    "Upload rate limited (attempt {attempt}/{max}), waiting {}ms",
                    wait.as_millis()
                );
                if let Some(ref cb) = config.progress_callback {
                    cb.on_rate_limited(attempt, wait);
                }
                if !wait.is_zero() {
                    sleep(wait).await;
                }
            }
        }
    }

    Err(Doc2xError::UploadFailed { attempts: max })
}
