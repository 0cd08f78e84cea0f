//! Status polling and page assembly.
//!
//! The loop has no iteration cap of its own. The caller bounds it through
//! `Doc2xConfig::timeout_secs` or a cancellation token (see
//! [`crate::adapter`]).

use crate::api::{JobStatus, Page};
use crate::client::Doc2xClient;
use crate::config::{Doc2xConfig, UnknownStatusPolicy};
use crate::credential::{Endpoints, ResolvedCredential};
use crate::error::Doc2xError;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Assembled text of a successful job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobText {
    /// Each page's `md` followed by `\n`, in service order.
    pub text: String,
    pub page_count: usize,
    pub polls: u32,
}

/// Poll `uuid` until it reaches a terminal state.
pub async fn wait_for_result(
    client: &Doc2xClient,
    credential: &ResolvedCredential,
    endpoints: &Endpoints,
    uuid: &str,
    config: &Doc2xConfig,
) -> Result<JobText, Doc2xError> {
    let interval = config.poll_interval();
    let mut polls = 0u32;

    loop {
        let data = client.job_status(credential, endpoints, uuid).await?;
        polls += 1;
        debug!("Job {uuid}: poll {polls} → {}", data.status);
        if let Some(ref cb) = config.progress_callback {
            cb.on_poll(polls, &data.status);
        }

        match JobStatus::parse(&data.status) {
            JobStatus::Ready | JobStatus::Processing => {
                sleep(interval).await;
            }
            JobStatus::PagesLimitExceeded => return Err(Doc2xError::PagesLimitExceeded),
            JobStatus::Success => {
                let pages = data.result.map(|r| r.pages).unwrap_or_default();
                let text = assemble_pages(&pages);
                info!("Job {uuid} finished: {} pages after {polls} polls", pages.len());
                return Ok(JobText {
                    text,
                    page_count: pages.len(),
                    polls,
                });
            }
            JobStatus::Other(status) => match config.unknown_status {
                UnknownStatusPolicy::Fail => {
                    return Err(Doc2xError::UnknownStatus {
                        uuid: uuid.to_string(),
                        status,
                    });
                }
                UnknownStatusPolicy::Wait => {
                    warn!("Job {uuid}: unrecognised status '{status}', polling again");
                    sleep(interval).await;
                }
            },
        }
    }
}

/// Concatenate page Markdown, each page terminated by a newline.
pub fn assemble_pages(pages: &[Page]) -> String {
    let mut out = String::with_capacity(pages.iter().map(|p| p.md.len() + 1).sum());
    for page in pages {
        out.push_str(&page.md);
        out.push('\n');
    }
    out
}
