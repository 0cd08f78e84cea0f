//! Result types returned by [`crate::Doc2xOcr`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single text payload produced by an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TextResult {
    /// Remaining page quota, exactly as reported in `data.remain`.
    Quota(serde_json::Number),
    /// Concatenated Markdown of every page.
    Markdown(String),
}

impl TextResult {
    /// The text message handed back to the host framework.
    pub fn text(&self) -> String {
        self.to_string()
    }

    pub fn as_markdown(&self) -> Option<&str> {
        match self {
            TextResult::Markdown(md) => Some(md),
            TextResult::Quota(_) => None,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TextResult::Markdown(md) => md,
            TextResult::Quota(n) => n.to_string(),
        }
    }
}

impl fmt::Display for TextResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextResult::Quota(n) => write!(f, "{n}"),
            TextResult::Markdown(md) => f.write_str(md),
        }
    }
}

/// Timing and size figures for a completed OCR job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrStats {
    pub document_bytes: usize,
    pub upload_attempts: u32,
    pub polls: u32,
    pub page_count: usize,
    pub total_duration_ms: u64,
}

/// A finished OCR job: the Markdown plus its stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    pub uuid: String,
    pub markdown: String,
    pub stats: OcrStats,
}
