//! Configuration for the Doc2X adapter.
//!
//! Every knob that used to be a literal (the service host, per-call
//! timeouts, the rate-limit back-off, the poll interval) lives in
//! [`Doc2xConfig`], built via [`Doc2xConfigBuilder`]. Tests point
//! `base_url` at a mock server and shrink the waits to milliseconds.

use crate::error::Doc2xError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Production Doc2X host.
pub const DEFAULT_BASE_URL: &str = "https://api.doc2x.noedgeai.com";

/// Configuration for a [`crate::Doc2xOcr`] adapter.
///
/// # Example
/// ```rust
/// use doc2x_ocr::{Doc2xConfig, UnknownStatusPolicy};
///
/// let config = Doc2xConfig::builder()
///     .timeout_secs(600)
///     .unknown_status(UnknownStatusPolicy::Fail)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_upload_attempts, 3);
/// ```
#[derive(Clone)]
pub struct Doc2xConfig {
    /// Scheme and host of the Doc2X API, without a trailing slash.
    pub base_url: String,

    /// Timeout for each Doc2X API call in seconds. Default: 30.
    pub api_timeout_secs: u64,

    /// Timeout for fetching the source PDF in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Wait after an HTTP 429 from the upload endpoint, in milliseconds. Default: 10 000.
    ///
    /// Doc2X enforces a low requests-per-minute cap on uploads, so the wait
    /// is long and fixed rather than exponential.
    pub rate_limit_backoff_ms: u64,

    /// Sleep between status polls while the job is `ready` or `processing`. Default: 1 000.
    pub poll_interval_ms: u64,

    /// Total upload attempts, rate-limited ones included. Default: 3.
    pub max_upload_attempts: u32,

    /// Overall bound on a single invocation in seconds. Default: None (unbounded).
    ///
    /// The status poll has no natural end if the service never reaches a
    /// terminal state; set this in production.
    pub timeout_secs: Option<u64>,

    /// What to do when the status endpoint reports a value the adapter does
    /// not recognise. Default: [`UnknownStatusPolicy::Wait`].
    pub unknown_status: UnknownStatusPolicy,

    /// Optional lifecycle event sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for Doc2xConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_timeout_secs: 30,
            download_timeout_secs: 120,
            rate_limit_backoff_ms: 10_000,
            poll_interval_ms: 1_000,
            max_upload_attempts: 3,
            timeout_secs: None,
            unknown_status: UnknownStatusPolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for Doc2xConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Doc2xConfig")
            .field("base_url", &self.base_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("rate_limit_backoff_ms", &self.rate_limit_backoff_ms)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_upload_attempts", &self.max_upload_attempts)
            .field("timeout_secs", &self.timeout_secs)
            .field("unknown_status", &self.unknown_status)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn OcrProgressCallback>"),
            )
            .finish()
    }
}

impl Doc2xConfig {
    /// Create a new builder for `Doc2xConfig`.
    pub fn builder() -> Doc2xConfigBuilder {
        Doc2xConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_millis(self.rate_limit_backoff_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Builder for [`Doc2xConfig`].
#[derive(Debug)]
pub struct Doc2xConfigBuilder {
    config: Doc2xConfig,
}

impl Doc2xConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn rate_limit_backoff_ms(mut self, ms: u64) -> Self {
        self.config.rate_limit_backoff_ms = ms;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    pub fn max_upload_attempts(mut self, n: u32) -> Self {
        self.config.max_upload_attempts = n;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn unknown_status(mut self, policy: UnknownStatusPolicy) -> Self {
        self.config.unknown_status = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<Doc2xConfig, Doc2xError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Doc2xConfig {
    /// Check the invariants [`Doc2xConfigBuilder::build`] enforces.
    pub fn validate(&self) -> Result<(), Doc2xError> {
        let c = self;
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(Doc2xError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        if c.max_upload_attempts == 0 {
            return Err(Doc2xError::InvalidConfig(
                "max upload attempts must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 || c.download_timeout_secs == 0 {
            return Err(Doc2xError::InvalidConfig(
                "timeouts must be ≥ 1 second".into(),
            ));
        }
        if c.timeout_secs == Some(0) {
            return Err(Doc2xError::InvalidConfig(
                "overall timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(())
    }
}

/// Handling of job statuses other than `ready`, `processing`,
/// `pages limit exceeded` and `success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownStatusPolicy {
    /// Log a warning, sleep one poll interval and poll again. (default)
    #[default]
    Wait,
    /// Fail with [`Doc2xError::UnknownStatus`].
    Fail,
}
