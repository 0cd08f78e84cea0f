//! Thin typed wrapper around the four Doc2X endpoints.
//!
//! Each method performs exactly one HTTP request. Retry and polling policy
//! lives in [`crate::pipeline`]; this module only maps responses to types or
//! to [`Doc2xError`].

use crate::api::{Envelope, LimitData, StatusData, TokenData, UploadData};
use crate::config::Doc2xConfig;
use crate::credential::{Endpoints, ResolvedCredential};
use crate::error::{Doc2xError, Stage};
use crate::pipeline::input::SourceDocument;
use reqwest::{multipart, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Outcome of one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Job accepted; the submission handle.
    Accepted(String),
    /// HTTP 429.
    RateLimited,
}

/// HTTP client bound to one Doc2X host.
#[derive(Debug, Clone)]
pub struct Doc2xClient {
    http: Client,
    base_url: String,
    api_timeout: Duration,
}

impl Doc2xClient {
    pub fn new(config: &Doc2xConfig) -> Result<Self, Doc2xError> {
        let http = Client::builder()
            .build()
            .map_err(|e| Doc2xError::Internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self::with_http(http, config))
    }

    /// Reuse an existing `reqwest::Client` (and its connection pool).
    pub fn with_http(http: Client, config: &Doc2xConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_timeout: config.api_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Exchange a legacy key for a bearer token.
    pub async fn refresh_token(&self, api_key: &str) -> Result<String, Doc2xError> {
        let url = Endpoints::refresh(&self.base_url);
        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .timeout(self.api_timeout)
            .send()
            .await
            .map_err(Doc2xError::transport(Stage::Refresh))?;
        let env: Envelope<TokenData> = read_json(Stage::Refresh, response).await?;
        Ok(env.data.token)
    }

    /// Remaining page quota for the credential.
    pub async fn remaining_quota(
        &self,
        credential: &ResolvedCredential,
        endpoints: &Endpoints,
    ) -> Result<serde_json::Number, Doc2xError> {
        debug!("GET {}", endpoints.quota);
        let response = self
            .http
            .get(&endpoints.quota)
            .bearer_auth(credential.token())
            .timeout(self.api_timeout)
            .send()
            .await
            .map_err(Doc2xError::transport(Stage::Quota))?;
        let env: Envelope<LimitData> = read_json(Stage::Quota, response).await?;
        Ok(env.data.remain)
    }

    /// Send one multipart upload. A 429 is reported as
    /// [`UploadOutcome::RateLimited`]; any other non-200 is an error.
    pub async fn submit_pdf(
        &self,
        credential: &ResolvedCredential,
        endpoints: &Endpoints,
        document: &SourceDocument,
        ocr_flag: &'static str,
    ) -> Result<UploadOutcome, Doc2xError> {
        let part = multipart::Part::stream_with_length(
            document.bytes.clone(),
            document.bytes.len() as u64,
        )
        .file_name(document.file_name.clone())
        .mime_str(&document.content_type)
        .map_err(|e| Doc2xError::Internal(format!("Invalid content type: {e}")))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("ocr", ocr_flag);

        debug!("POST {} ({} bytes, ocr={ocr_flag})", endpoints.upload, document.bytes.len());
        let response = self
            .http
            .post(&endpoints.upload)
            .bearer_auth(credential.token())
            .multipart(form)
            .timeout(self.api_timeout)
            .send()
            .await
            .map_err(Doc2xError::transport(Stage::Upload))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Ok(UploadOutcome::RateLimited);
        }
        let env: Envelope<UploadData> = read_json(Stage::Upload, response).await?;
        Ok(UploadOutcome::Accepted(env.data.uuid))
    }

    /// Fetch the current status of a submitted job.
    pub async fn job_status(
        &self,
        credential: &ResolvedCredential,
        endpoints: &Endpoints,
        uuid: &str,
    ) -> Result<StatusData, Doc2xError> {
        let url = Url::parse_with_params(&endpoints.status, &[("uuid", uuid)])
            .map_err(|e| Doc2xError::InvalidConfig(format!("Bad status URL: {e}")))?;
        let response = self
            .http
            .get(url)
            .bearer_auth(credential.token())
            .timeout(self.api_timeout)
            .send()
            .await
            .map_err(Doc2xError::transport(Stage::Status))?;
        let env: Envelope<StatusData> = read_json(Stage::Status, response).await?;
        Ok(env.data)
    }
}

/// Require HTTP 200 and decode the body, keeping the raw body on failure.
async fn read_json<T: DeserializeOwned>(stage: Stage, response: Response) -> Result<T, Doc2xError> {
    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return Err(Doc2xError::Api {
            stage,
            status: status.as_u16(),
            body,
        });
    }
    let bytes = response
        .bytes()
        .await
        .map_err(Doc2xError::transport(stage))?;
    serde_json::from_slice(&bytes).map_err(|e| Doc2xError::MalformedResponse {
        stage,
        detail: e.to_string(),
    })
}
