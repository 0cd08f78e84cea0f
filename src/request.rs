//! The per-call input to [`crate::Doc2xOcr::run`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// One OCR (or quota) request.
///
/// The field names on the wire follow the tool-parameter contract of the
/// host framework (`pdf_url`, `correction`, `get_limit`). The API key comes
/// from the framework's credential store, not from tool parameters, so it
/// is skipped during (de)serialisation and attached with
/// [`InvocationRequest::with_api_key`].
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct InvocationRequest {
    #[serde(skip)]
    pub api_key: String,

    pub pdf_url: String,

    /// Ask Doc2X to run its OCR correction pass (sent as `ocr=1`).
    #[serde(rename = "correction", default)]
    pub enable_correction: bool,

    /// Only report the remaining page quota; nothing is uploaded.
    #[serde(rename = "get_limit", default)]
    pub quota_only: bool,
}

impl InvocationRequest {
    /// A plain OCR request with correction disabled.
    pub fn new(api_key: impl Into<String>, pdf_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            pdf_url: pdf_url.into(),
            enable_correction: false,
            quota_only: false,
        }
    }

    /// A quota-only request. `pdf_url` is still required to be non-empty by
    /// the tool contract, so callers pass the URL they would have converted.
    pub fn quota(api_key: impl Into<String>, pdf_url: impl Into<String>) -> Self {
        Self {
            quota_only: true,
            ..Self::new(api_key, pdf_url)
        }
    }

    /// Parse tool parameters (a JSON object) into a request.
    pub fn from_tool_parameters(
        api_key: impl Into<String>,
        params: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let req: Self = serde_json::from_value(params)?;
        Ok(req.with_api_key(api_key))
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn correction(mut self, on: bool) -> Self {
        self.enable_correction = on;
        self
    }

    /// Value of the multipart `ocr` field.
    pub(crate) fn ocr_flag(&self) -> &'static str {
        if self.enable_correction {
            "1"
        } else {
            "0"
        }
    }
}

impl fmt::Debug for InvocationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationRequest")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("pdf_url", &self.pdf_url)
            .field("enable_correction", &self.enable_correction)
            .field("quota_only", &self.quota_only)
            .finish()
    }
}
