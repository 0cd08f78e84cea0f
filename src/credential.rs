//! Credential forms and the endpoint table they select.
//!
//! Doc2X exposes two API surfaces. Keys issued in their final form carry the
//! `sk-` prefix and talk to `/api/v1/...`; older keys must first be exchanged
//! through `/api/token/refresh` and then talk to `/api/platform/...`. The
//! form is decided once per invocation and every later call reads its URL
//! from [`Endpoints`].

use crate::error::Doc2xError;
use reqwest::header::HeaderValue;
use std::fmt;

/// Prefix that marks an already-exchanged key.
pub const ADVANCED_KEY_PREFIX: &str = "sk-";

/// Which Doc2X API surface a credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Final-form key, used as-is against `/api/v1`.
    Advanced,
    /// Key that needs a refresh exchange; the token talks to `/api/platform`.
    Legacy,
}

impl CredentialKind {
    /// Classify a raw key by its textual prefix.
    pub fn of(api_key: &str) -> Self {
        if api_key.starts_with(ADVANCED_KEY_PREFIX) {
            CredentialKind::Advanced
        } else {
            CredentialKind::Legacy
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Advanced => f.write_str("advanced"),
            CredentialKind::Legacy => f.write_str("legacy"),
        }
    }
}

/// The bearer token actually sent to Doc2X, with the surface it selects.
#[derive(Clone)]
pub struct ResolvedCredential {
    pub kind: CredentialKind,
    token: String,
}

impl ResolvedCredential {
    pub fn new(kind: CredentialKind, token: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("kind", &self.kind)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Reject keys that are empty or cannot travel in an `Authorization` header.
pub fn validate_api_key(api_key: &str) -> Result<(), Doc2xError> {
    if api_key.trim().is_empty() {
        return Err(Doc2xError::MissingApiKey);
    }
    HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
        Doc2xError::InvalidApiKey {
            reason: e.to_string(),
        }
    })?;
    Ok(())
}

/// Absolute URLs for one credential kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub quota: String,
    pub upload: String,
    pub status: String,
}

impl Endpoints {
    pub fn for_kind(base_url: &str, kind: CredentialKind) -> Self {
        let prefix = match kind {
            CredentialKind::Advanced => "/api/v1",
            CredentialKind::Legacy => "/api/platform",
        };
        Self {
            quota: format!("{base_url}{prefix}/limit"),
            upload: format!("{base_url}{prefix}/async/pdf"),
            status: format!("{base_url}{prefix}/async/status"),
        }
    }

    /// The refresh endpoint only exists on one surface.
    pub fn refresh(base_url: &str) -> String {
        format!("{base_url}/api/token/refresh")
    }
}
