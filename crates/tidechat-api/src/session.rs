use async_trait::async_trait;
use axum::http::HeaderMap;

/// Black-box identity capability: given the inbound request's headers, yield
/// the authenticated subject or nothing. The service never authenticates on
/// its own; the subject is resolved to an owner id against the user store.
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<String>;
}

/// Trusts the subject header stamped by the auth proxy fronting this service.
pub struct HeaderSessions {
    subject_header: String,
}

impl HeaderSessions {
    pub fn new(subject_header: impl Into<String>) -> Self {
        Self {
            subject_header: subject_header.into(),
        }
    }
}

#[async_trait]
impl SessionAuthority for HeaderSessions {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(&self.subject_header)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    }
}
