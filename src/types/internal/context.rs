use uuid::Uuid;

use crate::types::internal::auth::Claims;

/// Request context built by the API layer for every inbound call
///
/// Carries the caller identity resolved from the bearer access token plus the
/// identifiers used to correlate log lines for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<String>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: String,

    /// Verified access-token claims, if the request carried one
    pub claims: Option<Claims>,
}

impl RequestContext {
    /// Create a new anonymous RequestContext with a generated request_id
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: Uuid::new_v4().to_string(),
            claims: None,
        }
    }

    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = Some(claims);
        self
    }

    pub fn authenticated(&self) -> bool {
        self.claims.is_some()
    }

    /// Opaque caller identity; "anonymous" when unauthenticated
    pub fn actor_id(&self) -> &str {
        self.claims.as_ref().map(|c| c.sub.as_str()).unwrap_or("anonymous")
    }

    pub fn is_admin(&self) -> bool {
        self.claims.as_ref().map(|c| c.is_admin).unwrap_or(false)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
