use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::types::internal::auth::TokenKind;
use crate::types::internal::context::RequestContext;
use poem::Request;
use poem_openapi::auth::Bearer;

/// Client address, preferring proxy headers over the socket peer
pub fn extract_ip_address(req: &Request) -> Option<String> {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            return Some(ip.trim().to_string());
        }
    }

    // Check X-Real-IP header (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        return Some(real_ip.trim().to_string());
    }

    req.remote_addr().as_socket_addr().map(|addr| addr.ip().to_string())
}

/// Build the context for an authenticated request
///
/// Only access tokens are accepted as bearer credentials; refresh and
/// single-purpose tokens fail with a kind mismatch.
pub fn create_request_context(
    req: &Request,
    bearer: &Bearer,
    token_provider: &TokenProvider,
) -> Result<RequestContext, InternalError> {
    let mut ctx = RequestContext::new();
    if let Some(ip) = extract_ip_address(req) {
        ctx = ctx.with_ip_address(ip);
    }

    match token_provider.verify(&bearer.token, TokenKind::Access) {
        Ok(claims) => {
            tracing::debug!(request_id = %ctx.request_id, user_id = %claims.sub, "Request authenticated");
            Ok(ctx.with_claims(claims))
        }
        Err(e) => {
            tracing::debug!(request_id = %ctx.request_id, ip = ?ctx.ip_address, "Bearer token rejected: {}", e);
            Err(e)
        }
    }
}
