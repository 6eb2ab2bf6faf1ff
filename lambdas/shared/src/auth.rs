//! Request authorization
//!
//! Token issuance and signature checks belong to the identity provider and
//! the API Gateway authorizer in front of the Lambda. Pipeline code only asks
//! one question: is this request allowed through?

/// Access policy of an HTTP route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// `GET /open`
    Open,
    /// `GET /`, requires `Authorization: Bearer <token>`
    BearerToken,
}

impl Access {
    pub fn for_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path == "/open" || path.ends_with("/open") {
            Access::Open
        } else {
            Access::BearerToken
        }
    }
}

/// Opaque token check
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> bool;
}

/// Verifier for tokens already admitted by the gateway's user-pool authorizer
///
/// Signature and expiry were checked upstream; this only rejects values
/// that are not shaped like a JWT.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayVerifier;

impl TokenVerifier for GatewayVerifier {
    fn verify(&self, token: &str) -> bool {
        let segments: Vec<&str> = token.split('.').collect();
        segments.len() == 3 && segments.iter().all(|s| !s.is_empty())
    }
}

/// Token from an `Authorization` header value
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Whether a request may reach pipeline logic
pub fn is_authorized(
    access: Access,
    authorization: Option<&str>,
    verifier: &dyn TokenVerifier,
) -> bool {
    match access {
        Access::Open => true,
        Access::BearerToken => bearer_token(authorization).is_some_and(|t| verifier.verify(t)),
    }
}
