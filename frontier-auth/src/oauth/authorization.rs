//! Authorization request types.

use std::collections::BTreeMap;

/// Extra query parameters merged into the outgoing authorization request.
pub type AuthorizationParams = BTreeMap<String, String>;

/// Authorization request with URL and the values needed to validate the callback.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Authorization URL to redirect the user to.
    pub url: String,
    /// CSRF state parameter for validation.
    pub state: String,
    /// PKCE verifier to be kept for the code exchange.
    pub pkce_verifier: Option<String>,
}
