//! OAuth token types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// Tokens returned by the code-for-token exchange.
///
/// Owned by the client collaborator; the strategy only reads them.
#[derive(Debug, Clone)]
pub struct Tokens {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Refresh token for obtaining new access tokens.
    pub refresh_token: Option<SecretString>,
    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Granted scopes, when the provider reports them.
    pub scopes: Vec<String>,
}
