//! Strategy configuration and the Frontier endpoint defaults.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{config_error, ConfigErrorKind, Error, ErrorKind};

/// Frontier authorization endpoint the user is redirected to for login.
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://auth.frontierstore.net/auth";
/// Frontier token endpoint used for the code-for-token exchange.
pub const DEFAULT_TOKEN_URL: &str = "https://auth.frontierstore.net/token";
/// Frontier endpoint returning the authenticated user's profile.
pub const DEFAULT_PROFILE_URL: &str = "https://auth.frontierstore.net/me";
/// Separator used to join requested scopes.
pub const DEFAULT_SCOPE_SEPARATOR: &str = " ";

/// Caller-supplied strategy configuration.
///
/// Optional fields left as `None` are filled with the Frontier defaults by
/// [`StrategyConfig::resolve`]. Any value the caller sets is kept unchanged.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// OAuth client ID issued by Frontier.
    pub client_id: String,
    /// OAuth client secret issued by Frontier.
    pub client_secret: SecretString,
    /// URL Frontier redirects back to after the user authorizes.
    pub callback_url: String,
    /// Permission scopes to request, in order.
    pub scope: Vec<String>,
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    pub scope_separator: Option<String>,
    pub profile_url: Option<String>,
    /// Send a PKCE challenge with the authorization request.
    pub pkce: bool,
}

/// Configuration with every default applied and every URL validated.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub callback_url: String,
    pub scope: Vec<String>,
    pub authorization_url: String,
    pub token_url: String,
    pub scope_separator: String,
    pub profile_url: String,
    pub pkce: bool,
}

impl StrategyConfig {
    /// Create a configuration with the required credentials and no scopes.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            callback_url: callback_url.into(),
            scope: Vec::new(),
            authorization_url: None,
            token_url: None,
            scope_separator: None,
            profile_url: None,
            pkce: false,
        }
    }

    /// Set the scopes to request.
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    /// Override the authorization endpoint.
    pub fn with_authorization_url(mut self, url: impl Into<String>) -> Self {
        self.authorization_url = Some(url.into());
        self
    }

    /// Override the token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Override the profile endpoint.
    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = Some(url.into());
        self
    }

    /// Override the scope separator.
    pub fn with_scope_separator(mut self, separator: impl Into<String>) -> Self {
        self.scope_separator = Some(separator.into());
        self
    }

    /// Enable or disable PKCE.
    pub fn with_pkce(mut self, pkce: bool) -> Self {
        self.pkce = pkce;
        self
    }

    /// Apply defaults to omitted fields and validate the result.
    ///
    /// Fails with a configuration error when a required credential is empty or
    /// when an endpoint is not an absolute URL. Performs no I/O.
    pub fn resolve(&self) -> Result<ResolvedConfig, Error> {
        if self.client_id.is_empty() {
            return Err(config_error(
                ConfigErrorKind::MissingClientId,
                "Strategy requires a client ID",
            ));
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err(config_error(
                ConfigErrorKind::MissingClientSecret,
                "Strategy requires a client secret",
            ));
        }
        if self.callback_url.is_empty() {
            return Err(config_error(
                ConfigErrorKind::MissingCallbackUrl,
                "Strategy requires a callback URL",
            ));
        }

        let resolved = ResolvedConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            callback_url: self.callback_url.clone(),
            scope: self.scope.clone(),
            authorization_url: self
                .authorization_url
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHORIZATION_URL.to_string()),
            token_url: self
                .token_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            scope_separator: self
                .scope_separator
                .clone()
                .unwrap_or_else(|| DEFAULT_SCOPE_SEPARATOR.to_string()),
            profile_url: self
                .profile_url
                .clone()
                .unwrap_or_else(|| DEFAULT_PROFILE_URL.to_string()),
            pkce: self.pkce,
        };

        for url in [
            &resolved.authorization_url,
            &resolved.token_url,
            &resolved.profile_url,
            &resolved.callback_url,
        ] {
            validate_url(url)?;
        }

        Ok(resolved)
    }
}

fn validate_url(url: &str) -> Result<(), Error> {
    Url::parse(url).map(|_| ()).map_err(|e| Error {
        source: Some(format!("{url}: {e}").into()),
        error_kind: ErrorKind::Config(ConfigErrorKind::InvalidUrl),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StrategyConfig {
        StrategyConfig::new("id", "secret", "http://localhost:5000/callback")
            .with_scope(["auth", "capi"])
    }

    #[test]
    fn test_defaults_applied_when_omitted() {
        let resolved = base().resolve().unwrap();
        assert_eq!(resolved.authorization_url, DEFAULT_AUTHORIZATION_URL);
        assert_eq!(resolved.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(resolved.scope_separator, DEFAULT_SCOPE_SEPARATOR);
        assert_eq!(resolved.profile_url, DEFAULT_PROFILE_URL);
        assert_eq!(resolved.scope, vec!["auth".to_string(), "capi".to_string()]);
        assert!(!resolved.pkce);
    }

    #[test]
    fn test_supplied_values_win() {
        let resolved = base()
            .with_authorization_url("https://example.test/authorize")
            .with_token_url("https://example.test/oauth/token")
            .with_profile_url("https://example.test/userinfo")
            .with_scope_separator(",")
            .resolve()
            .unwrap();
        assert_eq!(resolved.authorization_url, "https://example.test/authorize");
        assert_eq!(resolved.token_url, "https://example.test/oauth/token");
        assert_eq!(resolved.profile_url, "https://example.test/userinfo");
        assert_eq!(resolved.scope_separator, ",");
    }

    #[test]
    fn test_empty_separator_is_kept() {
        let resolved = base().with_scope_separator("").resolve().unwrap();
        assert_eq!(resolved.scope_separator, "");
    }

    #[test]
    fn test_missing_client_id() {
        let err = StrategyConfig::new("", "secret", "http://localhost/cb")
            .resolve()
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Config(ConfigErrorKind::MissingClientId)
        );
    }

    #[test]
    fn test_missing_client_secret() {
        let err = StrategyConfig::new("id", "", "http://localhost/cb")
            .resolve()
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Config(ConfigErrorKind::MissingClientSecret)
        );
    }

    #[test]
    fn test_missing_callback_url() {
        let err = StrategyConfig::new("id", "secret", "").resolve().unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Config(ConfigErrorKind::MissingCallbackUrl)
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = base().with_token_url("not a url").resolve().unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Config(ConfigErrorKind::InvalidUrl));
    }
}
