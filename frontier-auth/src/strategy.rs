//! The Frontier authentication strategy.
//!
//! Wraps an [`OAuth2Client`] with the Frontier endpoints, fetches and
//! normalizes the user profile once a token is issued, and hands the result to
//! an application-supplied [`Verify`] implementation.

use async_trait::async_trait;
use chrono::Utc;
use log::*;
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::config::{ResolvedConfig, StrategyConfig};
use crate::error::{oauth_error, profile_fetch_error, Error, OAuthErrorKind};
use crate::http::{HttpClient, HttpClientBuilder};
use crate::oauth::{AuthorizationParams, AuthorizationRequest, Client, OAuth2Client};
use crate::profile::NormalizedProfile;

/// Name the host uses to route authentication requests to this strategy.
pub const STRATEGY_NAME: &str = "frontier";

/// Application hook deciding whether a fetched profile is an authenticated user.
///
/// Return `Ok(Some(user))` to accept, `Ok(None)` to reject the credentials, or
/// `Err` if verification itself failed.
#[async_trait]
pub trait Verify: Send + Sync {
    type User: Send;

    async fn verify(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        profile: NormalizedProfile,
    ) -> Result<Option<Self::User>, Error>;
}

/// Per-request authorization options.
#[derive(Debug, Clone, Default)]
pub struct AuthorizeOptions {
    /// Audience to request the token for.
    pub audience: Option<String>,
    /// Scopes for this request only; the configured scopes are used when `None`.
    pub scope: Option<Vec<String>>,
}

/// Values received on the callback plus those kept from the authorization request.
#[derive(Debug, Clone)]
pub struct CallbackParams {
    /// Authorization code from the provider.
    pub code: String,
    /// State returned by the provider.
    pub state: String,
    /// State issued with the authorization request.
    pub expected_state: String,
    /// PKCE verifier issued with the authorization request.
    pub pkce_verifier: Option<String>,
}

/// Frontier OAuth 2.0 strategy.
///
/// Holds only immutable configuration after construction and can be shared
/// across requests behind an `Arc`.
pub struct Strategy<V: Verify> {
    config: ResolvedConfig,
    client: Box<dyn OAuth2Client>,
    verify: V,
}

impl<V: Verify> Strategy<V> {
    /// Create a strategy with a default HTTP client.
    pub fn new(config: StrategyConfig, verify: V) -> Result<Self, Error> {
        let http = HttpClientBuilder::new().build()?;
        Self::with_http_client(config, http, verify)
    }

    /// Create a strategy that sends its requests through `http`.
    ///
    /// The access token is sent in the `Authorization` header when fetching the profile.
    pub fn with_http_client(
        config: StrategyConfig,
        http: HttpClient,
        verify: V,
    ) -> Result<Self, Error> {
        let config = config.resolve()?;
        let client = Client::new(&config, http)?.use_authorization_header_for_get(true);

        debug!(
            "Configured {} strategy: authorization_url={}, token_url={}, profile_url={}",
            STRATEGY_NAME, config.authorization_url, config.token_url, config.profile_url
        );

        Ok(Self {
            config,
            client: Box::new(client),
            verify,
        })
    }

    /// Create a strategy around an existing OAuth 2.0 client.
    pub fn with_client<C>(config: StrategyConfig, client: C, verify: V) -> Result<Self, Error>
    where
        C: OAuth2Client + 'static,
    {
        Ok(Self {
            config: config.resolve()?,
            client: Box::new(client),
            verify,
        })
    }

    /// The strategy identifier.
    pub fn name(&self) -> &'static str {
        STRATEGY_NAME
    }

    /// The effective configuration, defaults applied.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Extra parameters to include in the authorization request.
    ///
    /// Contains `audience` when the caller set it, and nothing else.
    pub fn authorization_params(&self, options: &AuthorizeOptions) -> AuthorizationParams {
        let mut params = AuthorizationParams::new();
        if let Some(audience) = &options.audience {
            params.insert("audience".to_string(), audience.clone());
        }
        params
    }

    /// Build the redirect to the provider's authorization endpoint.
    ///
    /// The returned state (and PKCE verifier, if any) must be kept by the caller
    /// and passed back through [`CallbackParams`].
    pub fn authorization_request(&self, options: &AuthorizeOptions) -> AuthorizationRequest {
        let scope = options.scope.as_ref().unwrap_or(&self.config.scope);
        let params = self.authorization_params(options);
        self.client.authorize_url(scope, &params)
    }

    /// Retrieve the user profile from Frontier and normalize it.
    ///
    /// Performs one authenticated GET to the profile endpoint. Transport and
    /// non-2xx failures are reported as fetch errors, unparseable bodies as
    /// parse errors. Nothing is retried here.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<NormalizedProfile, Error> {
        if access_token.is_empty() {
            return Err(oauth_error(
                OAuthErrorKind::MissingAccessToken,
                "An access token is required to fetch the user profile",
            ));
        }

        let body = self
            .client
            .get(&self.config.profile_url, access_token)
            .await
            .map_err(|e| {
                warn!("Failed to fetch the user profile: {}", e);
                profile_fetch_error(e)
            })?;

        let profile = NormalizedProfile::from_body(&body, access_token, Utc::now()).map_err(|e| {
            warn!("Failed to parse the user profile: {:?}", e.source);
            e
        })?;

        debug!("Fetched profile for user {:?}", profile.id());

        Ok(profile)
    }

    /// Complete an authentication attempt from the provider's callback.
    ///
    /// Checks the state, exchanges the code, fetches the profile and then calls
    /// the verify hook exactly once. Any failure before verification ends the
    /// attempt with an error and the hook is not called.
    pub async fn authenticate(&self, callback: CallbackParams) -> Result<Option<V::User>, Error> {
        if !state_matches(&callback.state, &callback.expected_state) {
            warn!("Rejecting callback with mismatched state");
            return Err(oauth_error(
                OAuthErrorKind::InvalidState,
                "Unable to verify authorization request state",
            ));
        }

        let tokens = self
            .client
            .exchange_code(&callback.code, callback.pkce_verifier.as_deref())
            .await?;

        let access_token = tokens.access_token.expose_secret();
        let refresh_token = tokens
            .refresh_token
            .as_ref()
            .map(|token| token.expose_secret().as_str());

        let profile = self.fetch_profile(access_token).await?;
        let user = self
            .verify
            .verify(access_token, refresh_token, profile)
            .await?;

        match &user {
            Some(_) => info!("{} authentication succeeded", STRATEGY_NAME),
            None => info!("{} authentication rejected by verify", STRATEGY_NAME),
        }

        Ok(user)
    }
}

/// Compares the returned state with the issued one in constant time.
/// An empty issued state never matches.
fn state_matches(state: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(state.as_bytes().ct_eq(expected.as_bytes()))
}
