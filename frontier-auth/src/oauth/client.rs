//! Generic OAuth 2.0 client used by the strategy.

use std::error::Error as StdError;

use async_trait::async_trait;
use chrono::Utc;
use log::*;
use oauth2::basic::BasicClient;
use oauth2::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, HttpRequest,
    HttpResponse, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
    TokenUrl,
};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{AuthorizationParams, AuthorizationRequest, Tokens};
use crate::config::ResolvedConfig;
use crate::error::{ConfigErrorKind, Error, ErrorKind, HttpErrorKind, OAuthErrorKind};
use crate::http::HttpClient;

/// Operations the strategy needs from an OAuth 2.0 client.
///
/// Implementations own the authorization-code mechanics and the transport.
#[async_trait]
pub trait OAuth2Client: Send + Sync {
    /// Build the URL to redirect the user to, with a fresh CSRF state.
    ///
    /// # Arguments
    ///
    /// * `scope` - Scopes to request, joined with the configured separator
    /// * `params` - Extra query parameters to merge into the request
    fn authorize_url(&self, scope: &[String], params: &AuthorizationParams)
        -> AuthorizationRequest;

    /// Exchange an authorization code for tokens.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code from the callback
    /// * `pkce_verifier` - PKCE verifier if the authorization request used one
    async fn exchange_code(&self, code: &str, pkce_verifier: Option<&str>)
        -> Result<Tokens, Error>;

    /// Perform an authenticated GET and return the raw response body.
    ///
    /// Non-2xx responses and network failures are returned as errors.
    async fn get(&self, url: &str, access_token: &str) -> Result<String, Error>;
}

/// [`OAuth2Client`] backed by the `oauth2` crate for the code flow.
///
/// Both the token exchange and authenticated GETs go through the same
/// middleware-enabled `reqwest` client, so its timeout, user agent and retry
/// policy apply to every provider request.
pub struct Client {
    inner: BasicClient,
    http: HttpClient,
    scope_separator: String,
    pkce: bool,
    use_authorization_header_for_get: bool,
}

impl Client {
    /// Create a client from a resolved configuration.
    ///
    /// Client credentials are sent in the token request body. Access tokens are
    /// sent as an `access_token` query parameter on GET until
    /// [`Client::use_authorization_header_for_get`] is enabled.
    pub fn new(config: &ResolvedConfig, http: HttpClient) -> Result<Self, Error> {
        let inner = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(
                config.client_secret.expose_secret().clone(),
            )),
            AuthUrl::new(config.authorization_url.clone()).map_err(invalid_url)?,
            Some(TokenUrl::new(config.token_url.clone()).map_err(invalid_url)?),
        )
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(RedirectUrl::new(config.callback_url.clone()).map_err(invalid_url)?);

        Ok(Self {
            inner,
            http,
            scope_separator: config.scope_separator.clone(),
            pkce: config.pkce,
            use_authorization_header_for_get: false,
        })
    }

    /// Send the access token in the `Authorization: Bearer` header on GET requests.
    pub fn use_authorization_header_for_get(mut self, enabled: bool) -> Self {
        self.use_authorization_header_for_get = enabled;
        self
    }

    /// Whether GET requests carry the token in the `Authorization` header.
    pub fn uses_authorization_header_for_get(&self) -> bool {
        self.use_authorization_header_for_get
    }
}

#[async_trait]
impl OAuth2Client for Client {
    fn authorize_url(
        &self,
        scope: &[String],
        params: &AuthorizationParams,
    ) -> AuthorizationRequest {
        let mut request = self.inner.authorize_url(CsrfToken::new_random);

        if !scope.is_empty() {
            request = request.add_scope(Scope::new(scope.join(&self.scope_separator)));
        }

        for (name, value) in params {
            request = request.add_extra_param(name.clone(), value.clone());
        }

        let pkce_verifier = if self.pkce {
            let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
            request = request.set_pkce_challenge(challenge);
            Some(verifier.secret().clone())
        } else {
            None
        };

        let (url, state) = request.url();

        AuthorizationRequest {
            url: url.to_string(),
            state: state.secret().clone(),
            pkce_verifier,
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<Tokens, Error> {
        let mut request = self
            .inner
            .exchange_code(AuthorizationCode::new(code.to_string()));

        if let Some(verifier) = pkce_verifier {
            request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier.to_string()));
        }

        debug!("Exchanging authorization code for tokens");

        let response = request
            .request_async(|request| send_token_request(&self.http, request))
            .await
            .map_err(|e| {
                warn!("Failed to exchange authorization code: {}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed),
                }
            })?;

        let expires_at = response
            .expires_in()
            .and_then(|expires_in| chrono::Duration::from_std(expires_in).ok())
            .map(|expires_in| Utc::now() + expires_in);

        Ok(Tokens {
            access_token: SecretString::new(response.access_token().secret().clone()),
            refresh_token: response
                .refresh_token()
                .map(|token| SecretString::new(token.secret().clone())),
            expires_at,
            scopes: response
                .scopes()
                .map(|scopes| scopes.iter().map(|scope| scope.as_str().to_string()).collect())
                .unwrap_or_default(),
        })
    }

    async fn get(&self, url: &str, access_token: &str) -> Result<String, Error> {
        let request = if self.use_authorization_header_for_get {
            self.http.get(url).bearer_auth(access_token)
        } else {
            let mut url = Url::parse(url).map_err(invalid_url)?;
            url.query_pairs_mut()
                .append_pair("access_token", access_token);
            self.http.get(url)
        };

        let response = request.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Send an `oauth2` token request through the configured transport.
///
/// Error statuses are handed back untouched so `oauth2` can parse the
/// provider's error response.
async fn send_token_request(
    http: &HttpClient,
    request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let method =
        reqwest::Method::from_bytes(request.method.as_str().as_bytes()).map_err(builder_error)?;

    let mut builder = http.request(method, request.url).body(request.body);
    for (name, value) in request.headers.iter() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let response = builder.send().await?;

    let status_code = StatusCode::from_u16(response.status().as_u16()).map_err(builder_error)?;
    let mut headers = HeaderMap::new();
    for (name, value) in response.headers() {
        let name = HeaderName::from_bytes(name.as_str().as_bytes()).map_err(builder_error)?;
        let value = HeaderValue::from_bytes(value.as_bytes()).map_err(builder_error)?;
        headers.append(name, value);
    }
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

fn builder_error<E>(err: E) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    Error {
        source: Some(Box::new(err)),
        error_kind: ErrorKind::Http(HttpErrorKind::BuilderFailed),
    }
}

fn invalid_url<E>(err: E) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    Error {
        source: Some(Box::new(err)),
        error_kind: ErrorKind::Config(ConfigErrorKind::InvalidUrl),
    }
}
