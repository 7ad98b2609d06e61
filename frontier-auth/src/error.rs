//! Error types for the `frontier-auth` crate.
//!
//! A root Error struct holding an error kind and an optional source for chaining.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for frontier-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in frontier-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Config(ConfigErrorKind),
    OAuth(OAuthErrorKind),
    Profile(ProfileErrorKind),
    Http(HttpErrorKind),
    Verify,
}

/// Errors from assembling the strategy configuration.
#[derive(Debug, PartialEq)]
pub enum ConfigErrorKind {
    MissingClientId,
    MissingClientSecret,
    MissingCallbackUrl,
    InvalidUrl,
}

/// Errors from the OAuth authorization-code flow.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    InvalidState,
    TokenExchangeFailed,
    MissingAccessToken,
}

/// Errors from retrieving the user profile.
#[derive(Debug, PartialEq)]
pub enum ProfileErrorKind {
    /// The profile endpoint could not be reached or answered with a non-2xx status.
    Fetch,
    /// The profile endpoint answered with something that is not a JSON object.
    Parse,
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Status,
    Network,
}

impl Error {
    /// True when the profile endpoint could not be reached or returned an error status.
    pub fn is_transport(&self) -> bool {
        self.error_kind == ErrorKind::Profile(ProfileErrorKind::Fetch)
    }

    /// True when the profile body could not be parsed.
    pub fn is_parse(&self) -> bool {
        self.error_kind == ErrorKind::Profile(ProfileErrorKind::Parse)
    }

    /// True when the strategy configuration was rejected at construction.
    pub fn is_config(&self) -> bool {
        matches!(self.error_kind, ErrorKind::Config(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Config(kind) => write!(f, "Configuration error: {:?}", kind),
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}", kind),
            ErrorKind::Profile(ProfileErrorKind::Fetch) => {
                write!(f, "Failed to fetch the user profile.")
            }
            ErrorKind::Profile(ProfileErrorKind::Parse) => {
                write!(f, "Failed to parse the user profile.")
            }
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
            ErrorKind::Verify => write!(f, "Verification failed"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_status() {
            ErrorKind::Http(HttpErrorKind::Status)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            other => Error {
                source: Some(Box::new(other)),
                error_kind: ErrorKind::Http(HttpErrorKind::Network),
            },
        }
    }
}

/// Helper function to create configuration errors.
pub fn config_error(kind: ConfigErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Config(kind),
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

/// Wraps a transport failure reaching the profile endpoint.
pub fn profile_fetch_error(cause: Error) -> Error {
    Error {
        source: Some(Box::new(cause)),
        error_kind: ErrorKind::Profile(ProfileErrorKind::Fetch),
    }
}

/// Helper function to create profile parse errors.
pub fn profile_parse_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Profile(ProfileErrorKind::Parse),
    }
}
