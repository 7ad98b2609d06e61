use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use frontier_auth::error::{ErrorKind, OAuthErrorKind};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Auth(frontier_auth::Error),
    Session(tower_sessions::session::Error),
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Auth(err) => Some(err),
            Error::Session(err) => Some(err),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::Auth(err) => write!(fmt, "{err}"),
            Error::Session(err) => write!(fmt, "Session error: {err}"),
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("Request failed: {self}");
        match self {
            Error::Auth(err) => match err.error_kind {
                ErrorKind::Config(_) | ErrorKind::Verify => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
                ErrorKind::OAuth(OAuthErrorKind::InvalidState) => {
                    (StatusCode::BAD_REQUEST, "BAD REQUEST").into_response()
                }
                ErrorKind::OAuth(_) | ErrorKind::Profile(_) | ErrorKind::Http(_) => {
                    (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
                }
            },
            Error::Session(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl From<frontier_auth::Error> for Error {
    fn from(err: frontier_auth::Error) -> Self {
        Error::Auth(err)
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        Error::Session(err)
    }
}
