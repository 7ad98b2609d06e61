//! Controller for the Frontier login flow.
//!
//! Login stores the pending authorization state in the session and redirects
//! to Frontier; the callback completes authentication and logs the user in.

use axum::extract::{Query, State};
use axum::response::Redirect;
use frontier_auth::error::{ErrorKind, OAuthErrorKind};
use frontier_auth::CallbackParams;
use log::*;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::{PENDING_AUTHORIZATION_KEY, USER_KEY};
use crate::{AppState, Error};

const FAILURE_REDIRECT: &str = "/";
const SUCCESS_REDIRECT: &str = "/info";

/// State kept in the session between the redirect and the callback.
#[derive(Debug, Serialize, Deserialize)]
struct PendingAuthorization {
    state: String,
    pkce_verifier: Option<String>,
}

/// Query parameters Frontier sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /
///
/// Redirects to Frontier's authorization endpoint.
pub async fn login(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<Redirect, Error> {
    let request = app_state
        .strategy
        .authorization_request(&app_state.authorize_options());

    session
        .insert(
            PENDING_AUTHORIZATION_KEY,
            PendingAuthorization {
                state: request.state,
                pkce_verifier: request.pkce_verifier,
            },
        )
        .await?;

    Ok(Redirect::temporary(&request.url))
}

/// GET /callback
///
/// Completes authentication. Denied authorizations, state mismatches and
/// rejected users go back to the login route; other errors are returned.
pub async fn callback(
    State(app_state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackQuery>,
) -> Result<Redirect, Error> {
    let pending: Option<PendingAuthorization> =
        session.remove(PENDING_AUTHORIZATION_KEY).await?;

    if let Some(error) = params.error {
        warn!(
            "Authorization denied by provider: {} {}",
            error,
            params.error_description.unwrap_or_default()
        );
        return Ok(Redirect::temporary(FAILURE_REDIRECT));
    }

    let (Some(code), Some(pending)) = (params.code, pending) else {
        warn!("Callback received without a code or a pending authorization");
        return Ok(Redirect::temporary(FAILURE_REDIRECT));
    };

    let result = app_state
        .strategy
        .authenticate(CallbackParams {
            code,
            state: params.state.unwrap_or_default(),
            expected_state: pending.state,
            pkce_verifier: pending.pkce_verifier,
        })
        .await;

    match result {
        Ok(Some(user)) => {
            session.cycle_id().await?;
            session.insert(USER_KEY, user).await?;
            Ok(Redirect::temporary(SUCCESS_REDIRECT))
        }
        Ok(None) => Ok(Redirect::temporary(FAILURE_REDIRECT)),
        Err(err) if err.error_kind == ErrorKind::OAuth(OAuthErrorKind::InvalidState) => {
            Ok(Redirect::temporary(FAILURE_REDIRECT))
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /logout
///
/// Ends the session and returns to the login route.
pub async fn logout(session: Session) -> Result<Redirect, Error> {
    session.flush().await?;
    Ok(Redirect::temporary(FAILURE_REDIRECT))
}
