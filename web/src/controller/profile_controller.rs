//! Controller echoing the logged-in user's profile.

use axum::response::{IntoResponse, Json, Response};
use frontier_auth::NormalizedProfile;
use tower_sessions::Session;

use super::USER_KEY;
use crate::Error;

/// GET /info
///
/// Returns the normalized profile as JSON for a logged-in user.
pub async fn info(session: Session) -> Result<Response, Error> {
    match session.get::<NormalizedProfile>(USER_KEY).await? {
        Some(profile) => Ok(Json(profile).into_response()),
        None => Ok("Not logged in".into_response()),
    }
}
