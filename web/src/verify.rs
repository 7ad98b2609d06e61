use async_trait::async_trait;
use frontier_auth::{Error, NormalizedProfile, Verify};
use log::*;

/// Accepts every Frontier profile as the logged-in user.
pub struct AcceptProfile;

#[async_trait]
impl Verify for AcceptProfile {
    type User = NormalizedProfile;

    async fn verify(
        &self,
        _access_token: &str,
        _refresh_token: Option<&str>,
        profile: NormalizedProfile,
    ) -> Result<Option<Self::User>, Error> {
        debug!("Accepting profile for user {:?}", profile.id());
        Ok(Some(profile))
    }
}
