pub(crate) mod profile_controller;
pub(crate) mod session_controller;

/// Session key holding the logged-in user's normalized profile.
pub(crate) const USER_KEY: &str = "user";
/// Session key holding the state issued with a pending authorization request.
pub(crate) const PENDING_AUTHORIZATION_KEY: &str = "frontier.pending_authorization";
