//! OAuth 2.0 client collaborator.
//!
//! The strategy drives the authorization-code flow through the [`OAuth2Client`]
//! trait. [`Client`] implements it on top of the `oauth2` crate.

mod authorization;
mod client;
mod token;

pub use authorization::{AuthorizationParams, AuthorizationRequest};
pub use client::{Client, OAuth2Client};
pub use token::Tokens;
