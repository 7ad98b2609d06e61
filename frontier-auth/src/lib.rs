//! # frontier-auth
//!
//! OAuth 2.0 authentication strategy for Frontier accounts:
//! - Frontier endpoint defaults and strategy configuration
//! - Authenticated profile retrieval and normalization
//! - Authorization request parameters (`audience`)
//! - A generic OAuth 2.0 client collaborator built on the `oauth2` crate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use frontier_auth::{Strategy, StrategyConfig};
//!
//! let config = StrategyConfig::new(client_id, client_secret, "http://localhost:5000/callback")
//!     .with_scope(["auth", "capi"]);
//! let strategy = Strategy::new(config, verify)?;
//! let request = strategy.authorization_request(&Default::default());
//! // redirect to request.url, keep request.state, then on callback:
//! let user = strategy.authenticate(callback).await?;
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod profile;
pub mod strategy;

// Re-export commonly used types
pub use config::{ResolvedConfig, StrategyConfig};
pub use error::{Error, ErrorKind};
pub use profile::NormalizedProfile;
pub use strategy::{AuthorizeOptions, CallbackParams, Strategy, Verify, STRATEGY_NAME};
