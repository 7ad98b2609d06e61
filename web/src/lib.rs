use std::sync::Arc;

use frontier_auth::{AuthorizeOptions, Strategy};
use log::*;
use service::config::Config;
use tokio::net::TcpListener;

pub use error::{Error, Result};
pub use verify::AcceptProfile;

mod controller;
mod error;
pub mod router;
mod verify;

/// The strategy type served by the demonstration app.
pub type FrontierStrategy = Strategy<AcceptProfile>;

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub strategy: Arc<FrontierStrategy>,
}

impl AppState {
    pub fn new(config: Config, strategy: &Arc<FrontierStrategy>) -> Self {
        Self {
            config,
            strategy: Arc::clone(strategy),
        }
    }

    /// Options sent with every authorization request from this app.
    pub fn authorize_options(&self) -> AuthorizeOptions {
        AuthorizeOptions {
            audience: self.config.audience.clone(),
            scope: None,
        }
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;

    let app = router::define_routes(app_state);

    let listener = TcpListener::bind((interface.as_str(), port)).await?;
    info!("Listening at http://{}/", listener.local_addr()?);

    axum::serve(listener, app).await
}
