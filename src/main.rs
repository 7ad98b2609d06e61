use std::process::ExitCode;
use std::sync::Arc;

use frontier_auth::http::HttpClientBuilder;
use log::*;
use service::{config::Config, logging::Logger};
use web::{AcceptProfile, AppState, FrontierStrategy};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
        return ExitCode::FAILURE;
    }

    info!("Starting up in {} mode", config.runtime_env());

    // The strategy is built once here and handed to the web layer.
    let strategy = match HttpClientBuilder::new()
        .with_timeout(config.http_timeout())
        .with_max_retries(config.http_max_retries)
        .build()
        .map_err(frontier_auth::Error::from)
        .and_then(|http| {
            FrontierStrategy::with_http_client(config.strategy_config(), http, AcceptProfile)
        }) {
        Ok(strategy) => Arc::new(strategy),
        Err(e) => {
            error!("Failed to configure the {} strategy: {e}", frontier_auth::STRATEGY_NAME);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Using client ID {} with callback {}",
        config.client_id(),
        config.callback_url()
    );

    let app_state = AppState::new(config, &strategy);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
