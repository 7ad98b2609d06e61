use axum::{routing::get, Router};
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::controller::{profile_controller, session_controller};
use crate::AppState;

/// Routes for the demonstration app, wrapped in an in-memory session layer.
pub fn define_routes(app_state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(app_state.config.is_production())
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            app_state.config.session_expiry_seconds as i64,
        )));

    Router::new()
        .route("/", get(session_controller::login))
        .route("/callback", get(session_controller::callback))
        .route("/logout", get(session_controller::logout))
        .route("/info", get(profile_controller::info))
        .layer(session_layer)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AcceptProfile, FrontierStrategy};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use clap::Parser;
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;

    fn app(provider_url: &str) -> Router {
        let authorization_url = format!("{provider_url}/auth");
        let token_url = format!("{provider_url}/token");
        let profile_url = format!("{provider_url}/me");
        let config = Config::parse_from([
            "frontier_auth_rs",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--audience",
            "frontier",
            "--authorization-url",
            authorization_url.as_str(),
            "--token-url",
            token_url.as_str(),
            "--profile-url",
            profile_url.as_str(),
        ]);
        let strategy: Arc<FrontierStrategy> =
            Arc::new(FrontierStrategy::new(config.strategy_config(), AcceptProfile).unwrap());
        define_routes(AppState::new(config, &strategy))
    }

    async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> String {
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    fn session_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn state_from(location: &str) -> String {
        Url::parse(location)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[tokio::test]
    async fn test_info_without_login() {
        let app = app("https://auth.example.test");
        let response = get(&app, "/info", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Not logged in");
    }

    #[tokio::test]
    async fn test_login_redirects_to_provider() {
        let app = app("https://auth.example.test");
        let response = get(&app, "/", None).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(session_cookie(&response).is_some());

        let target = Url::parse(&location(&response)).unwrap();
        assert_eq!(target.host_str(), Some("auth.example.test"));
        let pairs: Vec<(String, String)> = target.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("scope".to_string(), "auth capi".to_string())));
        assert!(pairs.contains(&("audience".to_string(), "frontier".to_string())));
    }

    #[tokio::test]
    async fn test_full_login_and_logout() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"tok","token_type":"Bearer","expires_in":3600}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/me")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"42","name":"Alice"}"#)
            .create_async()
            .await;

        let app = app(&server.url());

        let login = get(&app, "/", None).await;
        let cookie = session_cookie(&login).unwrap();
        let state = state_from(&location(&login));

        let callback = get(
            &app,
            &format!("/callback?code=abc&state={state}"),
            Some(&cookie),
        )
        .await;
        assert_eq!(callback.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&callback), "/info");
        let cookie = session_cookie(&callback).unwrap_or(cookie);

        let info = get(&app, "/info", Some(&cookie)).await;
        let profile: serde_json::Value = serde_json::from_str(&body_text(info).await).unwrap();
        assert_eq!(profile["id"], "42");
        assert_eq!(profile["name"], "Alice");
        assert_eq!(profile["provider"], "frontier");
        assert_eq!(profile["accessToken"], "tok");
        assert!(profile["fetchedAt"].is_string());

        let logout = get(&app, "/logout", Some(&cookie)).await;
        assert_eq!(location(&logout), "/");

        let info = get(&app, "/info", Some(&cookie)).await;
        assert_eq!(body_text(info).await, "Not logged in");
    }

    #[tokio::test]
    async fn test_callback_with_forged_state_fails() {
        let server = mockito::Server::new_async().await;
        let app = app(&server.url());

        let login = get(&app, "/", None).await;
        let cookie = session_cookie(&login).unwrap();

        let callback = get(&app, "/callback?code=abc&state=forged", Some(&cookie)).await;
        assert_eq!(location(&callback), "/");

        let info = get(&app, "/info", Some(&cookie)).await;
        assert_eq!(body_text(info).await, "Not logged in");
    }

    #[tokio::test]
    async fn test_callback_denied_by_provider() {
        let app = app("https://auth.example.test");
        let response = get(&app, "/callback?error=access_denied", None).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_callback_profile_failure_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"tok","token_type":"Bearer"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/me")
            .with_status(503)
            .create_async()
            .await;

        let app = app(&server.url());
        let login = get(&app, "/", None).await;
        let cookie = session_cookie(&login).unwrap();
        let state = state_from(&location(&login));

        let callback = get(
            &app,
            &format!("/callback?code=abc&state={state}"),
            Some(&cookie),
        )
        .await;
        assert_eq!(callback.status(), StatusCode::BAD_GATEWAY);
    }
}
