use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use frontier_auth::StrategyConfig;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// OAuth client ID issued by Frontier.
    #[arg(long, env, default_value = "")]
    client_id: String,

    /// OAuth client secret issued by Frontier.
    #[arg(long, env, default_value = "", hide_env_values = true)]
    client_secret: String,

    /// URL Frontier redirects back to after the user authorizes.
    #[arg(long, env, default_value = "http://localhost:5000/callback")]
    callback_url: String,

    /// A comma-separated list of permission scopes to request.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "auth,capi"
    )]
    pub scope: Vec<String>,

    /// Overrides the Frontier authorization endpoint.
    #[arg(long, env)]
    authorization_url: Option<String>,

    /// Overrides the Frontier token endpoint.
    #[arg(long, env)]
    token_url: Option<String>,

    /// Overrides the Frontier profile endpoint.
    #[arg(long, env)]
    profile_url: Option<String>,

    /// Overrides the separator used to join scopes.
    #[arg(long, env)]
    scope_separator: Option<String>,

    /// Audience to request in the authorization request.
    #[arg(long, env)]
    pub audience: Option<String>,

    /// Send a PKCE challenge with the authorization request.
    #[arg(long, env, default_value_t = false)]
    pub pkce: bool,

    /// Timeout in seconds for requests to the provider.
    #[arg(long, env, default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Retries for transient provider failures (5xx, timeouts, connection errors).
    #[arg(long, env, default_value_t = 0)]
    pub http_max_retries: u32,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 5000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,

    /// Session expiry duration in seconds (default: 24 hours = 86400 seconds)
    #[arg(long, env, default_value_t = 86400)]
    pub session_expiry_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Builds the strategy configuration. Endpoints left unset fall back to the
    /// Frontier defaults when the strategy resolves it.
    pub fn strategy_config(&self) -> StrategyConfig {
        StrategyConfig {
            authorization_url: self.authorization_url.clone(),
            token_url: self.token_url.clone(),
            profile_url: self.profile_url.clone(),
            scope_separator: self.scope_separator.clone(),
            ..StrategyConfig::new(
                self.client_id.clone(),
                self.client_secret.clone(),
                self.callback_url.clone(),
            )
            .with_scope(self.scope.iter().cloned())
            .with_pkce(self.pkce)
        }
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_auth::config::{DEFAULT_AUTHORIZATION_URL, DEFAULT_TOKEN_URL};

    fn parse(args: &[&str]) -> Config {
        Config::parse_from(std::iter::once("frontier_auth_rs").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--client-id", "id", "--client-secret", "secret"]);
        assert_eq!(config.scope, vec!["auth".to_string(), "capi".to_string()]);
        assert_eq!(config.callback_url(), "http://localhost:5000/callback");
        assert_eq!(config.port, 5000);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.http_max_retries, 0);
        assert!(!config.is_production());
    }

    #[test]
    fn test_strategy_config_leaves_endpoints_to_defaults() {
        let config = parse(&["--client-id", "id", "--client-secret", "secret"]);
        let resolved = config.strategy_config().resolve().unwrap();
        assert_eq!(resolved.authorization_url, DEFAULT_AUTHORIZATION_URL);
        assert_eq!(resolved.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(resolved.client_id, "id");
        assert_eq!(resolved.scope, vec!["auth".to_string(), "capi".to_string()]);
    }

    #[test]
    fn test_strategy_config_passes_overrides() {
        let config = parse(&[
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--token-url",
            "https://example.test/token",
            "--scope",
            "auth",
            "--pkce",
            "--http-max-retries",
            "2",
        ]);
        let strategy_config = config.strategy_config();
        assert_eq!(
            strategy_config.token_url.as_deref(),
            Some("https://example.test/token")
        );
        assert_eq!(strategy_config.scope, vec!["auth".to_string()]);
        assert!(strategy_config.pkce);
        assert_eq!(config.http_max_retries, 2);
    }

    #[test]
    fn test_runtime_env_parse() {
        assert_eq!("Production".parse::<RustEnv>(), Ok(RustEnv::Production));
        assert_eq!("bogus".parse::<RustEnv>(), Err(RustEnvParseError));
    }
}
