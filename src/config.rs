//! Application configuration loaded from environment variables.
//!
//! Everything has a local-development default so the client runs against a
//! backend on localhost with no configuration at all.

use std::env;
use std::path::PathBuf;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend REST base URL
    pub api_base_url: String,
    /// Backend socket URL (derived from the base URL unless overridden)
    pub socket_url: String,
    /// Where the per-role bearer tokens are persisted
    pub token_store_path: PathBuf,
    /// Cadence of captain location pushes, in seconds
    pub location_update_interval_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            socket_url: "ws://localhost:3000/socket".to_string(),
            token_store_path: PathBuf::from("cabio-tokens.json"),
            location_update_interval_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `CABIO_SOCKET_URL` defaults to the API URL with the scheme swapped
    /// to `ws`/`wss` and `/socket` appended.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("CABIO_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let socket_url = match env::var("CABIO_SOCKET_URL") {
            Ok(url) => url,
            Err(_) => derive_socket_url(&api_base_url)?,
        };

        let location_update_interval_secs = env::var("CABIO_LOCATION_INTERVAL_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        Ok(Self {
            api_base_url,
            socket_url,
            token_store_path: env::var("CABIO_TOKEN_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cabio-tokens.json")),
            location_update_interval_secs,
        })
    }
}

/// Swap `http(s)` for `ws(s)` and append the socket path.
fn derive_socket_url(api_base_url: &str) -> Result<String, ConfigError> {
    let ws_base = if let Some(rest) = api_base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = api_base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        return Err(ConfigError::Invalid("CABIO_API_URL"));
    };
    Ok(format!("{}/socket", ws_base))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Malformed environment variable: {0}")]
    Invalid(&'static str),
}
