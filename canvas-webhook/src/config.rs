//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup. The client secret is handed to the
//! [`Decryptor`](crate::token::Decryptor) when the application state is built,
//! never re-read per request.

use std::env;
use tracing::warn;

/// Default base URL of the hosted review sheet.
pub const DEFAULT_SHEET_BASE_URL: &str = "https://intercom-aftershoot-review-app.vercel.app";

/// Default origin allowed to frame the sheet.
pub const DEFAULT_FRAME_SRC: &str = "https://intercom-sheets.com";

/// Origins allowed by the CORS layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `*` - any origin
    Any,
    /// An explicit list of origins
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse `*` or a comma-separated origin list.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Intercom app client secret used to derive the user token key
    pub client_secret: Option<String>,

    /// Origins allowed to call the webhook endpoints
    pub allowed_origins: AllowedOrigins,

    /// Base URL the initial canvas points its sheet button at
    pub sheet_base_url: String,

    /// Directory holding sheet.html and other static assets
    pub static_dir: String,

    /// Origin added to the Content-Security-Policy frame-src directive
    pub frame_src: String,

    /// Reject sheet requests whose user token is malformed or fails verification
    pub require_verified_user: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
            client_secret: None,
            allowed_origins: AllowedOrigins::Any,
            sheet_base_url: DEFAULT_SHEET_BASE_URL.to_string(),
            static_dir: "public".to_string(),
            frame_src: DEFAULT_FRAME_SRC.to_string(),
            require_verified_user: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),

            client_secret: env::var("CLIENT_SECRET").ok(),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| AllowedOrigins::parse(&v))
                .unwrap_or(defaults.allowed_origins),

            sheet_base_url: env::var("SHEET_BASE_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.sheet_base_url),

            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),

            frame_src: env::var("FRAME_SRC").unwrap_or(defaults.frame_src),

            require_verified_user: parse_bool("REQUIRE_VERIFIED_USER", defaults.require_verified_user),
        }
    }

    /// URL of the sheet endpoint the initial canvas opens.
    pub fn sheet_url(&self) -> String {
        format!("{}/sheet", self.sheet_base_url.trim_end_matches('/'))
    }
}

/// Parse a boolean flag such as "true", "1", "yes" or "off".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" | "" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean value, using default");
            default
        }
    }
}
