// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Runtime Configuration
//!
//! All configuration is loaded from the environment exactly once at startup
//! into an [`AppConfig`] value, which is then injected into the components
//! that need it. No module-level singletons.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Root directory for the document store | `./data` |
//! | `JWT_SECRET` | HS256 signing secret for all tokens | Required |
//! | `CLIENT_URL` | Frontend base URL used in email links | `http://localhost:3000` |
//! | `APP_ENV` | `development` or `production` | `development` |
//! | `EMAIL_API_KEY` | Transactional email API key | Optional (emails are logged instead) |
//! | `EMAIL_SENDER` | From-address for outgoing email | `no-reply@realty.local` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Deployment environment. Controls diagnostic verbosity only; it is not a
/// security boundary by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Error raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Application configuration, constructed once in `main` and shared through
/// [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address for the HTTP server.
    pub host: String,
    /// Bind port for the HTTP server.
    pub port: u16,
    /// Root directory of the JSON document store.
    pub data_dir: PathBuf,
    /// Shared secret for signing and verifying JWTs. Rotating it invalidates
    /// all outstanding tokens.
    pub jwt_secret: String,
    /// Frontend base URL embedded in verification/reset email links.
    pub client_url: String,
    /// Deployment environment.
    pub environment: Environment,
    /// API key for the transactional email service. `None` means emails are
    /// logged instead of sent.
    pub email_api_key: Option<String>,
    /// Sender address for outgoing email.
    pub email_sender: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_raw = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port: u16 = port_raw.parse().map_err(|_| ConfigError::InvalidVar {
            var: "PORT",
            value: port_raw,
        })?;

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingVar("JWT_SECRET"));
        }

        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        Ok(Self {
            host,
            port,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            jwt_secret,
            client_url: env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            environment,
            email_api_key: env::var("EMAIL_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            email_sender: env::var("EMAIL_SENDER")
                .unwrap_or_else(|_| "no-reply@realty.local".to_string()),
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidVar {
                var: "HOST",
                value: format!("{}:{}", self.host, self.port),
            })
    }

    /// Whether verbose (role-revealing) diagnostics are enabled.
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
