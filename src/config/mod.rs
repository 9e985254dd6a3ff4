use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Requests are never cancelled unless this is set
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session storage key holding the access token
    pub token_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub filter: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("CATEGORY_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("CATEGORY_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().ok().filter(|secs| *secs > 0);
        }
        if let Ok(v) = env::var("CATEGORY_API_USER_AGENT") {
            self.api.user_agent = v;
        }

        // Session overrides
        if let Ok(v) = env::var("CATEGORY_SESSION_TOKEN_KEY") {
            if !v.is_empty() {
                self.session.token_key = v;
            }
        }

        // Logging overrides
        if let Ok(v) = env::var("CATEGORY_LOG_FILTER") {
            self.logging.filter = v;
        }

        self
    }

    /// Same configuration pointed at another server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_secs: None,
                user_agent: default_user_agent(),
            },
            session: SessionConfig {
                token_key: DEFAULT_TOKEN_KEY.to_string(),
            },
            logging: LoggingConfig {
                filter: "category_console=debug,catcon=debug".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.example.com".to_string(),
                request_timeout_secs: None,
                user_agent: default_user_agent(),
            },
            session: SessionConfig {
                token_key: DEFAULT_TOKEN_KEY.to_string(),
            },
            logging: LoggingConfig {
                filter: "category_console=info,catcon=info".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://app.example.com".to_string(),
                request_timeout_secs: None,
                user_agent: default_user_agent(),
            },
            session: SessionConfig {
                token_key: DEFAULT_TOKEN_KEY.to_string(),
            },
            logging: LoggingConfig {
                filter: "warn".to_string(),
            },
        }
    }
}

pub const DEFAULT_TOKEN_KEY: &str = "accessToken";

fn default_user_agent() -> String {
    format!("catcon/{}", env!("CARGO_PKG_VERSION"))
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static ClientConfig {
    &CONFIG
}
