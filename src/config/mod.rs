use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Authentication REST API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

/// Headless content store (Sanity) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Write token for the content store. Not serialized so it never lands in logs or dumps.
    #[serde(skip)]
    pub token: Option<String>,
    /// Overrides `https://<project>.api.sanity.io`, mostly for tests and proxies
    pub api_host: Option<String>,
}

impl AppConfig {
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
        if let Ok(v) = env::var("FU_API_BASE_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("FU_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Content store overrides
        if let Ok(v) = env::var("FU_SANITY_PROJECT_ID") {
            self.content.project_id = v;
        }
        if let Ok(v) = env::var("FU_SANITY_DATASET") {
            self.content.dataset = v;
        }
        if let Ok(v) = env::var("FU_SANITY_API_VERSION") {
            self.content.api_version = v;
        }
        if let Ok(v) = env::var("FU_SANITY_TOKEN") {
            if !v.is_empty() {
                self.content.token = Some(v);
            }
        }
        if let Ok(v) = env::var("FU_SANITY_API_HOST") {
            self.content.api_host = Some(v.trim_end_matches('/').to_string());
        }

        if self.content.token.is_none() {
            tracing::warn!("FU_SANITY_TOKEN is not set; content store writes will be rejected");
        }

        self
    }

    /// Client-wide timeout applied uniformly to every outbound call
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:3000/api".to_string(),
                request_timeout_secs: 30,
            },
            content: ContentConfig::defaults(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging-api.friendsunited.org/api".to_string(),
                request_timeout_secs: 30,
            },
            content: ContentConfig::defaults(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.friendsunited.org/api".to_string(),
                request_timeout_secs: 30,
            },
            content: ContentConfig::defaults(),
        }
    }
}

impl Default for AppConfig {
    /// Development defaults without reading the environment
    fn default() -> Self {
        Self::development()
    }
}

impl ContentConfig {
    fn defaults() -> Self {
        Self {
            project_id: "e6ou6t4t".to_string(),
            dataset: "production".to_string(),
            api_version: "2025-01-01".to_string(),
            token: None,
            api_host: None,
        }
    }

    /// Base URL for versioned content store endpoints, e.g. `https://p.api.sanity.io/v2025-01-01`
    pub fn api_base_url(&self) -> String {
        let host = match &self.api_host {
            Some(host) => host.clone(),
            None => format!("https://{}.api.sanity.io", self.project_id),
        };
        format!("{}/v{}", host, self.api_version)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.content.dataset, "production");
    }

    #[test]
    fn test_api_base_url_uses_project_host() {
        let content = ContentConfig::defaults();
        assert_eq!(content.api_base_url(), "https://e6ou6t4t.api.sanity.io/v2025-01-01");
    }

    #[test]
    fn test_api_base_url_honours_override() {
        let mut content = ContentConfig::defaults();
        content.api_host = Some("http://127.0.0.1:9999".to_string());
        assert_eq!(content.api_base_url(), "http://127.0.0.1:9999/v2025-01-01");
    }
}
