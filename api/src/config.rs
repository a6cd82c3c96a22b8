//! API configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the HTTP API server.
///
/// # Example
///
/// ```rust
/// use widgetgen_api::ApiConfig;
///
/// let config = ApiConfig {
///     host: "127.0.0.1".to_string(),
///     port: 8080,
///     enable_cors: true,
///     cors_origins: vec!["https://editor.example.com".to_string()],
///     generation_timeout_secs: 60,
///     enable_docs: false,
/// };
/// assert_eq!(config.generation_timeout().map(|t| t.as_secs()), Some(60));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind to.
    ///
    /// Default: `0.0.0.0`
    pub host: String,

    /// Port to bind the HTTP server to.
    ///
    /// Default: 8080
    pub port: u16,

    /// Enable Cross-Origin Resource Sharing (CORS).
    ///
    /// Default: true
    pub enable_cors: bool,

    /// Allowed origins for CORS requests. `["*"]` allows all origins.
    ///
    /// Default: `["*"]`
    pub cors_origins: Vec<String>,

    /// Upper bound for one provider call, in seconds. 0 waits forever.
    ///
    /// Default: 0
    pub generation_timeout_secs: u64,

    /// Serve the OpenAPI document at `/api-doc/openapi.json`.
    ///
    /// Default: true
    pub enable_docs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            generation_timeout_secs: 0,
            enable_docs: true,
        }
    }
}

impl ApiConfig {
    /// Configuration for production use.
    ///
    /// CORS is restricted to the given origins and the OpenAPI document is
    /// not served.
    pub fn production(allowed_origins: Vec<String>) -> Self {
        Self {
            enable_docs: false,
            cors_origins: allowed_origins,
            ..Default::default()
        }
    }

    /// Configuration for local development: any origin, docs on.
    pub fn development() -> Self {
        Self {
            cors_origins: vec!["*".to_string()],
            enable_docs: true,
            ..Default::default()
        }
    }

    /// Provider call timeout, if one is configured.
    pub fn generation_timeout(&self) -> Option<Duration> {
        (self.generation_timeout_secs > 0).then(|| Duration::from_secs(self.generation_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let prod = ApiConfig::production(vec!["https://app.example.com".to_string()]);
        assert!(!prod.enable_docs);
        assert_eq!(prod.cors_origins, vec!["https://app.example.com"]);

        let dev = ApiConfig::development();
        assert!(dev.enable_docs);
        assert_eq!(dev.cors_origins, vec!["*"]);
    }

    #[test]
    fn test_timeout_disabled_by_default() {
        assert_eq!(ApiConfig::default().generation_timeout(), None);
        let config = ApiConfig {
            generation_timeout_secs: 30,
            ..Default::default()
        };
        assert_eq!(config.generation_timeout(), Some(Duration::from_secs(30)));
    }
}
