//! CORS middleware configuration.

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;

/// Create CORS layer from configuration.
///
/// Widget editors call the endpoint from the browser, so CORS is on and
/// open unless the configuration narrows it.
pub fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if !config.enable_cors {
        return CorsLayer::new();
    }

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}
