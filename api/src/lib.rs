//! WidgetGen API Crate
//!
//! HTTP API layer, built on Axum, for the WidgetGen server.
//!
//! # Architecture
//!
//! ```text
//! POST /gemini-controlled-generation
//!   │
//!   ├─ authenticate ──► IdentityVerifier        (401 "Unauthorized call")
//!   ├─ parse body   ──► WidgetEnvelope          (400 "Invalid request body")
//!   ├─ validate     ──► validate_all_fields     (400 ErrorMap)
//!   └─ handle       ──► TextGenerationService   (200 JSON string / 500)
//! ```
//!
//! Providers are injected through [`AppStateProvider`], so the whole
//! pipeline runs against stubs in tests.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use widgetgen_api::{
//!     ApiConfig, AppState, AuthError, GenerationError, GenerationRequest, IdentityVerifier,
//!     TextGenerationService, VerifiedIdentity,
//! };
//!
//! struct AllowAll;
//!
//! #[async_trait::async_trait]
//! impl IdentityVerifier for AllowAll {
//!     async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
//!         Ok(VerifiedIdentity { user_id: token.to_string() })
//!     }
//! }
//!
//! struct Canned;
//!
//! #[async_trait::async_trait]
//! impl TextGenerationService for Canned {
//!     async fn generate(&self, _req: GenerationRequest) -> Result<String, GenerationError> {
//!         Ok(r#"{"content":[]}"#.to_string())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = AppState::new(Arc::new(AllowAll), Arc::new(Canned));
//!     widgetgen_api::run_server(state, 8080).await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod auth;
mod config;
mod error;
mod middleware;
mod router;
pub mod route_trait;
pub mod routes;
mod traits;

#[cfg(test)]
mod test_support;

// Re-export public API
pub use auth::extract_bearer_token;
pub use config::ApiConfig;
pub use error::{
    ApiError, ApiResult, GENERATION_FAILED_MESSAGE, INVALID_BODY_MESSAGE, UNAUTHORIZED_MESSAGE,
};
pub use traits::{
    AppState, AppStateProvider, AppStateWrapper, AuthError, GenerationError, GenerationRequest,
    IdentityVerifier, TextGenerationService, VerifiedIdentity,
};

use std::{net::SocketAddr, sync::Arc};

/// Build the fully configured router without binding a socket.
///
/// Integration tests drive this with `tower::ServiceExt::oneshot`.
pub fn build_router(state: AppStateWrapper, config: &ApiConfig) -> axum::Router {
    router::configure_routes(state, config)
}

/// Run the HTTP API server on `port` with default configuration.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn run_server<S>(state: S, port: u16) -> anyhow::Result<()>
where
    S: AppStateProvider,
{
    run_server_with_config(
        Arc::new(state),
        ApiConfig {
            port,
            ..Default::default()
        },
        std::future::pending(),
    )
    .await
}

/// Run the HTTP API server until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address is invalid, the port is already in use
/// or the server encounters a fatal error.
pub async fn run_server_with_config<F>(
    state: AppStateWrapper,
    config: ApiConfig,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("WidgetGen API server listening on http://{}", addr);
    if config.enable_docs {
        tracing::info!("OpenAPI document: http://{}/api-doc/openapi.json", addr);
    }

    let app = router::configure_routes(state, &config);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("WidgetGen API server stopped");
    Ok(())
}
