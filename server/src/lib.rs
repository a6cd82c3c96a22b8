//! WidgetGen Server
//!
//! Wires the concrete providers into the HTTP layer:
//! - [`GeminiClient`] implements `TextGenerationService`
//! - [`FirebaseTokenVerifier`] implements `IdentityVerifier`
//!
//! Configuration comes from CLI flags, profile-selected environment variables
//! and an optional TOML file (see [`config`]).

pub mod config;
pub mod error;
pub mod firebase;
pub mod gemini;

use std::sync::Arc;

use widgetgen_api::AppState;

// Re-export server configuration types
pub use config::{CliArgs, Environment, FileConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use firebase::FirebaseTokenVerifier;
pub use gemini::GeminiClient;

/// Build the application state from a loaded configuration.
pub fn build_state(config: &ServerConfig) -> ServerResult<AppState> {
    let generator = GeminiClient::new(&config.gemini_base_url, &config.model, &config.api_key)?;
    let verifier = FirebaseTokenVerifier::new(&config.jwks_url, &config.firebase_project_id)?;

    Ok(AppState::new(Arc::new(verifier), Arc::new(generator))
        .with_generation_timeout(config.api_config().generation_timeout()))
}
