//! Provider seams for the API layer.
//!
//! The HTTP layer never talks to Firebase or Gemini directly. It sees two
//! async traits, [`IdentityVerifier`] and [`TextGenerationService`], bundled
//! behind an [`AppStateProvider`]. The server crate supplies the real
//! implementations; tests supply stubs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use widgetgen_values::ResponseSchema;

/// Identity extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Stable user identifier (the token subject).
    pub user_id: String,
}

/// Token verification failure. The caller only ever sees a 401.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token is malformed, expired, badly signed or issued for another project.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Signing keys could not be obtained.
    #[error("verification keys unavailable: {0}")]
    KeysUnavailable(String),
}

/// Provider failure. The caller only ever sees the generic 500 message.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport or HTTP-level failure talking to the provider.
    #[error("provider request failed: {0}")]
    Request(String),

    /// Provider answered but refused the prompt.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// Provider answered without usable text.
    #[error("empty provider response")]
    EmptyResponse,

    /// Provider did not answer within the configured timeout.
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// One structured-output generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System instruction for the session.
    pub system_instruction: String,
    /// Schema the response must conform to.
    pub response_schema: ResponseSchema,
    /// Sampling temperature; provider default when absent.
    pub temperature: Option<f64>,
    /// User prompt.
    pub prompt: String,
}

/// Verifies bearer tokens.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Verify `token` and return the identity it carries.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Produces structured JSON text from a prompt.
#[async_trait]
pub trait TextGenerationService: Send + Sync + 'static {
    /// Run one generation call and return the raw response text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// Everything a route needs from the running application.
pub trait AppStateProvider: Send + Sync + 'static {
    /// Bearer token verifier.
    fn verifier(&self) -> &dyn IdentityVerifier;

    /// Structured text generator.
    fn generator(&self) -> &dyn TextGenerationService;

    /// Upper bound for one provider call, if any.
    fn generation_timeout(&self) -> Option<Duration> {
        None
    }
}

// Lets `Arc<dyn AppStateProvider>` be passed where `&S: AppStateProvider` is expected.
impl<T: AppStateProvider + ?Sized> AppStateProvider for Arc<T> {
    fn verifier(&self) -> &dyn IdentityVerifier {
        (**self).verifier()
    }

    fn generator(&self) -> &dyn TextGenerationService {
        (**self).generator()
    }

    fn generation_timeout(&self) -> Option<Duration> {
        (**self).generation_timeout()
    }
}

/// Concrete router state type.
pub type AppStateWrapper = Arc<dyn AppStateProvider>;

/// Default application state: one verifier, one generator.
#[derive(Clone)]
pub struct AppState {
    /// Bearer token verifier.
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Structured text generator.
    pub generator: Arc<dyn TextGenerationService>,
    /// Upper bound for one provider call.
    pub generation_timeout: Option<Duration>,
}

impl AppState {
    /// Bundle a verifier and a generator, with no generation timeout.
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        generator: Arc<dyn TextGenerationService>,
    ) -> Self {
        Self {
            verifier,
            generator,
            generation_timeout: None,
        }
    }

    /// Set the generation timeout.
    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }
}

impl AppStateProvider for AppState {
    fn verifier(&self) -> &dyn IdentityVerifier {
        self.verifier.as_ref()
    }

    fn generator(&self) -> &dyn TextGenerationService {
        self.generator.as_ref()
    }

    fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout
    }
}
