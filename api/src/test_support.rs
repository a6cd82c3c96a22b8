//! Stub providers for unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{
    AppState, AuthError, GenerationError, GenerationRequest, IdentityVerifier,
    TextGenerationService, VerifiedIdentity,
};

pub const VALID_TOKEN: &str = "valid-token";

pub struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        if token == VALID_TOKEN {
            Ok(VerifiedIdentity {
                user_id: "user-1".to_string(),
            })
        } else {
            Err(AuthError::InvalidToken("unknown token".to_string()))
        }
    }
}

pub struct StubGenerator {
    reply: Result<String, String>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    last: Mutex<Option<GenerationRequest>>,
}

impl StubGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last.lock().unwrap().clone()
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }
}

#[async_trait]
impl TextGenerationService for StubGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.reply.clone().map_err(GenerationError::Request)
    }
}

/// State with [`StubVerifier`] and a generator that always returns `reply`.
pub fn stub_state(reply: Result<String, String>) -> (AppState, Arc<StubGenerator>) {
    let generator = Arc::new(StubGenerator {
        reply,
        delay: Mutex::new(None),
        calls: AtomicUsize::new(0),
        last: Mutex::new(None),
    });
    let state = AppState::new(Arc::new(StubVerifier), generator.clone());
    (state, generator)
}
