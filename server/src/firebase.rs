//! Firebase ID token verification.
//!
//! Tokens are RS256 JWTs signed by one of Google's rotating securetoken keys.
//! The public keys are fetched as a JWK set and cached for as long as the
//! response's `Cache-Control: max-age` allows.

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use widgetgen_api::{AuthError, IdentityVerifier, VerifiedIdentity};

use crate::error::ServerResult;

const DEFAULT_KEY_TTL: Duration = Duration::from_secs(60 * 60);
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const LEEWAY_SECS: u64 = 60;

/// Shortest gap between two fetches triggered by an unknown `kid`.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    iat: u64,
    #[serde(default)]
    auth_time: Option<u64>,
}

struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
    expires_at: Instant,
}

/// Verifies Firebase ID tokens for one project.
pub struct FirebaseTokenVerifier {
    http: reqwest::Client,
    jwks_url: String,
    project_id: String,
    cache: RwLock<Option<KeyCache>>,
}

impl FirebaseTokenVerifier {
    /// Verifier for `project_id`, fetching keys from `jwks_url`.
    pub fn new(jwks_url: impl Into<String>, project_id: impl Into<String>) -> ServerResult<Self> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            http,
            jwks_url: jwks_url.into(),
            project_id: project_id.into(),
            cache: RwLock::new(None),
        })
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    fn cached_key(&self, kid: &str) -> Option<DecodingKey> {
        let cache = self.cache.read();
        let cache = cache.as_ref()?;
        if cache.expires_at <= Instant::now() {
            return None;
        }
        cache.keys.get(kid).cloned()
    }

    /// Whether a miss may go back to the key endpoint: always once the set
    /// has expired, otherwise at most once per [`MIN_REFRESH_INTERVAL`].
    fn refresh_allowed(&self) -> bool {
        match self.cache.read().as_ref() {
            None => true,
            Some(cache) => {
                cache.expires_at <= Instant::now()
                    || cache.fetched_at.elapsed() >= MIN_REFRESH_INTERVAL
            }
        }
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeysUnavailable(e.to_string()))?;

        let ttl = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .and_then(max_age)
            .unwrap_or(DEFAULT_KEY_TTL);

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeysUnavailable(e.to_string()))?;

        let keys: HashMap<String, DecodingKey> = set
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(e) => {
                        tracing::warn!(kid = %kid, error = %e, "Skipping unusable signing key");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(keys = keys.len(), ttl_secs = ttl.as_secs(), "Refreshed token signing keys");

        let now = Instant::now();
        *self.cache.write() = Some(KeyCache {
            keys,
            fetched_at: now,
            expires_at: now + ttl,
        });
        Ok(())
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cached_key(kid) {
            return Ok(key);
        }
        if !self.refresh_allowed() {
            tracing::debug!(kid = %kid, "Unknown signing key, refresh throttled");
            return Err(AuthError::InvalidToken(format!("unknown signing key {}", kid)));
        }
        self.refresh_keys().await?;
        self.cached_key(kid)
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown signing key {}", kid)))
    }
}

/// `max-age` from a Cache-Control header value.
fn max_age(cache_control: &str) -> Option<Duration> {
    cache_control
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl IdentityVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid".to_string()))?;

        let key = self.key_for(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = LEEWAY_SECS;
        validation.set_issuer(&[self.issuer()]);
        validation.set_audience(&[&self.project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let claims = decode::<FirebaseClaims>(token, &key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::InvalidToken("token expired".to_string()),
                _ => AuthError::InvalidToken(e.to_string()),
            })?
            .claims;

        let now = jsonwebtoken::get_current_timestamp();
        if claims.iat > now + LEEWAY_SECS {
            return Err(AuthError::InvalidToken("token issued in the future".to_string()));
        }
        if claims.auth_time.is_some_and(|t| t > now + LEEWAY_SECS) {
            return Err(AuthError::InvalidToken("authenticated in the future".to_string()));
        }
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(VerifiedIdentity {
            user_id: claims.sub,
        })
    }
}
