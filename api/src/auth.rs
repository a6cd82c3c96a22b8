//! Bearer token authentication.

use axum::http::{header, HeaderMap};

use crate::error::{ApiError, ApiResult};
use crate::traits::{AppStateProvider, VerifiedIdentity};

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header_value: Option<&str>) -> Option<&str> {
    let token = header_value?.trim().strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Authenticate a request against the state's verifier.
///
/// Every failure collapses into [`ApiError::Unauthorized`]; the reason is
/// only logged.
pub async fn authenticate<S>(
    headers: &HeaderMap,
    state: &S,
    request_id: &uuid::Uuid,
) -> ApiResult<VerifiedIdentity>
where
    S: AppStateProvider + ?Sized,
{
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(token) = extract_bearer_token(header_value) else {
        tracing::warn!(request_id = %request_id, "Missing or malformed bearer token");
        return Err(ApiError::Unauthorized);
    };

    match state.verifier().verify(token).await {
        Ok(identity) => {
            tracing::debug!(
                request_id = %request_id,
                user_id = %identity.user_id,
                "Caller authenticated"
            );
            Ok(identity)
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Token verification failed");
            Err(e.into())
        }
    }
}
