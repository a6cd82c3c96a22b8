//! Route handler trait system.
//!
//! Every route implements [`RouteHandler`] and is mounted through the blanket
//! [`RegisterableRoute::register`], which fixes the order of the request
//! pipeline for all routes:
//!
//! 1. generate a `request_id`
//! 2. authenticate (when the route requires it)
//! 3. parse the JSON body
//! 4. [`RouteHandler::validate_request`]
//! 5. [`RouteHandler::handle`], serialized as JSON
//!
//! Authentication runs before the body is read, so an unauthenticated caller
//! learns nothing about what is wrong with its payload.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

use crate::auth::authenticate;
use crate::error::{ApiError, ApiResult};
use crate::traits::{AppStateProvider, AppStateWrapper, VerifiedIdentity};

/// Route metadata.
#[derive(Debug, Clone)]
pub struct RouteMetadata {
    /// HTTP path (e.g., "/gemini-controlled-generation")
    pub path: &'static str,
    /// HTTP method
    pub method: Method,
    /// OpenAPI tags for grouping
    pub tags: &'static [&'static str],
    /// Description for documentation
    pub description: &'static str,
    /// Requires a verified bearer token?
    pub requires_auth: bool,
}

/// Per-request context handed to [`RouteHandler::handle`].
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlates every log line of one request.
    pub request_id: uuid::Uuid,
    /// Verified caller, for routes that require authentication.
    pub identity: Option<VerifiedIdentity>,
}

impl RequestContext {
    /// Fresh context with a new request id and no identity.
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4(),
            identity: None,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Route handler trait - all routes implement this.
#[async_trait]
pub trait RouteHandler: Send + Sync + 'static {
    /// Request type, read from the JSON body. An empty body reads as `null`.
    type Request: DeserializeOwned + Debug + Send + Sync;

    /// Response type, written as the JSON body.
    type Response: Serialize + Debug + Send + Sync;

    /// Route metadata.
    fn metadata() -> RouteMetadata;

    /// Validate the request before it is handled.
    async fn validate_request(req: &Self::Request) -> ApiResult<()>;

    /// Handle a validated request.
    ///
    /// Log with `ctx.request_id` at start, on success and on failure.
    async fn handle<S>(
        req: Self::Request,
        ctx: &RequestContext,
        state: &S,
    ) -> ApiResult<Self::Response>
    where
        S: AppStateProvider + Send + Sync;

    /// Sanity check on the metadata.
    fn verify_implementation() -> bool {
        let metadata = Self::metadata();
        !metadata.path.is_empty() && metadata.path.starts_with('/') && !metadata.description.is_empty()
    }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes, request_id: &uuid::Uuid) -> ApiResult<T> {
    let raw: &[u8] = if body.is_empty() { b"null" } else { body };
    serde_json::from_slice(raw).map_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Unreadable request body");
        ApiError::BadRequest(e.to_string())
    })
}

/// Route registration trait, auto-implemented for every [`RouteHandler`].
pub trait RegisterableRoute: RouteHandler + Sized {
    /// Mount this route on `router`.
    fn register(router: axum::Router<AppStateWrapper>) -> axum::Router<AppStateWrapper> {
        let metadata = Self::metadata();
        let requires_auth = metadata.requires_auth;

        let handler = move |State(state): State<AppStateWrapper>,
                            headers: HeaderMap,
                            body: Bytes| async move {
            let mut ctx = RequestContext::new();

            if requires_auth {
                ctx.identity = Some(authenticate(&headers, &state, &ctx.request_id).await?);
            }

            let req: Self::Request = parse_body(&body, &ctx.request_id)?;

            Self::validate_request(&req).await.inspect_err(|e| {
                tracing::info!(request_id = %ctx.request_id, error = %e, "Request rejected");
            })?;

            let response = Self::handle(req, &ctx, &state).await?;

            Ok::<_, ApiError>(Json(response))
        };

        match metadata.method {
            Method::GET => router.route(metadata.path, axum::routing::get(handler)),
            Method::POST => router.route(metadata.path, axum::routing::post(handler)),
            Method::PUT => router.route(metadata.path, axum::routing::put(handler)),
            Method::DELETE => router.route(metadata.path, axum::routing::delete(handler)),
            Method::PATCH => router.route(metadata.path, axum::routing::patch(handler)),
            other => {
                tracing::error!(path = metadata.path, method = %other, "Unsupported method, route not mounted");
                router
            }
        }
    }
}

impl<T: RouteHandler> RegisterableRoute for T {}

/// Compile-time check that a type is a mountable route.
///
/// Usage:
/// ```ignore
/// enforce_route_handler!(HealthRoute);
/// ```
#[macro_export]
macro_rules! enforce_route_handler {
    ($route_type:ty) => {
        const _: () = {
            #[allow(dead_code)]
            fn assert_registerable<T: $crate::route_trait::RegisterableRoute>() {}

            #[allow(dead_code)]
            fn check() {
                assert_registerable::<$route_type>();
            }
        };
    };
}

/// Register several routes on a router.
///
/// Usage:
/// ```ignore
/// let router = register_routes!(router, [HealthRoute, WidgetGenerationRoute]);
/// ```
#[macro_export]
macro_rules! register_routes {
    ($router:expr, [$($route:ty),* $(,)?]) => {
        {
            let mut router = $router;
            $(
                $crate::enforce_route_handler!($route);
                router = <$route as $crate::route_trait::RegisterableRoute>::register(router);
            )*
            router
        }
    };
}
