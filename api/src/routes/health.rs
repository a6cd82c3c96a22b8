//! Health check endpoint.

use async_trait::async_trait;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiResult;
use crate::route_trait::{RequestContext, RouteHandler, RouteMetadata};
use crate::traits::AppStateProvider;

/// Health check request (empty for GET endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRequest;

/// Health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version
    pub version: String,
}

/// Health check route handler.
///
/// Returns basic service health information with no authentication required,
/// for container probes and load balancers.
pub struct HealthRoute;

#[async_trait]
impl RouteHandler for HealthRoute {
    type Request = HealthRequest;
    type Response = HealthResponse;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            path: "/health",
            method: Method::GET,
            tags: &["System"],
            description: "Health check endpoint for service monitoring and load balancer probes",
            requires_auth: false,
        }
    }

    async fn validate_request(_req: &Self::Request) -> ApiResult<()> {
        Ok(())
    }

    async fn handle<S>(
        _req: Self::Request,
        ctx: &RequestContext,
        _state: &S,
    ) -> ApiResult<Self::Response>
    where
        S: AppStateProvider + Send + Sync,
    {
        tracing::debug!(request_id = %ctx.request_id, "Health check request received");

        Ok(HealthResponse {
            status: "ok".to_string(),
            service: "widgetgen-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

crate::enforce_route_handler!(HealthRoute);
