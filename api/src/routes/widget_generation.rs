//! Widget generation endpoint.
//!
//! `POST /gemini-controlled-generation` turns a validated widget request into
//! one structured-output provider call. The provider's text is returned as a
//! JSON string literal, so the body is JSON text encoded twice; existing
//! widget editors unwrap it twice.

use async_trait::async_trait;
use axum::http::Method;
use std::time::Instant;

use widgetgen_values::{compose_prompt, plan_generation, validate_all_fields, WidgetEnvelope};

use crate::error::{ApiError, ApiResult};
use crate::route_trait::{RequestContext, RouteHandler, RouteMetadata};
use crate::traits::{AppStateProvider, GenerationError, GenerationRequest};

/// Widget generation route handler.
pub struct WidgetGenerationRoute;

#[async_trait]
impl RouteHandler for WidgetGenerationRoute {
    type Request = WidgetEnvelope;
    /// Raw provider text; serialized as a JSON string.
    type Response = String;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            path: "/gemini-controlled-generation",
            method: Method::POST,
            tags: &["Generation"],
            description: "Generate widget content as schema-constrained JSON",
            requires_auth: true,
        }
    }

    async fn validate_request(req: &Self::Request) -> ApiResult<()> {
        let errors = validate_all_fields(&req.data);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }

    async fn handle<S>(
        req: Self::Request,
        ctx: &RequestContext,
        state: &S,
    ) -> ApiResult<Self::Response>
    where
        S: AppStateProvider + Send + Sync,
    {
        let request_id = ctx.request_id;
        let request = req.data;

        // validate_request rejects unknown kinds, so this only fails if
        // handle is called directly.
        let kind = match request.kind() {
            Ok(Some(kind)) => kind,
            Ok(None) | Err(_) => {
                let errors = validate_all_fields(&request);
                return Err(ApiError::Validation(errors));
            }
        };

        let plan = plan_generation(kind, &request);
        let prompt = compose_prompt(&request);

        tracing::info!(
            request_id = %request_id,
            widget_type = %kind,
            temperature = ?request.creativity_level,
            quick_refresh = request.quick_refresh(),
            prompt_length = prompt.len(),
            "Widget generation request received"
        );

        let generation = GenerationRequest {
            system_instruction: plan.system_instruction,
            response_schema: plan.response_schema,
            temperature: request.creativity_level,
            prompt,
        };

        let started = Instant::now();
        let call = state.generator().generate(generation);
        let result = match state.generation_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Timeout(limit)),
            },
            None => call.await,
        };

        match result {
            Ok(text) => {
                tracing::info!(
                    request_id = %request_id,
                    widget_type = %kind,
                    response_length = text.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Widget generation successful"
                );
                Ok(text)
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    widget_type = %kind,
                    error = %e,
                    "Widget generation failed"
                );
                Err(e.into())
            }
        }
    }
}

crate::enforce_route_handler!(WidgetGenerationRoute);
