//! API route handlers.

pub mod health;
pub mod widget_generation;

use utoipa::OpenApi;

/// OpenAPI document, served at `/api-doc/openapi.json` when enabled.
///
/// Routes are mounted through the `RouteHandler` trait rather than utoipa's
/// path macros, so only the component schemas are listed here.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "WidgetGen API",
        version = "1.0.0",
        description = "Structured widget content generation backed by Gemini",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    paths(),
    components(schemas(
        health::HealthResponse,
        widgetgen_values::WidgetEnvelope,
        widgetgen_values::WidgetRequest,
        widgetgen_values::WidgetContent,
        widgetgen_values::ContentItem,
        widgetgen_values::WidgetKind,
        widgetgen_values::ErrorMap,
    )),
    tags(
        (name = "Generation", description = "POST /gemini-controlled-generation: bearer token required. 200 returns the provider's JSON text as a JSON string; 400 returns an ErrorMap; 401 and 500 return plain text."),
        (name = "System", description = "GET /health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_request_schema() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &doc["components"]["schemas"];
        assert!(schemas.get("WidgetRequest").is_some());
        assert!(schemas.get("ErrorMap").is_some());
        assert_eq!(doc["info"]["title"], "WidgetGen API");
    }
}
