//! Router configuration and setup.

use axum::{routing::get, Json, Router};
use tower_http::{
    compression::CompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use utoipa::OpenApi;

use crate::{config::ApiConfig, middleware, routes, traits::AppStateWrapper};

/// Build the application router.
///
/// Middleware layers are applied before `.with_state()`.
pub fn configure_routes(state: AppStateWrapper, config: &ApiConfig) -> Router {
    let mut router: Router<AppStateWrapper> = crate::register_routes!(
        Router::new(),
        [
            routes::health::HealthRoute,
            routes::widget_generation::WidgetGenerationRoute,
        ]
    );

    if config.enable_docs {
        let openapi = routes::ApiDoc::openapi();
        router = router.route(
            "/api-doc/openapi.json",
            get(move || {
                let openapi = openapi.clone();
                async move { Json(openapi) }
            }),
        );
    }

    // Order matters: outer to inner
    router = router
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(middleware::cors_layer(config));

    router.with_state(state)
}
