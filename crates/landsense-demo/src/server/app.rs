use crate::models::{DemoConfig, ServerConfig};
use crate::server::routes;
use crate::state::DemoAppState;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use landsense_classifiers::{spawn_initialize, OnnxModelLoader};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum application
pub fn build_app(state: DemoAppState) -> Router {
    let cors = cors_layer(&state.config.server);
    let body_limit = state.config.server.body_limit;

    let api_routes = Router::new()
        // Health
        .route("/health", get(routes::health))
        .route("/status", get(routes::status))
        // Classification
        .route("/classify", post(routes::classify))
        .route("/sample/:kind", get(routes::sample_image));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the API: any origin unless the config names an allowlist
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if server.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Run the server, loading the model in the background
pub async fn run_server(config: DemoConfig, addr: SocketAddr) -> anyhow::Result<()> {
    let source = config.classifier.to_model_source();
    let state = DemoAppState::from_config(config);

    // Requests arriving before the model is ready get demo predictions
    spawn_initialize(
        Arc::clone(&state.classifier),
        Arc::new(OnnxModelLoader::new()),
        source,
    );

    let app = build_app(state);

    tracing::info!("Starting LandSense Demo server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
