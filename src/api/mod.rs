use axum::{Router, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::upstream::SuggestionUpstream;

pub mod handlers;
pub mod models;

/// Shared, read-only state of the proxy.
pub struct ProxyState<U> {
    pub config: Config,
    pub upstream: U,
}

impl<U: SuggestionUpstream> ProxyState<U> {
    pub fn new(config: Config, upstream: U) -> Arc<Self> {
        Arc::new(Self { config, upstream })
    }
}

pub fn create_router<U: SuggestionUpstream>(state: Arc<ProxyState<U>>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/domains", get(handlers::domains_handler::<U>))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
