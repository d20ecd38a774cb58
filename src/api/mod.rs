mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::workspace::Workspace;

pub fn create_router(workspace: Workspace) -> Router {
    let api = Router::new()
        // Entities
        .route("/libraries", get(handlers::list_libraries))
        .route("/entities", post(handlers::create_entity))
        .route("/entities/{id}", get(handlers::get_entity))
        .route("/entities/{id}/tree", get(handlers::get_entity_tree))
        .route("/entities/{id}/timeline", get(handlers::get_entity_timeline))
        .route("/entities/{id}/comments", post(handlers::add_comment))
        .route("/entities/{id}/content-blocks", post(handlers::add_content_block))
        // Content blocks
        .route("/content-blocks/{id}", get(handlers::get_content_block))
        .route("/content-blocks/{id}/versions", get(handlers::list_versions))
        .route("/content-blocks/{id}/versions", post(handlers::append_version))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(workspace)
}
