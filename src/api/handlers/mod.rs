use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{GraphError, WorkspaceError};
use crate::graph::GraphLoader;
use crate::models::*;
use crate::tree;
use crate::view::EntityView;
use crate::workspace::Workspace;

// ============================================================
// Error Handling
// ============================================================

/// Map a graph error to a response.
///
/// Missing ids and append collisions are reported to the client as-is. Any
/// other failure is logged server-side and returned as a generic message so
/// internal details don't leak.
fn graph_error(e: GraphError) -> (StatusCode, String) {
    match e {
        GraphError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        GraphError::Conflict(_) => (StatusCode::CONFLICT, e.to_string()),
        GraphError::Resolution(_) => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

/// Creation failures are validation errors and safe to expose.
fn workspace_error(e: WorkspaceError) -> (StatusCode, String) {
    match e {
        WorkspaceError::Graph(inner) => graph_error(inner),
        WorkspaceError::DuplicateId(_) => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::CONFLICT, e.to_string())
        }
        other => {
            tracing::warn!("Validation error: {}", other);
            (StatusCode::BAD_REQUEST, other.to_string())
        }
    }
}

fn not_found(what: &str, id: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{} not found: {}", what, id))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Entities
// ============================================================

#[derive(Debug, Deserialize)]
pub struct EntityQuery {
    #[serde(default)]
    pub name_only: bool,
}

pub async fn list_libraries(State(workspace): State<Workspace>) -> Json<Vec<Entity>> {
    Json(workspace.get_libraries())
}

pub async fn create_entity(
    State(workspace): State<Workspace>,
    Json(input): Json<CreateEntityInput>,
) -> Result<(StatusCode, Json<Entity>), (StatusCode, String)> {
    workspace
        .create_entity(input)
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(workspace_error)
}

pub async fn get_entity(
    State(workspace): State<Workspace>,
    Path(id): Path<EntityId>,
    Query(query): Query<EntityQuery>,
) -> Result<Response, (StatusCode, String)> {
    if query.name_only {
        workspace
            .get_entity_name(&id)
            .map(|name| Json(name).into_response())
            .ok_or_else(|| not_found("Entity", &id))
    } else {
        workspace
            .get_entity(&id)
            .map(|entity| Json(entity).into_response())
            .ok_or_else(|| not_found("Entity", &id))
    }
}

pub async fn get_entity_tree(
    State(workspace): State<Workspace>,
    Path(id): Path<EntityId>,
) -> Result<Json<Vec<TreeNode>>, (StatusCode, String)> {
    let loader = GraphLoader::new(workspace);
    tree::load(&loader, &id).await.map(Json).map_err(graph_error)
}

pub async fn get_entity_timeline(
    State(workspace): State<Workspace>,
    Path(id): Path<EntityId>,
) -> Result<Json<Vec<CompositeChild>>, (StatusCode, String)> {
    let entity = workspace
        .get_entity(&id)
        .ok_or_else(|| not_found("Entity", &id))?;

    let mut view = EntityView::new(entity);
    view.load(&workspace).await;
    Ok(Json(view.render_order()))
}

pub async fn add_comment(
    State(workspace): State<Workspace>,
    Path(id): Path<EntityId>,
    Json(input): Json<CreateCommentInput>,
) -> Result<(StatusCode, Json<Comment>), (StatusCode, String)> {
    workspace
        .add_comment(&id, input)
        .map(|c| (StatusCode::CREATED, Json(c)))
        .map_err(workspace_error)
}

// ============================================================
// Content Blocks
// ============================================================

pub async fn add_content_block(
    State(workspace): State<Workspace>,
    Path(id): Path<EntityId>,
    Json(input): Json<CreateContentBlockInput>,
) -> Result<(StatusCode, Json<ContentBlock>), (StatusCode, String)> {
    workspace
        .add_content_block(&id, input)
        .map(|b| (StatusCode::CREATED, Json(b)))
        .map_err(workspace_error)
}

pub async fn get_content_block(
    State(workspace): State<Workspace>,
    Path(id): Path<ContentBlockId>,
) -> Result<Json<ContentBlock>, (StatusCode, String)> {
    workspace
        .get_content_block(&id)
        .map(Json)
        .ok_or_else(|| not_found("Content block", &id))
}

pub async fn list_versions(
    State(workspace): State<Workspace>,
    Path(id): Path<ContentBlockId>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    workspace
        .versions()
        .history_strings(&id)
        .map(Json)
        .map_err(graph_error)
}

/// Append over HTTP never waits: a second append on the same block while one
/// is in flight is answered with 409.
pub async fn append_version(
    State(workspace): State<Workspace>,
    Path(id): Path<ContentBlockId>,
    Json(input): Json<AppendVersionInput>,
) -> Result<(StatusCode, Json<VersionAppended>), (StatusCode, String)> {
    workspace
        .versions()
        .try_append(&id, input.content)
        .map(|version_index| (StatusCode::CREATED, Json(VersionAppended { version_index })))
        .map_err(graph_error)
}
