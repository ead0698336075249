use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Extension;
use axum::extract::Path;
use axum::extract::Query;
use axum::routing;
use axum::Router;
use common::http::Json;

use crate::issues;
use crate::issues::CreateIssueRequest;
use crate::issues::CreateIssueResponse;
use crate::issues::DeleteIssueRequest;
use crate::issues::DeleteIssueResponse;
use crate::issues::Issue;
use crate::issues::UpdateIssueRequest;
use crate::issues::UpdateIssueResponse;
use crate::Result;

async fn list(
    Extension(provider): Extension<Arc<issues::Issues>>,
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Issue>>> {
    Ok(Json(provider.list(project, params).await?))
}

async fn create(
    Extension(provider): Extension<Arc<issues::Issues>>,
    Path(project): Path<String>,
    Json(request): Json<CreateIssueRequest>,
) -> Result<Json<CreateIssueResponse>> {
    Ok(Json(provider.create(project, request).await?))
}

async fn update(
    Extension(provider): Extension<Arc<issues::Issues>>,
    Path(_project): Path<String>,
    Json(request): Json<UpdateIssueRequest>,
) -> Result<Json<UpdateIssueResponse>> {
    Ok(Json(provider.update(request).await?))
}

async fn delete(
    Extension(provider): Extension<Arc<issues::Issues>>,
    Path(_project): Path<String>,
    Json(request): Json<DeleteIssueRequest>,
) -> Result<Json<DeleteIssueResponse>> {
    Ok(Json(provider.delete(request).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router.route(
        "/api/issues/:project",
        routing::get(list).post(create).put(update).delete(delete),
    )
}
