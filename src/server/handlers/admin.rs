use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;

use crate::database::entities::users::UserSummary;
use crate::database::entities::Role;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::identity::require;
use crate::services::DashboardStats;

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    /// `pending` limits the list to employees awaiting approval.
    pub status: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UsersQuery>,
) -> ApiResult<Json<Vec<UserSummary>>> {
    require(&headers, Role::Admin)?;
    let pending_only = query.status.as_deref() == Some("pending");
    Ok(Json(state.users.list_users(pending_only).await?))
}

pub async fn approve_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<UserSummary>> {
    require(&headers, Role::Admin)?;
    let Path(id) = id?;
    Ok(Json(state.users.approve_user(id).await?))
}

pub async fn stats(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<DashboardStats>> {
    require(&headers, Role::Admin)?;
    Ok(Json(state.users.stats().await?))
}
