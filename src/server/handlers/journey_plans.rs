use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_date_param, parse_limit};
use crate::common::str_as_id;
use crate::database::entities::{JourneyPlan, Role};
use crate::errors::PlanError;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::identity::{identity, require};
use crate::services::{ActivePlan, PlanFilter, PlanSubmission};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlansQuery {
    pub supervisor_id: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivePlanQuery {
    pub date: Option<String>,
}

pub async fn list_plans(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListPlansQuery>,
) -> ApiResult<Json<Vec<JourneyPlan>>> {
    require(&headers, Role::Admin)?;

    let supervisor_id = match query.supervisor_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            str_as_id(raw).ok_or_else(|| ApiError::bad_request(format!("Invalid supervisorId: {}", raw)))?,
        ),
    };
    let plans = state
        .plans
        .list_plans(PlanFilter {
            supervisor_id,
            limit: parse_limit(query.limit.as_deref()),
        })
        .await?;
    Ok(Json(plans))
}

pub async fn upsert_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PlanSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<JourneyPlan>)> {
    require(&headers, Role::Admin)?;
    let Json(payload) = payload?;
    let (plan, created) = state.plans.upsert_plan(payload).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(plan)))
}

pub async fn my_plans(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListPlansQuery>,
) -> ApiResult<Json<Vec<JourneyPlan>>> {
    let caller = require(&headers, Role::Supervisor)?;
    let plans = state
        .plans
        .list_plans(PlanFilter {
            supervisor_id: Some(caller.id),
            limit: parse_limit(query.limit.as_deref()),
        })
        .await?;
    Ok(Json(plans))
}

/// `null` when no plan covers the date.
pub async fn my_active_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ActivePlanQuery>,
) -> ApiResult<Json<Option<ActivePlan>>> {
    let caller = require(&headers, Role::Supervisor)?;
    let date = parse_date_param(query.date.as_deref()).map_err(PlanError::InvalidDate)?;
    let active = state.plans.active_plan(caller.id, date).await?;
    Ok(Json(active))
}

pub async fn get_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<JourneyPlan>> {
    let caller = identity(&headers)?;
    let Path(id) = id?;
    let plan = state.plans.get_plan(&caller, id).await?;
    Ok(Json(plan))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    require(&headers, Role::Admin)?;
    let Path(id) = id?;
    let removed = state.plans.delete_plan(id).await?;
    Ok(Json(json!({ "id": removed.id })))
}
