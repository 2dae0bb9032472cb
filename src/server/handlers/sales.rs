use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;

use super::{parse_limit, parse_range};
use crate::common::str_as_id;
use crate::database::entities::{Role, SaleRecord};
use crate::errors::SaleError;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::identity::require;
use crate::services::{GroupKey, GroupTotals, Highlights, SaleFilter, SaleSubmission, SalesSummary};

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    pub employee_id: Option<String>,
    pub location_id: Option<String>,
    pub product_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

fn id_filter(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, SaleError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => str_as_id(s).map(Some).ok_or_else(|| SaleError::InvalidFilter {
            field,
            value: s.to_string(),
        }),
    }
}

impl SalesQuery {
    fn filter(&self) -> Result<SaleFilter, SaleError> {
        Ok(SaleFilter {
            employee_id: id_filter("employeeId", self.employee_id.as_deref())?,
            location_id: id_filter("locationId", self.location_id.as_deref())?,
            product_id: self
                .product_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            range: parse_range(self.from.as_deref(), self.to.as_deref())?,
        })
    }
}

pub async fn create_sale(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SaleSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SaleRecord>)> {
    let caller = require(&headers, Role::Employee)?;
    let Json(payload) = payload?;
    let sale = state.sales.record_sale(caller.id, payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn my_sales(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<SaleRecord>>> {
    let caller = require(&headers, Role::Employee)?;
    let range = parse_range(query.from.as_deref(), query.to.as_deref())?;
    let sales = state
        .sales
        .my_sales(caller.id, range, parse_limit(query.limit.as_deref()))
        .await?;
    Ok(Json(sales))
}

pub async fn my_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<SalesSummary>> {
    let caller = require(&headers, Role::Employee)?;
    let range = parse_range(query.from.as_deref(), query.to.as_deref())?;
    Ok(Json(state.sales.summary(caller.id, range).await?))
}

pub async fn list_sales(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SalesQuery>,
) -> ApiResult<Json<Vec<SaleRecord>>> {
    require(&headers, Role::Admin)?;
    let filter = query.filter()?;
    let sales = state
        .sales
        .query_sales(filter, parse_limit(query.limit.as_deref()))
        .await?;
    Ok(Json(sales))
}

async fn summary_by(
    state: AppState,
    headers: HeaderMap,
    query: RangeQuery,
    key: GroupKey,
) -> ApiResult<Json<Vec<GroupTotals>>> {
    require(&headers, Role::Admin)?;
    let range = parse_range(query.from.as_deref(), query.to.as_deref())?;
    Ok(Json(state.sales.rollup(key, range).await?))
}

pub async fn employee_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<GroupTotals>>> {
    summary_by(state, headers, query, GroupKey::Employee).await
}

pub async fn location_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<GroupTotals>>> {
    summary_by(state, headers, query, GroupKey::Location).await
}

pub async fn highlights(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Highlights>> {
    require(&headers, Role::Admin)?;
    Ok(Json(state.sales.highlights().await?))
}
