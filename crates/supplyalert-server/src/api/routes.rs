use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use supplyalert_db::RouteRow;
use uuid::Uuid;

use crate::middleware::{AuthenticatedUser, RequestId};

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RouteItem {
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    pub cargo: Option<String>,
    pub ai_report: String,
    pub risk_score: i16,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<RouteRow> for RouteItem {
    fn from(row: RouteRow) -> Self {
        Self {
            id: row.public_id,
            origin: row.origin,
            destination: row.destination,
            cargo: row.cargo,
            ai_report: row.ai_report,
            risk_score: row.risk_score,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RouteHistory {
    pub routes: Vec<RouteItem>,
    pub average_risk_score: i16,
}

#[derive(Debug, Deserialize)]
pub(super) struct RouteHistoryQuery {
    pub limit: Option<i64>,
}

pub(super) async fn list_routes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<RouteHistoryQuery>,
) -> Result<Json<ApiResponse<RouteHistory>>, ApiError> {
    let limit = normalize_limit(query.limit, state.history_limit);
    let rows = supplyalert_db::list_recent_routes(&state.pool, &user.0, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let average_risk_score = supplyalert_db::average_risk_score(&rows);
    let routes = rows.into_iter().map(RouteItem::from).collect();

    Ok(Json(ApiResponse {
        data: RouteHistory {
            routes,
            average_risk_score,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_route(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RouteItem>>, ApiError> {
    let row = supplyalert_db::get_route(&state.pool, &user.0, route_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "route not found"))?;

    Ok(Json(ApiResponse {
        data: RouteItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}
