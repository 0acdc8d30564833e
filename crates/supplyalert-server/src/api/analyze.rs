//! Route analysis endpoint.
//!
//! Keeps the dashboard's response shape (`message` / `reponse_ia` / `score`)
//! instead of the `{ data, meta }` envelope used by the rest of the API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use supplyalert_db::{NewRoute, STATUS_ANALYZED};
use supplyalert_risk::{AnalysisRequest, AnalysisResult, RiskError};

use crate::middleware::{AuthenticatedUser, RequestId};

use super::AppState;

/// Request body. Accepts the dashboard's French field names as aliases.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AnalyzeBody {
    #[serde(default, alias = "depart")]
    pub origin: Option<String>,
    #[serde(default, alias = "arrivee")]
    pub destination: Option<String>,
    #[serde(default, alias = "produit")]
    pub cargo: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeResponse {
    pub message: &'static str,
    pub reponse_ia: String,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeError {
    #[serde(skip)]
    status: StatusCode,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AnalyzeError {
    fn bad_request(error: &'static str, details: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
            details,
        }
    }

    /// Maps a pipeline failure to a response without leaking upstream text.
    fn from_risk_error(error: &RiskError) -> Self {
        match error {
            RiskError::Validation(_) => Self::bad_request("Missing fields", None),
            RiskError::Upstream { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "Server Error",
                details: Some("risk assessment service unavailable".to_string()),
            },
            RiskError::Parse(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "Server Error",
                details: Some("risk assessment answer could not be read".to_string()),
            },
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub(super) async fn analyze_route(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AnalyzeError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(request_id = %req_id.0, error = %rejection, "rejected analyze body");
        AnalyzeError::bad_request("Invalid request body", Some(rejection.body_text()))
    })?;

    let request = AnalysisRequest::new(
        body.origin.as_deref().unwrap_or_default(),
        body.destination.as_deref().unwrap_or_default(),
        body.cargo.as_deref(),
    )
    .map_err(|e| AnalyzeError::from_risk_error(&e))?;

    let result = state
        .pipeline
        .assess_request(&request, Utc::now().date_naive())
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %req_id.0,
                origin = %request.origin,
                destination = %request.destination,
                error = %e,
                "route analysis failed"
            );
            AnalyzeError::from_risk_error(&e)
        })?;

    persist_route(&state, &user, &request, &result, &req_id).await;

    Ok(Json(AnalyzeResponse {
        message: "Success",
        reponse_ia: result.report_text,
        score: result.score,
    }))
}

/// Records the analysed route for the caller's history. A failed insert is
/// logged and does not affect the response.
async fn persist_route(
    state: &AppState,
    user: &AuthenticatedUser,
    request: &AnalysisRequest,
    result: &AnalysisResult,
    req_id: &RequestId,
) {
    let route = NewRoute {
        user_id: &user.0,
        origin: &request.origin,
        destination: &request.destination,
        cargo: request.cargo.as_deref(),
        ai_report: &result.report_text,
        risk_score: i16::from(result.score),
        status: STATUS_ANALYZED,
    };

    match supplyalert_db::insert_route(&state.pool, &route).await {
        Ok(id) => tracing::debug!(request_id = %req_id.0, route_id = id, "route persisted"),
        Err(e) => tracing::warn!(
            request_id = %req_id.0,
            error = %e,
            "failed to persist analysed route"
        ),
    }
}
