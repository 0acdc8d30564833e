//! Database operations for the `routes` table.
//!
//! Every query is scoped to a single `user_id`; no function reads or writes
//! another user's rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Status recorded for a route whose assessment completed.
pub const STATUS_ANALYZED: &str = "Analyzed";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `routes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RouteRow {
    pub id: i64,
    pub public_id: Uuid,
    pub user_id: String,
    pub origin: String,
    pub destination: String,
    pub cargo: Option<String>,
    pub ai_report: String,
    pub risk_score: i16,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Values for a new `routes` row.
#[derive(Debug, Clone)]
pub struct NewRoute<'a> {
    pub user_id: &'a str,
    pub origin: &'a str,
    pub destination: &'a str,
    pub cargo: Option<&'a str>,
    pub ai_report: &'a str,
    pub risk_score: i16,
    pub status: &'a str,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert an analysed route and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including the
/// `risk_score` range check).
pub async fn insert_route(pool: &PgPool, route: &NewRoute<'_>) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO routes \
             (user_id, origin, destination, cargo, ai_report, risk_score, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(route.user_id)
    .bind(route.origin)
    .bind(route.destination)
    .bind(route.cargo)
    .bind(route.ai_report)
    .bind(route.risk_score)
    .bind(route.status)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List a user's most recent routes, newest first (`id DESC`).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_routes(
    pool: &PgPool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<RouteRow>, DbError> {
    let rows = sqlx::query_as::<_, RouteRow>(
        "SELECT id, public_id, user_id, origin, destination, cargo, ai_report, risk_score, \
                status, created_at \
         FROM routes \
         WHERE user_id = $1 \
         ORDER BY id DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Return one of the user's routes by public id, or `None` if it does not
/// exist or belongs to someone else.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_route(
    pool: &PgPool,
    user_id: &str,
    public_id: Uuid,
) -> Result<Option<RouteRow>, DbError> {
    let row = sqlx::query_as::<_, RouteRow>(
        "SELECT id, public_id, user_id, origin, destination, cargo, ai_report, risk_score, \
                status, created_at \
         FROM routes \
         WHERE user_id = $1 AND public_id = $2",
    )
    .bind(user_id)
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Rounded mean of the rows' risk scores, `0` when there are none.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn average_risk_score(rows: &[RouteRow]) -> i16 {
    if rows.is_empty() {
        return 0;
    }
    let total: i64 = rows.iter().map(|r| i64::from(r.risk_score)).sum();
    (total as f64 / rows.len() as f64).round() as i16
}
