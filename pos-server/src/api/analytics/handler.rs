//! Analytics API handlers

use axum::{Json, extract::State};
use chrono::{NaiveTime, Utc};

use shared::response::AnalyticsSummary;

use crate::api::owner::OwnerId;
use crate::core::ServerState;
use crate::db::repository::analytics;
use crate::utils::AppResult;

/// GET /api/analytics — today's numbers (UTC day boundary)
pub async fn summary(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<AnalyticsSummary>> {
    let since = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let report = analytics::summary(&state.pool, &owner, since).await?;
    Ok(Json(report))
}
