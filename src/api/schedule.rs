use axum::{extract::State, Json};

use crate::api::middleware::{AdminSession, ApiError, ApiResult, AppState};
use crate::models::Schedule;

// Get current schedule (admin)
pub async fn get_schedule(
    State(state): State<AppState>,
    axum::Extension(_admin): axum::Extension<AdminSession>,
) -> ApiResult<Json<Schedule>> {
    let schedule = state.db.get_schedule().await?.unwrap_or_else(Schedule::empty);

    Ok(Json(schedule))
}

// Upsert schedule (admin): the document is replaced wholesale
pub async fn put_schedule(
    State(state): State<AppState>,
    axum::Extension(_admin): axum::Extension<AdminSession>,
    Json(request): Json<Schedule>,
) -> ApiResult<Json<Schedule>> {
    request.validate().map_err(ApiError::BadRequest)?;

    state.db.upsert_schedule(&request).await?;

    Ok(Json(request))
}
