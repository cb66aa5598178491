use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::middleware::{AdminSession, ApiResult, AppState};
use crate::models::{Appointment, CreateAppointmentRequest, UpdateAppointmentRequest};

// List appointments (admin)
pub async fn list_appointments(
    State(state): State<AppState>,
    axum::Extension(_admin): axum::Extension<AdminSession>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let appointments = state.db.list_appointments().await?;

    Ok(Json(appointments))
}

// Create appointment (admin)
pub async fn create_appointment(
    State(state): State<AppState>,
    axum::Extension(_admin): axum::Extension<AdminSession>,
    Json(request): Json<CreateAppointmentRequest>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    let appointment = state.booking_service.create_admin_appointment(request).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

// Update appointment (admin)
pub async fn update_appointment(
    State(state): State<AppState>,
    axum::Extension(_admin): axum::Extension<AdminSession>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> ApiResult<Json<Appointment>> {
    let appointment = state.booking_service.update_appointment(&id, request).await?;

    Ok(Json(appointment))
}

// Delete appointment (admin)
pub async fn delete_appointment(
    State(state): State<AppState>,
    axum::Extension(_admin): axum::Extension<AdminSession>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.delete_appointment(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
