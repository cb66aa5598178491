use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, ApiResult, AppState};
use crate::models::{CreateBookingRequest, CreatedResponse, GeneratedSlot};

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

// GET /public/availability?start=YYYY-MM-DD&end=YYYY-MM-DD
pub async fn get_availability(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(params): Query<AvailabilityParams>,
) -> ApiResult<Json<BTreeMap<String, Vec<GeneratedSlot>>>> {
    check_public_limit(&state, &addr).await?;

    let (Some(start), Some(end)) = (params.start.as_deref(), params.end.as_deref()) else {
        return Err(ApiError::BadRequest(
            "start and end are required (YYYY-MM-DD)".to_string(),
        ));
    };

    let availability = state.availability_service.get_availability(start, end).await?;

    Ok(Json(availability))
}

// POST /public/appointments  (create booking without auth, with overlap check)
pub async fn create_booking(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    check_public_limit(&state, &addr).await?;

    let appointment = state.booking_service.create_public_booking(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: appointment.id }),
    ))
}

pub(crate) async fn check_public_limit(state: &AppState, addr: &SocketAddr) -> ApiResult<()> {
    state
        .public_limiter
        .check(&addr.ip().to_string())
        .await
        .map_err(|_| {
            ApiError::TooManyRequests("Too many requests, please try again later".to_string())
        })
}
