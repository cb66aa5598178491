use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, ApiResult, AppState};
use crate::api::public::check_public_limit;

#[derive(Debug, Deserialize)]
pub struct TelegramMessage {
    #[serde(default)]
    pub text: Option<String>,
}

// POST /notifications/telegram
pub async fn send_telegram(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<TelegramMessage>,
) -> ApiResult<StatusCode> {
    check_public_limit(&state, &addr).await?;

    let text = request
        .text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("text is required".to_string()))?;

    state.notifier.send(&text).await?;

    Ok(StatusCode::NO_CONTENT)
}
