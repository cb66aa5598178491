use axum::{extract::State, http::StatusCode, Json};

use crate::api::middleware::{AdminSession, ApiError, ApiResult, AppState};
use crate::models::{LoginRequest, LoginResponse, Session};
use crate::services::auth::{generate_session_token, verify_password};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (Some(username), Some(password)) = (request.username.as_deref(), request.password.as_deref())
    else {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    };
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    if state.login_limiter.check(username).await.is_err() {
        return Err(ApiError::TooManyRequests(
            "Too many login attempts, please try again later".to_string(),
        ));
    }

    if username != state.admin_username {
        return Err(ApiError::Unauthorized);
    }

    if state.admin_password_hash.is_empty() {
        return Err(ApiError::Internal(
            "Admin password is not configured".to_string(),
        ));
    }

    if !verify_password(password, &state.admin_password_hash)? {
        return Err(ApiError::Unauthorized);
    }

    let session = Session::new(
        username.to_string(),
        generate_session_token(),
        state.session_duration_hours,
    );
    state.db.create_session(&session).await?;

    tracing::info!("Admin {} logged in", session.username);

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    axum::Extension(admin): axum::Extension<AdminSession>,
) -> ApiResult<StatusCode> {
    state.db.delete_session(&admin.token).await?;

    Ok(StatusCode::NO_CONTENT)
}
