use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::middleware::error::ApiError;
use crate::database::Database;
use crate::services::{AvailabilityService, BookingService, ClientRateLimiter, TelegramNotifier};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub session_duration_hours: i64,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub availability_service: AvailabilityService,
    pub booking_service: BookingService,
    pub notifier: TelegramNotifier,
    pub login_limiter: ClientRateLimiter,
    pub public_limiter: ClientRateLimiter,
}

/// The authenticated admin attached to a request by `require_auth`.
#[derive(Clone)]
pub struct AdminSession {
    pub username: String,
    pub token: String,
}

/// Extract and validate the session token from the Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = auth_header
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let session = state
        .db
        .get_session_by_token(token)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if session.is_expired() {
        // Delete expired session
        state.db.delete_session(token).await.ok();
        return Err(ApiError::Unauthorized);
    }

    request.extensions_mut().insert(AdminSession {
        username: session.username,
        token: session.token,
    });

    Ok(next.run(request).await)
}
