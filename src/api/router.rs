use axum::{
    extract::State,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::middleware::{require_auth, AppState};
use crate::api::{appointments, auth, notifications, public, schedule};

pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/schedule", get(schedule::get_schedule))
        .route("/schedule", put(schedule::put_schedule))
        .route("/appointments", get(appointments::list_appointments))
        .route("/appointments", post(appointments::create_appointment))
        .route("/appointments/:id", put(appointments::update_appointment))
        .route("/appointments/:id", delete(appointments::delete_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let open = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/public/availability", get(public::get_availability))
        .route("/public/appointments", post(public::create_booking))
        .route("/notifications/telegram", post(notifications::send_telegram));

    Router::new()
        .merge(protected)
        .merge(open)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

fn cors_layer(cors_origin: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors_origin
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if cors_origin.trim() == "*" || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_connected = sqlx::query("SELECT 1")
        .execute(state.db.pool())
        .await
        .is_ok();

    Json(json!({
        "status": "ok",
        "db": if db_connected { "connected" } else { "disconnected" },
    }))
}
