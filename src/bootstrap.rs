use crate::api::middleware::AppState;
use crate::config::Config;
use crate::database::Database;
use crate::services::{AvailabilityService, BookingService, ClientRateLimiter, TelegramNotifier};

pub fn build_app_state(db: Database, config: &Config) -> AppState {
    let availability_service = AvailabilityService::new(db.clone());
    tracing::info!("Availability service initialized");

    let booking_service = BookingService::new(db.clone());
    tracing::info!("Booking service initialized");

    let notifier = TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
    );
    if config.telegram_bot_token.is_some() && config.telegram_chat_id.is_some() {
        tracing::info!("Telegram notifier configured");
    } else {
        tracing::warn!("Telegram notifier not configured; /notifications/telegram will answer 501");
    }

    let public_limiter =
        ClientRateLimiter::with_config(config.rate_limit_max, config.rate_limit_window_minutes);
    let login_limiter = ClientRateLimiter::with_config(
        config.login_rate_limit_max,
        config.login_rate_limit_window_minutes,
    );
    tracing::info!(
        "Rate limiters initialized ({} requests per {} minutes, {} logins per {} minutes)",
        config.rate_limit_max,
        config.rate_limit_window_minutes,
        config.login_rate_limit_max,
        config.login_rate_limit_window_minutes
    );

    AppState {
        db,
        session_duration_hours: config.session_duration_hours,
        admin_username: config.admin_username.clone(),
        admin_password_hash: config.admin_password_hash.clone(),
        availability_service,
        booking_service,
        notifier,
        login_limiter,
        public_limiter,
    }
}
