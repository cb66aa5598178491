pub mod auth;
pub mod availability;
pub mod availability_service;
pub mod booking_service;
pub mod notifier;
pub mod rate_limiter;

pub use availability_service::AvailabilityService;
pub use booking_service::BookingService;
pub use notifier::TelegramNotifier;
pub use rate_limiter::ClientRateLimiter;
