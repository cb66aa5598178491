pub mod appointments;
pub mod auth;
pub mod middleware;
pub mod notifications;
pub mod public;
pub mod router;
pub mod schedule;

pub use middleware::*;
pub use router::build_router;
