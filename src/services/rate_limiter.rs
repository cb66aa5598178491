use governor::{
    clock::{Clock, DefaultClock},
    state::direct::NotKeyed,
    state::InMemoryState,
    Quota, RateLimiter as GovernorRateLimiter,
};
use std::collections::HashMap;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio::sync::RwLock;

/// Request rate limiter for the public surface.
///
/// Tracks requests per client key (IP for public routes, username for login)
/// using a sliding window.
#[derive(Clone)]
pub struct ClientRateLimiter {
    /// Map of client key -> rate limiter instance
    limiters:
        Arc<RwLock<HashMap<String, Arc<GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>>>>>,
    /// Maximum requests allowed per window
    max_requests: u32,
    /// Time window in minutes
    window_minutes: u64,
}

impl ClientRateLimiter {
    pub fn with_config(max_requests: u32, window_minutes: u64) -> Self {
        Self {
            limiters: Arc::new(RwLock::new(HashMap::new())),
            max_requests: max_requests.max(1),
            window_minutes: window_minutes.max(1),
        }
    }

    /// Check if a client key is rate limited.
    ///
    /// Returns Ok(()) if the request is allowed, Err(duration) if rate
    /// limited. The duration indicates how long to wait before retrying.
    pub async fn check(&self, key: &str) -> Result<(), Duration> {
        let key = key.to_lowercase();

        let limiter = {
            let mut limiters = self.limiters.write().await;

            limiters
                .entry(key)
                .or_insert_with(|| {
                    let quota = Quota::with_period(Duration::from_secs(self.window_minutes * 60))
                        .unwrap()
                        .allow_burst(NonZeroU32::new(self.max_requests).unwrap());

                    Arc::new(GovernorRateLimiter::direct(quota))
                })
                .clone()
        };

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(negative) => {
                let wait_duration = negative.wait_time_from(DefaultClock::default().now());
                Err(wait_duration)
            }
        }
    }
}
