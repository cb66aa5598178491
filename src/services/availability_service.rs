use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::GeneratedSlot;
use crate::services::availability::{
    day_window_utc, format_utc, generate_daily_slots, subtract_appointments_from_slots,
};

/// Orchestrates the availability pipeline: load the schedule once, generate
/// per-day slots, subtract freshly-read scheduled appointments. Holds no
/// cache; appointment reads are per request.
#[derive(Clone)]
pub struct AvailabilityService {
    db: Database,
}

impl AvailabilityService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Bookable slots per date over an inclusive calendar range. Every date
    /// in the range appears in the result, closed dates as an empty list.
    pub async fn get_availability(
        &self,
        start: &str,
        end: &str,
    ) -> ApiResult<BTreeMap<String, Vec<GeneratedSlot>>> {
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        if end_date < start_date {
            return Err(ApiError::BadRequest(
                "end must not precede start".to_string(),
            ));
        }

        let mut result = BTreeMap::new();

        let Some(schedule) = self.db.get_schedule().await? else {
            // nothing configured: every requested date is closed
            for date in date_range(start_date, end_date) {
                result.insert(date.format("%Y-%m-%d").to_string(), Vec::new());
            }
            return Ok(result);
        };

        let tz: Tz = schedule.timezone.parse().map_err(|_| {
            ApiError::Internal(format!("Invalid schedule timezone: {}", schedule.timezone))
        })?;

        for date in date_range(start_date, end_date) {
            let date_str = date.format("%Y-%m-%d").to_string();
            let slots = generate_daily_slots(date, &schedule, tz);

            let remaining = if slots.is_empty() {
                Vec::new()
            } else {
                match day_window_utc(date, tz) {
                    Some((window_start, window_end)) => {
                        let appointments = self
                            .db
                            .list_scheduled_overlapping(
                                &format_utc(&window_start),
                                &format_utc(&window_end),
                            )
                            .await?;
                        subtract_appointments_from_slots(slots, &appointments)
                    }
                    None => Vec::new(),
                }
            };

            result.insert(date_str, remaining);
        }

        Ok(result)
    }
}

fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("start and end are required (YYYY-MM-DD)".to_string()))
}

fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |date| date.succ_opt())
        .take_while(move |date| *date <= end)
}
