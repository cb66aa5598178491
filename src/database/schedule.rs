use sqlx::Row;

use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::Schedule;

impl Database {
    /// The schedule is a singleton document; `days` and `overrides` are
    /// stored as JSON.
    pub async fn get_schedule(&self) -> ApiResult<Option<Schedule>> {
        let row = sqlx::query("SELECT timezone, days, overrides FROM schedule WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let timezone: String = row.try_get("timezone")?;
        let days: String = row.try_get("days")?;
        let overrides: String = row.try_get("overrides")?;

        Ok(Some(Schedule {
            timezone,
            days: serde_json::from_str(&days)
                .map_err(|e| ApiError::Internal(format!("Corrupt schedule days: {}", e)))?,
            overrides: serde_json::from_str(&overrides)
                .map_err(|e| ApiError::Internal(format!("Corrupt schedule overrides: {}", e)))?,
        }))
    }

    /// Wholesale replacement; there is no partial-field mutation path.
    pub async fn upsert_schedule(&self, schedule: &Schedule) -> ApiResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let days = serde_json::to_string(&schedule.days)
            .map_err(|e| ApiError::Internal(format!("Failed to encode schedule days: {}", e)))?;
        let overrides = serde_json::to_string(&schedule.overrides).map_err(|e| {
            ApiError::Internal(format!("Failed to encode schedule overrides: {}", e))
        })?;

        sqlx::query(
            "INSERT INTO schedule (id, timezone, days, overrides, updated_at)
             VALUES (1, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 timezone = excluded.timezone,
                 days = excluded.days,
                 overrides = excluded.overrides,
                 updated_at = excluded.updated_at",
        )
        .bind(&schedule.timezone)
        .bind(days)
        .bind(overrides)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
