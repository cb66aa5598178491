use sqlx::Row;

use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{Appointment, AppointmentStatus};

// All interval comparisons below are TEXT comparisons; appointment instants
// are canonical UTC RFC 3339 strings, so lexicographic order is
// chronological.

impl Database {
    /// Unconditional insert, used for appointments that do not occupy the
    /// calendar (cancelled/completed).
    pub async fn insert_appointment(&self, appointment: &Appointment) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO appointments (id, full_name, phone, note, starts_at, ends_at, status, source, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&appointment.id)
        .bind(&appointment.full_name)
        .bind(&appointment.phone)
        .bind(&appointment.note)
        .bind(&appointment.starts_at)
        .bind(&appointment.ends_at)
        .bind(appointment.status.to_string())
        .bind(appointment.source.to_string())
        .bind(&appointment.created_at)
        .bind(&appointment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert guarded by the no-overlap invariant: the row is only written
    /// when no scheduled appointment overlaps `[starts_at, ends_at)`. A
    /// single statement, so two concurrent bookings for the same interval
    /// cannot both pass the check.
    pub async fn insert_appointment_checked(&self, appointment: &Appointment) -> ApiResult<()> {
        if appointment.status != AppointmentStatus::Scheduled {
            return self.insert_appointment(appointment).await;
        }

        let result = sqlx::query(
            "INSERT INTO appointments (id, full_name, phone, note, starts_at, ends_at, status, source, created_at, updated_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM appointments
                 WHERE status = 'scheduled' AND starts_at < ? AND ends_at > ?
             )",
        )
        .bind(&appointment.id)
        .bind(&appointment.full_name)
        .bind(&appointment.phone)
        .bind(&appointment.note)
        .bind(&appointment.starts_at)
        .bind(&appointment.ends_at)
        .bind(appointment.status.to_string())
        .bind(appointment.source.to_string())
        .bind(&appointment.created_at)
        .bind(&appointment.updated_at)
        .bind(&appointment.ends_at)
        .bind(&appointment.starts_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::Conflict("Slot already booked".to_string()));
        }

        Ok(())
    }

    /// Update guarded the same way, excluding the row itself from the
    /// overlap check. Distinguishes a vanished row from a conflicting one
    /// after the fact.
    pub async fn update_appointment_checked(&self, appointment: &Appointment) -> ApiResult<()> {
        let result = if appointment.status == AppointmentStatus::Scheduled {
            sqlx::query(
                "UPDATE appointments
                 SET full_name = ?, phone = ?, note = ?, starts_at = ?, ends_at = ?, status = ?, updated_at = ?
                 WHERE id = ? AND NOT EXISTS (
                     SELECT 1 FROM appointments
                     WHERE id <> ? AND status = 'scheduled' AND starts_at < ? AND ends_at > ?
                 )",
            )
            .bind(&appointment.full_name)
            .bind(&appointment.phone)
            .bind(&appointment.note)
            .bind(&appointment.starts_at)
            .bind(&appointment.ends_at)
            .bind(appointment.status.to_string())
            .bind(&appointment.updated_at)
            .bind(&appointment.id)
            .bind(&appointment.id)
            .bind(&appointment.ends_at)
            .bind(&appointment.starts_at)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query(
                "UPDATE appointments
                 SET full_name = ?, phone = ?, note = ?, starts_at = ?, ends_at = ?, status = ?, updated_at = ?
                 WHERE id = ?",
            )
            .bind(&appointment.full_name)
            .bind(&appointment.phone)
            .bind(&appointment.note)
            .bind(&appointment.starts_at)
            .bind(&appointment.ends_at)
            .bind(appointment.status.to_string())
            .bind(&appointment.updated_at)
            .bind(&appointment.id)
            .execute(&self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            if self.get_appointment(&appointment.id).await?.is_none() {
                return Err(ApiError::NotFound("Appointment not found".to_string()));
            }
            return Err(ApiError::Conflict("Slot already booked".to_string()));
        }

        Ok(())
    }

    /// Fast-path probe for the public booking flow.
    pub async fn find_scheduled_conflict(
        &self,
        starts_at: &str,
        ends_at: &str,
        exclude_id: Option<&str>,
    ) -> ApiResult<Option<Appointment>> {
        let row = match exclude_id {
            Some(id) => {
                sqlx::query(
                    "SELECT * FROM appointments
                     WHERE id <> ? AND status = 'scheduled' AND starts_at < ? AND ends_at > ?
                     LIMIT 1",
                )
                .bind(id)
                .bind(ends_at)
                .bind(starts_at)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT * FROM appointments
                     WHERE status = 'scheduled' AND starts_at < ? AND ends_at > ?
                     LIMIT 1",
                )
                .bind(ends_at)
                .bind(starts_at)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        row.map(|row| appointment_from_row(&row)).transpose()
    }

    pub async fn get_appointment(&self, id: &str) -> ApiResult<Option<Appointment>> {
        let row = sqlx::query("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| appointment_from_row(&row)).transpose()
    }

    pub async fn list_appointments(&self) -> ApiResult<Vec<Appointment>> {
        let rows = sqlx::query("SELECT * FROM appointments ORDER BY starts_at ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(appointment_from_row).collect()
    }

    /// Scheduled appointments overlapping a UTC window, for the availability
    /// pipeline.
    pub async fn list_scheduled_overlapping(
        &self,
        window_start: &str,
        window_end: &str,
    ) -> ApiResult<Vec<Appointment>> {
        let rows = sqlx::query(
            "SELECT * FROM appointments
             WHERE status = 'scheduled' AND starts_at < ? AND ends_at > ?
             ORDER BY starts_at ASC",
        )
        .bind(window_end)
        .bind(window_start)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(appointment_from_row).collect()
    }

    /// Idempotent delete; removing an absent appointment is not an error.
    pub async fn delete_appointment(&self, id: &str) -> ApiResult<()> {
        sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn appointment_from_row(row: &sqlx::any::AnyRow) -> ApiResult<Appointment> {
    Ok(Appointment {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        phone: row.try_get("phone")?,
        note: row.try_get("note")?,
        starts_at: row.try_get("starts_at")?,
        ends_at: row.try_get("ends_at")?,
        status: row
            .try_get::<String, _>("status")?
            .parse()
            .map_err(ApiError::Internal)?,
        source: row
            .try_get::<String, _>("source")?
            .parse()
            .map_err(ApiError::Internal)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
