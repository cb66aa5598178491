use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{
    Appointment, AppointmentSource, AppointmentStatus, CreateAppointmentRequest,
    CreateBookingRequest, UpdateAppointmentRequest,
};
use crate::services::availability::{format_utc, parse_instant};

/// Creates and mutates appointments under the no-overlap invariant. The
/// store's conditional writes are authoritative; any in-process check is
/// only a fast path.
#[derive(Clone)]
pub struct BookingService {
    db: Database,
}

impl BookingService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Public booking path. Probes for a conflict first to give the common
    /// case a cheap 409, then lets the conditional insert decide under race.
    pub async fn create_public_booking(
        &self,
        request: CreateBookingRequest,
    ) -> ApiResult<Appointment> {
        let full_name = required_field(request.full_name.as_deref())?;
        let phone = required_field(request.phone.as_deref())?;
        let starts_at = required_field(request.starts_at.as_deref())?;
        let ends_at = required_field(request.ends_at.as_deref())?;
        let (starts_at, ends_at) = validate_interval(&starts_at, &ends_at)?;

        if self
            .db
            .find_scheduled_conflict(&starts_at, &ends_at, None)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict("Slot already booked".to_string()));
        }

        let appointment = Appointment::new(
            full_name,
            phone,
            request.note.unwrap_or_default(),
            starts_at,
            ends_at,
            AppointmentStatus::Scheduled,
            AppointmentSource::Public,
        );
        self.db.insert_appointment_checked(&appointment).await?;

        tracing::info!(
            "Public booking {} created for {} - {}",
            appointment.id,
            appointment.starts_at,
            appointment.ends_at
        );

        Ok(appointment)
    }

    /// Admin creation path. No conflict shortcut, but the same store-level
    /// invariant applies when the new appointment is scheduled.
    pub async fn create_admin_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> ApiResult<Appointment> {
        let full_name = required_field(request.full_name.as_deref())?;
        let phone = required_field(request.phone.as_deref())?;
        let starts_at = required_field(request.starts_at.as_deref())?;
        let ends_at = required_field(request.ends_at.as_deref())?;
        let (starts_at, ends_at) = validate_interval(&starts_at, &ends_at)?;

        let appointment = Appointment::new(
            full_name,
            phone,
            request.note.unwrap_or_default(),
            starts_at,
            ends_at,
            request.status.unwrap_or(AppointmentStatus::Scheduled),
            AppointmentSource::Admin,
        );
        self.db.insert_appointment_checked(&appointment).await?;

        Ok(appointment)
    }

    /// Admin edit of fields, times, or status. Moving or re-scheduling an
    /// appointment re-enters the overlap check, excluding the row itself.
    pub async fn update_appointment(
        &self,
        id: &str,
        request: UpdateAppointmentRequest,
    ) -> ApiResult<Appointment> {
        let existing = self
            .db
            .get_appointment(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

        let full_name = required_field(request.full_name.as_deref())?;
        let phone = required_field(request.phone.as_deref())?;
        let starts_at = required_field(request.starts_at.as_deref())?;
        let ends_at = required_field(request.ends_at.as_deref())?;
        let (starts_at, ends_at) = validate_interval(&starts_at, &ends_at)?;

        let updated = Appointment {
            id: existing.id,
            full_name,
            phone,
            note: request.note.unwrap_or(existing.note),
            starts_at,
            ends_at,
            status: request.status.unwrap_or(existing.status),
            source: existing.source,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().to_rfc3339(),
        };
        self.db.update_appointment_checked(&updated).await?;

        Ok(updated)
    }
}

fn required_field(value: Option<&str>) -> ApiResult<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ApiError::BadRequest("fullName, phone, startsAt, endsAt are required".to_string())
        })
}

/// Both bounds must parse as instants with start strictly before end. The
/// returned pair is canonicalized for storage and SQL comparison.
fn validate_interval(starts_at: &str, ends_at: &str) -> ApiResult<(String, String)> {
    let starts =
        parse_instant(starts_at).ok_or_else(|| ApiError::BadRequest("Invalid startsAt/endsAt".to_string()))?;
    let ends =
        parse_instant(ends_at).ok_or_else(|| ApiError::BadRequest("Invalid startsAt/endsAt".to_string()))?;
    if starts >= ends {
        return Err(ApiError::BadRequest("Invalid startsAt/endsAt".to_string()));
    }
    Ok((format_utc(&starts), format_utc(&ends)))
}
