use clinicdesk::database::Database;
use clinicdesk::models::{
    Appointment, AppointmentSource, AppointmentStatus, Schedule, ScheduleOverride, SlotDefinition,
    WeekdayTemplate,
};

pub fn slot_def(start_minute: i64, end_minute: i64, duration_minutes: i64) -> SlotDefinition {
    SlotDefinition {
        start_minute,
        end_minute,
        duration_minutes,
    }
}

pub fn weekday_template(weekday: i64, slots: Vec<SlotDefinition>) -> WeekdayTemplate {
    WeekdayTemplate { weekday, slots }
}

pub fn override_for(date: &str, slots: Vec<SlotDefinition>) -> ScheduleOverride {
    ScheduleOverride {
        date: date.to_string(),
        slots,
    }
}

pub fn moscow_schedule(days: Vec<WeekdayTemplate>, overrides: Vec<ScheduleOverride>) -> Schedule {
    Schedule {
        timezone: "Europe/Moscow".to_string(),
        days,
        overrides,
    }
}

/// Persist a scheduled appointment directly, bypassing the booking guard.
pub async fn insert_appointment(
    db: &Database,
    starts_at: &str,
    ends_at: &str,
    status: AppointmentStatus,
) -> Appointment {
    let appointment = Appointment::new(
        "Ivan Ivanov".to_string(),
        "+7 900 123-45-67".to_string(),
        String::new(),
        starts_at.to_string(),
        ends_at.to_string(),
        status,
        AppointmentSource::Admin,
    );
    db.insert_appointment(&appointment)
        .await
        .expect("Failed to insert appointment");
    appointment
}

pub async fn count_scheduled(db: &Database) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments WHERE status = 'scheduled'")
        .fetch_one(db.pool())
        .await
        .expect("Failed to count appointments")
}
