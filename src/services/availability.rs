use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::models::{Appointment, AppointmentStatus, GeneratedSlot, Schedule};

/// Canonical wire format for instants: UTC RFC 3339 at second precision.
/// Every timestamp the scheduling core writes goes through this, so TEXT
/// comparison in SQL is chronological.
pub fn format_utc(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => None,
    }
}

/// Bookable intervals for one calendar day.
///
/// An override for the date replaces the weekday template outright, even when
/// its slot list is empty. Definitions are walked in stored order; each one
/// yields back-to-back `duration_minutes` units until the next unit would
/// cross `end_minute` (a trailing partial unit is dropped). Local times
/// erased by a DST gap yield no slot; ambiguous local times resolve to the
/// earlier offset.
pub fn generate_daily_slots(date: NaiveDate, schedule: &Schedule, tz: Tz) -> Vec<GeneratedSlot> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let weekday = i64::from(date.weekday().num_days_from_sunday());

    let override_slots = schedule
        .overrides
        .iter()
        .find(|entry| entry.date == date_str)
        .map(|entry| entry.slots.as_slice());
    let template_slots = schedule
        .days
        .iter()
        .find(|day| day.weekday == weekday)
        .map(|day| day.slots.as_slice());

    let definitions = match override_slots.or(template_slots) {
        Some(definitions) => definitions,
        None => return Vec::new(),
    };

    let midnight = NaiveDateTime::new(date, NaiveTime::MIN);
    let mut slots = Vec::new();

    for definition in definitions {
        if definition.duration_minutes < 1 {
            continue;
        }
        let mut cursor = definition.start_minute;
        while cursor + definition.duration_minutes <= definition.end_minute {
            let starts = resolve_local(tz, midnight + Duration::minutes(cursor));
            let ends = resolve_local(
                tz,
                midnight + Duration::minutes(cursor + definition.duration_minutes),
            );
            if let (Some(starts), Some(ends)) = (starts, ends) {
                slots.push(GeneratedSlot {
                    starts_at: format_utc(&starts.with_timezone(&Utc)),
                    ends_at: format_utc(&ends.with_timezone(&Utc)),
                });
            }
            cursor += definition.duration_minutes;
        }
    }

    slots
}

/// Drop every slot that strictly overlaps a scheduled appointment. Touching
/// endpoints do not overlap; cancelled and completed appointments never
/// block. Pure and date-agnostic.
pub fn subtract_appointments_from_slots(
    slots: Vec<GeneratedSlot>,
    appointments: &[Appointment],
) -> Vec<GeneratedSlot> {
    let busy: Vec<(DateTime<Utc>, DateTime<Utc>)> = appointments
        .iter()
        .filter(|appointment| appointment.status == AppointmentStatus::Scheduled)
        .filter_map(|appointment| {
            Some((
                parse_instant(&appointment.starts_at)?,
                parse_instant(&appointment.ends_at)?,
            ))
        })
        .collect();

    slots
        .into_iter()
        .filter(|slot| {
            let (Some(starts), Some(ends)) =
                (parse_instant(&slot.starts_at), parse_instant(&slot.ends_at))
            else {
                return false;
            };
            !busy
                .iter()
                .any(|(busy_start, busy_end)| *busy_start < ends && *busy_end > starts)
        })
        .collect()
}

/// The UTC window covering one calendar day in the given zone, local midnight
/// to the next local midnight.
pub fn day_window_utc(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = resolve_day_start(date, tz)?;
    let end = resolve_day_start(date.succ_opt()?, tz)?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

fn resolve_day_start(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    let midnight = NaiveDateTime::new(date, NaiveTime::MIN);
    // a DST gap can swallow midnight itself; the day then starts at the
    // first hour that exists
    resolve_local(tz, midnight)
        .or_else(|| resolve_local(tz, midnight + Duration::hours(1)))
        .or_else(|| resolve_local(tz, midnight + Duration::hours(2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentSource, ScheduleOverride, SlotDefinition, WeekdayTemplate};

    fn moscow() -> Tz {
        "Europe/Moscow".parse().unwrap()
    }

    fn slot_def(start_minute: i64, end_minute: i64, duration_minutes: i64) -> SlotDefinition {
        SlotDefinition {
            start_minute,
            end_minute,
            duration_minutes,
        }
    }

    fn schedule_with_days(days: Vec<WeekdayTemplate>) -> Schedule {
        Schedule {
            timezone: "Europe/Moscow".to_string(),
            days,
            overrides: Vec::new(),
        }
    }

    fn appointment(starts_at: &str, ends_at: &str, status: AppointmentStatus) -> Appointment {
        Appointment::new(
            "Anna Petrova".to_string(),
            "+7 900 000-00-00".to_string(),
            String::new(),
            starts_at.to_string(),
            ends_at.to_string(),
            status,
            AppointmentSource::Admin,
        )
    }

    // 2026-08-10 is a Monday (weekday 1), 2026-08-09 a Sunday (weekday 0)
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    #[test]
    fn test_exact_division_produces_back_to_back_slots() {
        // 10:00-12:00 local, 30-minute units; Moscow is UTC+3
        let schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 1,
            slots: vec![slot_def(600, 720, 30)],
        }]);

        let slots = generate_daily_slots(monday(), &schedule, moscow());

        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].starts_at, "2026-08-10T07:00:00Z");
        assert_eq!(slots[0].ends_at, "2026-08-10T07:30:00Z");
        assert_eq!(slots[3].starts_at, "2026-08-10T08:30:00Z");
        assert_eq!(slots[3].ends_at, "2026-08-10T09:00:00Z");
        for window in slots.windows(2) {
            assert_eq!(window[0].ends_at, window[1].starts_at);
        }
    }

    #[test]
    fn test_partial_trailing_unit_is_dropped() {
        // 100 minutes at 45-minute units: two full units, remainder discarded
        let schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 1,
            slots: vec![slot_def(600, 700, 45)],
        }]);

        let slots = generate_daily_slots(monday(), &schedule, moscow());

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].ends_at, "2026-08-10T08:30:00Z");
    }

    #[test]
    fn test_unit_longer_than_window_yields_no_slots() {
        let schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 1,
            slots: vec![slot_def(600, 630, 45)],
        }]);

        assert!(generate_daily_slots(monday(), &schedule, moscow()).is_empty());
    }

    #[test]
    fn test_date_without_template_or_override_is_empty() {
        let schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 2,
            slots: vec![slot_def(600, 720, 30)],
        }]);

        assert!(generate_daily_slots(monday(), &schedule, moscow()).is_empty());
    }

    #[test]
    fn test_sunday_maps_to_weekday_zero() {
        let schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 0,
            slots: vec![slot_def(540, 600, 60)],
        }]);
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();

        let slots = generate_daily_slots(sunday, &schedule, moscow());

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].starts_at, "2026-08-09T06:00:00Z");
    }

    #[test]
    fn test_override_replaces_template_slots() {
        let mut schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 1,
            slots: vec![slot_def(600, 720, 30)],
        }]);
        schedule.overrides.push(ScheduleOverride {
            date: "2026-08-10".to_string(),
            slots: vec![slot_def(840, 900, 30)],
        });

        let slots = generate_daily_slots(monday(), &schedule, moscow());

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].starts_at, "2026-08-10T11:00:00Z");
    }

    #[test]
    fn test_empty_override_closes_the_day() {
        let mut schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 1,
            slots: vec![slot_def(600, 720, 30)],
        }]);
        schedule.overrides.push(ScheduleOverride {
            date: "2026-08-10".to_string(),
            slots: Vec::new(),
        });

        assert!(generate_daily_slots(monday(), &schedule, moscow()).is_empty());
    }

    #[test]
    fn test_definitions_keep_list_order_and_are_not_merged() {
        let schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 1,
            slots: vec![slot_def(840, 900, 30), slot_def(600, 660, 30)],
        }]);

        let slots = generate_daily_slots(monday(), &schedule, moscow());

        assert_eq!(slots.len(), 4);
        // afternoon definition listed first stays first
        assert_eq!(slots[0].starts_at, "2026-08-10T11:00:00Z");
        assert_eq!(slots[2].starts_at, "2026-08-10T07:00:00Z");
    }

    #[test]
    fn test_overlapping_definitions_both_emit() {
        let schedule = schedule_with_days(vec![WeekdayTemplate {
            weekday: 1,
            slots: vec![slot_def(600, 660, 30), slot_def(630, 690, 30)],
        }]);

        let slots = generate_daily_slots(monday(), &schedule, moscow());

        assert_eq!(slots.len(), 4);
        assert_eq!(slots[1].starts_at, slots[2].starts_at);
    }

    #[test]
    fn test_generation_respects_dst_offset_change() {
        let schedule = Schedule {
            timezone: "Europe/Berlin".to_string(),
            days: vec![
                WeekdayTemplate {
                    weekday: 1,
                    slots: vec![slot_def(600, 630, 30)],
                },
            ],
            overrides: Vec::new(),
        };
        let tz: Tz = "Europe/Berlin".parse().unwrap();

        // winter: UTC+1
        let winter = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let winter_slots = generate_daily_slots(winter, &schedule, tz);
        assert_eq!(winter_slots[0].starts_at, "2026-01-05T09:00:00Z");

        // summer: UTC+2
        let summer = NaiveDate::from_ymd_opt(2026, 7, 6).unwrap();
        let summer_slots = generate_daily_slots(summer, &schedule, tz);
        assert_eq!(summer_slots[0].starts_at, "2026-07-06T08:00:00Z");
    }

    #[test]
    fn test_subtract_removes_strictly_overlapping_slot() {
        let slots = vec![
            GeneratedSlot {
                starts_at: "2026-08-10T07:00:00Z".to_string(),
                ends_at: "2026-08-10T07:30:00Z".to_string(),
            },
            GeneratedSlot {
                starts_at: "2026-08-10T07:30:00Z".to_string(),
                ends_at: "2026-08-10T08:00:00Z".to_string(),
            },
        ];
        let booked = [appointment(
            "2026-08-10T07:30:00Z",
            "2026-08-10T08:00:00Z",
            AppointmentStatus::Scheduled,
        )];

        let remaining = subtract_appointments_from_slots(slots, &booked);

        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].starts_at, "2026-08-10T07:00:00Z");
    }

    #[test]
    fn test_touching_endpoints_do_not_remove() {
        let slots = vec![GeneratedSlot {
            starts_at: "2026-08-10T07:00:00Z".to_string(),
            ends_at: "2026-08-10T07:30:00Z".to_string(),
        }];
        let booked = [
            appointment(
                "2026-08-10T06:30:00Z",
                "2026-08-10T07:00:00Z",
                AppointmentStatus::Scheduled,
            ),
            appointment(
                "2026-08-10T07:30:00Z",
                "2026-08-10T08:00:00Z",
                AppointmentStatus::Scheduled,
            ),
        ];

        let remaining = subtract_appointments_from_slots(slots, &booked);

        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn test_cancelled_and_completed_never_block() {
        let slots = vec![GeneratedSlot {
            starts_at: "2026-08-10T07:00:00Z".to_string(),
            ends_at: "2026-08-10T07:30:00Z".to_string(),
        }];
        let booked = [
            appointment(
                "2026-08-10T07:00:00Z",
                "2026-08-10T07:30:00Z",
                AppointmentStatus::Cancelled,
            ),
            appointment(
                "2026-08-10T07:00:00Z",
                "2026-08-10T07:30:00Z",
                AppointmentStatus::Completed,
            ),
        ];

        let remaining = subtract_appointments_from_slots(slots, &booked);

        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn test_partial_overlap_removes_slot() {
        let slots = vec![GeneratedSlot {
            starts_at: "2026-08-10T07:00:00Z".to_string(),
            ends_at: "2026-08-10T07:30:00Z".to_string(),
        }];
        let booked = [appointment(
            "2026-08-10T07:15:00Z",
            "2026-08-10T07:45:00Z",
            AppointmentStatus::Scheduled,
        )];

        assert!(subtract_appointments_from_slots(slots, &booked).is_empty());
    }

    #[test]
    fn test_day_window_spans_local_midnights() {
        let (start, end) = day_window_utc(monday(), moscow()).unwrap();

        assert_eq!(format_utc(&start), "2026-08-09T21:00:00Z");
        assert_eq!(format_utc(&end), "2026-08-10T21:00:00Z");
    }
}
