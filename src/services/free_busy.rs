use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::fmt::Write as _;

use crate::models::calendar::{BusyInterval, FreeSlot};
use crate::models::settings::UserSettings;
use crate::services::schedule::{day_bounds, is_business_day, GridSlots, SlotStrategy, TimeInterval};

// Fixed slot granularity for UI slot-picking
pub const SLOT_MINUTES: u32 = 30;
// Aggregate cap across the whole window
pub const MAX_SLOTS: usize = 20;

/// Produce the flat list of bookable slots for the next `days_ahead`
/// calendar days, starting today in the configured timezone. Weekends
/// are skipped, the current day is clamped to "now", and the result is
/// truncated to the first MAX_SLOTS slots.
pub fn generate_free_slots(
    now: DateTime<Utc>,
    busy: &[BusyInterval],
    settings: &UserSettings,
    days_ahead: u32,
) -> Vec<FreeSlot> {
    let tz = settings.timezone;
    let local_now = now.with_timezone(&tz);

    let busy_local: Vec<TimeInterval> = busy
        .iter()
        .map(|interval| {
            TimeInterval::new(
                interval.start_time.with_timezone(&tz),
                interval.end_time.with_timezone(&tz),
            )
        })
        .collect();

    let strategy = GridSlots {
        slot_minutes: SLOT_MINUTES,
    };

    let mut slots = Vec::new();

    for offset in 0..days_ahead {
        let date = local_now.date_naive() + Duration::days(i64::from(offset));
        if !is_business_day(date) {
            continue;
        }

        let Some(mut bounds) = day_bounds(
            tz,
            date,
            settings.working_hours_start,
            settings.working_hours_end,
        ) else {
            continue;
        };

        // Today only: never offer time that has already passed
        if bounds.end <= local_now {
            continue;
        }
        if bounds.start < local_now {
            bounds.start = local_now;
        }

        for window in strategy.day_slots(&bounds, &busy_local) {
            slots.push(FreeSlot {
                start: window.start.with_timezone(&Utc),
                end: window.end.with_timezone(&Utc),
                label: slot_label(&window.start),
            });
            if slots.len() >= MAX_SLOTS {
                return slots;
            }
        }
    }

    slots
}

/// Locale-style label in the configured timezone, e.g. "Tue, Jun 10,
/// 2:00 PM". Falls back to an ISO-8601 timestamp if formatting fails.
fn slot_label(start: &DateTime<Tz>) -> String {
    let mut label = String::new();
    match write!(label, "{}", start.format("%a, %b %-d, %-I:%M %p")) {
        Ok(()) => label,
        Err(_) => start.to_rfc3339(),
    }
}
