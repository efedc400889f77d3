use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use tracing::debug;

use crate::models::calendar::CalendarEvent;
use crate::models::settings::AvailabilityPolicy;
use crate::services::schedule::{
    day_bounds, format_clock_12h, is_business_day, BufferedSlots, SlotStrategy, TimeInterval,
};

// Buffer applied around real meetings, and the rounding grid for slot edges
pub const BUFFER_MINUTES: u32 = 15;
pub const ROUND_MINUTES: u32 = 15;
// Windows shorter than this after buffering are not worth offering
pub const MIN_SLOT_MINUTES: i64 = 60;

/// The multi-week scan window: start is tomorrow advanced past any
/// weekend, end is the second Friday counted forward from the start date
/// (the start date itself counts when it falls on a Friday).
pub fn outreach_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let mut start = today + Duration::days(1);
    while !is_business_day(start) {
        start += Duration::days(1);
    }

    let mut end = start;
    let mut fridays = 0;
    loop {
        if end.weekday() == Weekday::Fri {
            fridays += 1;
            if fridays == 2 {
                break;
            }
        }
        end += Duration::days(1);
    }

    (start, end)
}

/// The UTC instant range to request from the calendar collaborator:
/// local midnight of the window's first day through the last second of
/// its final day.
pub fn outreach_fetch_range(
    now: DateTime<Utc>,
    policy: &AvailabilityPolicy,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = policy.timezone;
    let today = now.with_timezone(&tz).date_naive();
    let (start, end) = outreach_window(today);

    let time_min = start
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| local_instant(tz, naive))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);
    let time_max = end
        .and_hms_opt(23, 59, 59)
        .and_then(|naive| local_instant(tz, naive))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now + Duration::days(21));

    (time_min, time_max)
}

// Resolve a wall-clock time in a zone. Times skipped by a forward DST
// transition resolve to one hour later, so the range keeps covering the
// whole window instead of collapsing to the fallback.
fn local_instant(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

/// Whether an event title marks the event as a soft hold (non-blocking).
/// Matching is by case-insensitive prefix.
pub fn is_ignored_title(title: &str, prefixes: &[String]) -> bool {
    let lowered = title.to_lowercase();
    prefixes.iter().any(|prefix| lowered.starts_with(prefix))
}

/// Produce the multi-week availability text: one line per business day
/// with free time, slots joined with " , ", and a blank line between
/// lines whose ISO week differs. Pure function of (clock, events,
/// policy); an empty event list means every day is fully free.
pub fn generate_availability(
    now: DateTime<Utc>,
    events: &[CalendarEvent],
    policy: &AvailabilityPolicy,
) -> String {
    let tz = policy.timezone;
    let today = now.with_timezone(&tz).date_naive();
    let (start_date, end_date) = outreach_window(today);

    // Soft holds are transparent: drop them before any interval math
    let blocking: Vec<TimeInterval> = events
        .iter()
        .filter(|event| {
            if is_ignored_title(&event.title, &policy.ignored_prefixes) {
                debug!("Ignoring soft-hold event: {}", event.title);
                false
            } else {
                true
            }
        })
        .map(|event| {
            TimeInterval::new(
                event.start_time.with_timezone(&tz),
                event.end_time.with_timezone(&tz),
            )
        })
        .collect();

    let strategy = BufferedSlots {
        buffer_minutes: BUFFER_MINUTES,
        round_minutes: ROUND_MINUTES,
        min_minutes: MIN_SLOT_MINUTES,
    };

    let mut lines: Vec<String> = Vec::new();
    let mut last_week = None;
    let mut date = start_date;

    while date <= end_date {
        if is_business_day(date) {
            if let Some(bounds) = day_bounds(tz, date, policy.start_hour, policy.end_hour) {
                let slots = strategy.day_slots(&bounds, &blocking);

                if !slots.is_empty() {
                    // Blank line between weeks for visual grouping
                    let week = date.iso_week();
                    if let Some(previous) = last_week {
                        if previous != week {
                            lines.push(String::new());
                        }
                    }
                    last_week = Some(week);

                    let formatted = slots
                        .iter()
                        .map(|slot| {
                            format!(
                                "{} - {}",
                                format_clock_12h(&slot.start),
                                format_clock_12h(&slot.end)
                            )
                        })
                        .collect::<Vec<_>>()
                        .join(" , ");

                    lines.push(format!(
                        "{}, {} {}: {}",
                        date.format("%a"),
                        date.format("%b"),
                        date.day(),
                        formatted
                    ));
                }
            }
        }

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    lines.join("\n")
}
