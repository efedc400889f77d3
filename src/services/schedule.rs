use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Weekday};
use chrono_tz::Tz;

/// A half-open time interval in a concrete timezone. The engines do all
/// wall-clock arithmetic in the configured zone so slot boundaries are
/// stable regardless of the server locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Round a time up to the next multiple of `interval_minutes` within the
/// hour, zeroing seconds and sub-seconds. A time already on the boundary
/// is only truncated.
pub fn round_up_to(dt: DateTime<Tz>, interval_minutes: u32) -> DateTime<Tz> {
    let remainder = dt.minute() % interval_minutes;
    let mut rounded = dt;
    if remainder != 0 {
        rounded += Duration::minutes(i64::from(interval_minutes - remainder));
    }
    truncate_to_minute(rounded)
}

/// Round a time down to the previous multiple of `interval_minutes`,
/// zeroing seconds and sub-seconds.
pub fn round_down_to(dt: DateTime<Tz>, interval_minutes: u32) -> DateTime<Tz> {
    let remainder = dt.minute() % interval_minutes;
    let mut rounded = dt;
    if remainder != 0 {
        rounded -= Duration::minutes(i64::from(remainder));
    }
    truncate_to_minute(rounded)
}

fn truncate_to_minute(dt: DateTime<Tz>) -> DateTime<Tz> {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The working window for one calendar day. Returns None when the
/// configured hours are inverted (treated as "no slots for this day")
/// or when the local time does not exist due to a DST transition.
pub fn day_bounds(tz: Tz, date: NaiveDate, start_hour: u32, end_hour: u32) -> Option<TimeInterval> {
    if start_hour >= end_hour {
        return None;
    }

    let start = tz
        .with_ymd_and_hms(date.year(), date.month(), date.day(), start_hour, 0, 0)
        .earliest()?;
    let end = tz
        .with_ymd_and_hms(date.year(), date.month(), date.day(), end_hour, 0, 0)
        .earliest()?;

    Some(TimeInterval::new(start, end))
}

/// Format a time as "H:MM AM/PM" with no leading zero on the hour
pub fn format_clock_12h(dt: &DateTime<Tz>) -> String {
    let (is_pm, hour) = dt.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        dt.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// A per-day slot policy: turns one day's working window plus the busy
/// intervals blocking it into the free windows offered to the caller.
/// Two implementations exist so the legacy buffered rules and the
/// production fixed grid share the same walking/rounding core.
pub trait SlotStrategy {
    fn day_slots(&self, bounds: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeInterval>;
}

/// Variable-length windows with asymmetric buffers: a buffer after the
/// preceding meeting (rounded up) and before the next one (rounded down),
/// never at the day boundaries, keeping only windows of a minimum length.
pub struct BufferedSlots {
    pub buffer_minutes: u32,
    pub round_minutes: u32,
    pub min_minutes: i64,
}

impl SlotStrategy for BufferedSlots {
    fn day_slots(&self, bounds: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeInterval> {
        let mut blocking: Vec<TimeInterval> = busy
            .iter()
            .filter(|interval| interval.overlaps(bounds))
            .copied()
            .collect();

        // Nothing scheduled: the whole window is one free slot, with no
        // buffers because there is nothing to buffer against
        if blocking.is_empty() {
            return vec![*bounds];
        }

        blocking.sort_by_key(|interval| interval.start);

        let buffer = Duration::minutes(i64::from(self.buffer_minutes));
        let mut slots = Vec::new();
        let mut cursor = bounds.start;

        for interval in &blocking {
            let event_start = interval.start.max(bounds.start);
            let event_end = interval.end.min(bounds.end);

            if event_start > cursor {
                let mut slot_start = cursor;
                // No buffer at the day start; otherwise pad after the
                // previous meeting and round up to a clean boundary
                if slot_start != bounds.start {
                    slot_start = round_up_to(slot_start + buffer, self.round_minutes);
                }
                let slot_end = round_down_to(event_start - buffer, self.round_minutes);

                if (slot_end - slot_start).num_minutes() >= self.min_minutes {
                    slots.push(TimeInterval::new(slot_start, slot_end));
                }
            }

            if event_end > cursor {
                cursor = event_end;
            }
        }

        // Tail window: buffered after the last meeting, but the day end
        // itself is never buffered
        if cursor < bounds.end {
            let slot_start = round_up_to(cursor + buffer, self.round_minutes);
            if (bounds.end - slot_start).num_minutes() >= self.min_minutes {
                slots.push(TimeInterval::new(slot_start, bounds.end));
            }
        }

        slots
    }
}

/// Fixed-size slots on a regular grid. The busy data is assumed to be
/// pre-merged, so no buffers or title filtering apply; the cursor simply
/// jumps past each busy interval and re-aligns to the grid.
pub struct GridSlots {
    pub slot_minutes: u32,
}

impl SlotStrategy for GridSlots {
    fn day_slots(&self, bounds: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeInterval> {
        let mut blocking: Vec<TimeInterval> = busy
            .iter()
            .filter(|interval| interval.overlaps(bounds))
            .copied()
            .collect();
        blocking.sort_by_key(|interval| interval.start);

        let step = Duration::minutes(i64::from(self.slot_minutes));
        let mut slots = Vec::new();
        let mut cursor = round_up_to(bounds.start, self.slot_minutes);

        for interval in &blocking {
            while cursor + step <= interval.start && cursor + step <= bounds.end {
                slots.push(TimeInterval::new(cursor, cursor + step));
                cursor += step;
            }
            if interval.end > cursor {
                cursor = round_up_to(interval.end, self.slot_minutes);
            }
        }

        while cursor + step <= bounds.end {
            slots.push(TimeInterval::new(cursor, cursor + step));
            cursor += step;
        }

        slots
    }
}
