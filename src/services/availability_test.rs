#[cfg(test)]
mod availability_tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use chrono_tz::America::New_York;
    use chrono_tz::Asia::Tehran;

    use crate::models::calendar::CalendarEvent;
    use crate::models::settings::AvailabilityPolicy;
    use crate::services::availability::{
        generate_availability, is_ignored_title, outreach_fetch_range, outreach_window,
    };

    fn ny_utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        New_York
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn event(start: DateTime<Utc>, end: DateTime<Utc>, title: &str) -> CalendarEvent {
        CalendarEvent {
            start_time: start,
            end_time: end,
            title: title.to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Monday 2025-06-09 morning; window runs Tue Jun 10 .. Fri Jun 20
    fn monday_morning() -> DateTime<Utc> {
        ny_utc(2025, 6, 9, 8, 0)
    }

    #[test]
    fn test_window_starts_tomorrow_on_weekdays() {
        let (start, end) = outreach_window(date(2025, 6, 9));
        assert_eq!(start, date(2025, 6, 10));
        assert_eq!(end, date(2025, 6, 20));
    }

    #[test]
    fn test_window_start_counts_as_first_friday() {
        // Tomorrow is Friday Jun 13: it is the first Friday, so the
        // window ends on the next one
        let (start, end) = outreach_window(date(2025, 6, 12));
        assert_eq!(start, date(2025, 6, 13));
        assert_eq!(end, date(2025, 6, 20));
    }

    #[test]
    fn test_window_skips_weekend_start() {
        // Tomorrow is Saturday; start advances to Monday Jun 16
        let (start, end) = outreach_window(date(2025, 6, 13));
        assert_eq!(start, date(2025, 6, 16));
        assert_eq!(end, date(2025, 6, 27));
    }

    #[test]
    fn test_fetch_range_covers_window_in_utc() {
        let policy = AvailabilityPolicy::default();
        let (time_min, time_max) = outreach_fetch_range(monday_morning(), &policy);

        // Local midnight Jun 10 and end-of-day Jun 20, Eastern Daylight Time
        assert_eq!(time_min, ny_utc(2025, 6, 10, 0, 0));
        assert_eq!(
            time_max,
            New_York
                .with_ymd_and_hms(2025, 6, 20, 23, 59, 59)
                .unwrap()
                .with_timezone(&Utc)
        );
    }

    #[test]
    fn test_fetch_range_survives_skipped_midnight() {
        // Iran's spring-forward used to skip midnight itself: on
        // 2022-03-22 (a Tuesday) clocks jumped straight from 00:00 to
        // 01:00. The range must start at the first instant that exists
        // on that day, not collapse back to "now".
        let policy = AvailabilityPolicy {
            timezone: Tehran,
            ..AvailabilityPolicy::default()
        };
        // Monday 2022-03-21, 08:00 local; the window starts on Tuesday
        let now = Tehran
            .with_ymd_and_hms(2022, 3, 21, 8, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        let (time_min, time_max) = outreach_fetch_range(now, &policy);

        assert_eq!(
            time_min,
            Tehran
                .with_ymd_and_hms(2022, 3, 22, 1, 0, 0)
                .unwrap()
                .with_timezone(&Utc)
        );
        // Second Friday from Tue Mar 22 is Apr 1
        assert_eq!(
            time_max,
            Tehran
                .with_ymd_and_hms(2022, 4, 1, 23, 59, 59)
                .unwrap()
                .with_timezone(&Utc)
        );
    }

    #[test]
    fn test_empty_calendar_gives_full_days_with_no_buffers() {
        let policy = AvailabilityPolicy::default();
        let text = generate_availability(monday_morning(), &[], &policy);
        let lines: Vec<&str> = text.lines().collect();

        // Four weekdays in the first week, a blank separator, five in the second
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "Tue, Jun 10: 10:00 AM - 5:00 PM");
        assert_eq!(lines[3], "Fri, Jun 13: 10:00 AM - 5:00 PM");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Mon, Jun 16: 10:00 AM - 5:00 PM");
        assert_eq!(lines[9], "Fri, Jun 20: 10:00 AM - 5:00 PM");
    }

    #[test]
    fn test_single_midday_event_splits_the_day() {
        let policy = AvailabilityPolicy::default();
        let events = vec![event(
            ny_utc(2025, 6, 10, 12, 0),
            ny_utc(2025, 6, 10, 13, 0),
            "Sync",
        )];

        let text = generate_availability(monday_morning(), &events, &policy);
        let first_line = text.lines().next().unwrap();

        assert_eq!(first_line, "Tue, Jun 10: 10:00 AM - 11:45 AM , 1:15 PM - 5:00 PM");
    }

    #[test]
    fn test_ignored_titles_do_not_block_time() {
        let policy = AvailabilityPolicy::default();
        let events = vec![
            event(
                ny_utc(2025, 6, 10, 10, 0),
                ny_utc(2025, 6, 10, 12, 0),
                "BEPP Reading Group",
            ),
            event(
                ny_utc(2025, 6, 10, 12, 0),
                ny_utc(2025, 6, 10, 14, 0),
                "Hold for travel",
            ),
            event(
                ny_utc(2025, 6, 10, 14, 0),
                ny_utc(2025, 6, 10, 17, 0),
                "tentative sync",
            ),
        ];

        let text = generate_availability(monday_morning(), &events, &policy);
        let first_line = text.lines().next().unwrap();

        // All three are soft holds: the day stays fully free
        assert_eq!(first_line, "Tue, Jun 10: 10:00 AM - 5:00 PM");
    }

    #[test]
    fn test_is_ignored_title_is_prefix_only() {
        let prefixes: Vec<String> = vec!["hold".to_string()];
        assert!(is_ignored_title("Hold for travel", &prefixes));
        assert!(is_ignored_title("HOLD", &prefixes));
        // The prefix appearing mid-title does not match
        assert!(!is_ignored_title("On hold: budget review", &prefixes));
    }

    #[test]
    fn test_day_with_only_short_gaps_is_omitted() {
        let policy = AvailabilityPolicy::default();
        // Gap 11:00-12:00 shrinks to 11:15-11:45 after buffers: too short
        let events = vec![
            event(ny_utc(2025, 6, 10, 10, 0), ny_utc(2025, 6, 10, 11, 0), "A"),
            event(ny_utc(2025, 6, 10, 12, 0), ny_utc(2025, 6, 10, 17, 0), "B"),
        ];

        let text = generate_availability(monday_morning(), &events, &policy);
        assert!(!text.contains("Jun 10"));
        // Other days are unaffected
        assert!(text.contains("Wed, Jun 11: 10:00 AM - 5:00 PM"));
    }

    #[test]
    fn test_event_spilling_past_window_is_clamped() {
        let policy = AvailabilityPolicy::default();
        // Starts before the working window; the free time begins after
        // its end plus buffer, rounded up
        let events = vec![event(
            ny_utc(2025, 6, 10, 9, 0),
            ny_utc(2025, 6, 10, 10, 30),
            "Early call",
        )];

        let text = generate_availability(monday_morning(), &events, &policy);
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, "Tue, Jun 10: 10:45 AM - 5:00 PM");
    }

    #[test]
    fn test_weekends_never_emitted() {
        let policy = AvailabilityPolicy::default();
        let text = generate_availability(monday_morning(), &[], &policy);

        for line in text.lines() {
            assert!(!line.starts_with("Sat"));
            assert!(!line.starts_with("Sun"));
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        let policy = AvailabilityPolicy::default();
        let events = vec![event(
            ny_utc(2025, 6, 11, 13, 30),
            ny_utc(2025, 6, 11, 14, 30),
            "Coffee chat",
        )];

        let now = monday_morning();
        let first = generate_availability(now, &events, &policy);
        let second = generate_availability(now, &events, &policy);
        assert_eq!(first, second);
    }

    #[test]
    fn test_inverted_hours_produce_no_lines() {
        let policy = AvailabilityPolicy {
            start_hour: 17,
            end_hour: 10,
            ..AvailabilityPolicy::default()
        };

        let text = generate_availability(monday_morning(), &[], &policy);
        assert!(text.is_empty());
    }
}
