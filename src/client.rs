use chrono::{DateTime, Utc};
use dotenv::dotenv;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use tracing::{debug, info};

use crate::models::calendar::{BusyInterval, CalendarEvent};

// Google Calendar API wire types

#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    items: Vec<EventResource>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventResource {
    summary: Option<String>,
    status: Option<String>,
    start: Option<EventDateTime>,
    end: Option<EventDateTime>,
}

#[derive(Debug, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct FreeBusyRequest {
    #[serde(rename = "timeMin")]
    time_min: String,
    #[serde(rename = "timeMax")]
    time_max: String,
    items: Vec<FreeBusyRequestItem>,
}

#[derive(Debug, Serialize)]
struct FreeBusyRequestItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    #[serde(default)]
    calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<BusyPeriod>,
}

#[derive(Debug, Deserialize)]
struct BusyPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Read-only client for the Google Calendar API. Token refresh is
/// handled upstream; this client only carries a bearer access token.
pub struct GoogleCalendarClient {
    client: Client,
    endpoint: String,
    calendar_id: String,
    access_token: Option<String>,
    oauth_configured: bool,
}

impl GoogleCalendarClient {
    /// Create a new calendar client from environment variables
    pub fn new() -> Self {
        dotenv().ok();

        Self {
            client: Client::new(),
            endpoint: env::var("GOOGLE_CALENDAR_API_ENDPOINT")
                .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string()),
            calendar_id: env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| "primary".to_string()),
            access_token: env::var("GOOGLE_CALENDAR_ACCESS_TOKEN").ok(),
            oauth_configured: env::var("GOOGLE_CLIENT_ID").is_ok()
                && env::var("GOOGLE_CLIENT_SECRET").is_ok(),
        }
    }

    /// Override the bearer token (used by tests to force the connected
    /// or disconnected state regardless of the environment)
    pub fn with_access_token(mut self, access_token: Option<String>) -> Self {
        self.access_token = access_token;
        self
    }

    /// Whether the OAuth integration is configured at all
    pub fn is_configured(&self) -> bool {
        self.oauth_configured || self.access_token.is_some()
    }

    /// Whether a calendar is connected for this user. Callers must check
    /// this before asking for events or free/busy data.
    pub fn is_connected(&self) -> bool {
        self.access_token.is_some()
    }

    fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or_default()
    }

    /// List raw calendar events in the given instant range, expanded to
    /// single events and ordered by start time. Cancelled entries and
    /// all-day entries (date without an instant) are skipped.
    pub async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, reqwest::Error> {
        let url = format!("{}/calendars/{}/events", self.endpoint, self.calendar_id);

        info!(
            "Fetching calendar events between {} and {}",
            time_min, time_max
        );

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(self.bearer_token())
                .query(&[
                    ("timeMin", time_min.to_rfc3339()),
                    ("timeMax", time_max.to_rfc3339()),
                    ("singleEvents", "true".to_string()),
                    ("orderBy", "startTime".to_string()),
                ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let res = request.send().await?.error_for_status()?;
            let page = res.json::<EventsPage>().await?;

            for item in page.items {
                if item.status.as_deref() == Some("cancelled") {
                    continue;
                }
                let start = item.start.as_ref().and_then(|s| s.date_time);
                let end = item.end.as_ref().and_then(|e| e.date_time);
                match (start, end) {
                    (Some(start_time), Some(end_time)) => events.push(CalendarEvent {
                        start_time,
                        end_time,
                        title: item.summary.unwrap_or_default(),
                    }),
                    _ => {
                        debug!(
                            "Skipping all-day or unbounded event: {:?}",
                            item.summary
                        );
                    }
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!("Retrieved {} calendar events", events.len());
        Ok(events)
    }

    /// Query merged busy intervals for the calendar in the given instant
    /// range, sorted by start time
    pub async fn query_free_busy(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, reqwest::Error> {
        let url = format!("{}/freeBusy", self.endpoint);

        let request_body = FreeBusyRequest {
            time_min: time_min.to_rfc3339(),
            time_max: time_max.to_rfc3339(),
            items: vec![FreeBusyRequestItem {
                id: self.calendar_id.clone(),
            }],
        };

        info!(
            "Querying free/busy between {} and {}",
            time_min, time_max
        );
        debug!("Free/busy request URL: {}", url);

        let res = self
            .client
            .post(&url)
            .bearer_auth(self.bearer_token())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        let response = res.json::<FreeBusyResponse>().await?;

        let mut intervals: Vec<BusyInterval> = response
            .calendars
            .get(&self.calendar_id)
            .map(|calendar| {
                calendar
                    .busy
                    .iter()
                    .map(|period| BusyInterval {
                        start_time: period.start,
                        end_time: period.end,
                    })
                    .collect()
            })
            .unwrap_or_default();
        intervals.sort_by_key(|interval| interval.start_time);

        info!("Retrieved {} busy intervals", intervals.len());
        Ok(intervals)
    }
}

impl Default for GoogleCalendarClient {
    fn default() -> Self {
        Self::new()
    }
}
