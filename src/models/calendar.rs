use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// A raw calendar event as returned by the calendar provider.
// Read-only: the availability engine never mutates events. The title is
// used only for case-insensitive prefix matching against the ignore-list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub title: String,
}

// A pre-merged busy interval from the free/busy query. Carries no title,
// so soft-hold filtering does not apply to this variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// A bookable slot offered to the UI. Output-only: recomputed on every
// request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

// Response structure for the fixed-grid slot endpoint
#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub configured: bool,
    pub connected: bool,
    pub slots: Vec<FreeSlot>,
}

// Response structure for the rule-based availability endpoint. The
// availability text is an opaque string meant for direct interpolation
// into an email template merge field.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub configured: bool,
    pub connected: bool,
    pub availability: Option<String>,
    pub message: Option<String>,
}
