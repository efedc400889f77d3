use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::client::GoogleCalendarClient;
use crate::models::calendar::{AvailabilityResponse, SlotsResponse};
use crate::models::common::{SlotQueryParams, MAX_QUERY_DAYS};
use crate::models::settings::{AvailabilityPolicy, UserSettings};
use crate::services::availability::{generate_availability, outreach_fetch_range};
use crate::services::free_busy::generate_free_slots;

// AppState struct containing shared resources
pub struct AppState {
    pub calendar: GoogleCalendarClient,
    pub settings: UserSettings,
    pub policy: AvailabilityPolicy,
}

const NOT_CONFIGURED_MESSAGE: &str =
    "Calendar integration is not configured. Set the Google OAuth credentials to enable automatic availability detection.";
const NOT_CONNECTED_MESSAGE: &str =
    "No calendar is connected. Connect your Google account in Settings to enable automatic availability detection.";

// Rule-based availability endpoint: returns the multi-week availability
// text used as an email merge field
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AvailabilityResponse>, StatusCode> {
    info!("Received request for outreach availability");

    if !state.calendar.is_configured() {
        info!("Calendar integration not configured, returning empty availability");
        return Ok(Json(AvailabilityResponse {
            configured: false,
            connected: false,
            availability: None,
            message: Some(NOT_CONFIGURED_MESSAGE.to_string()),
        }));
    }

    if !state.calendar.is_connected() {
        info!("No calendar connected, returning empty availability");
        return Ok(Json(AvailabilityResponse {
            configured: true,
            connected: false,
            availability: None,
            message: Some(NOT_CONNECTED_MESSAGE.to_string()),
        }));
    }

    let now = Utc::now();
    let (time_min, time_max) = outreach_fetch_range(now, &state.policy);

    match state.calendar.list_events(time_min, time_max).await {
        Ok(events) => {
            let availability = generate_availability(now, &events, &state.policy);
            info!(
                "Generated availability text from {} events ({} lines)",
                events.len(),
                availability.lines().count()
            );
            Ok(Json(AvailabilityResponse {
                configured: true,
                connected: true,
                availability: Some(availability),
                message: None,
            }))
        }
        Err(err) => {
            error!("Failed to fetch calendar events: {}", err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Fixed-grid slot endpoint: returns discrete 30-minute bookable slots
// for UI slot-picking
pub async fn get_free_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SlotQueryParams>,
) -> Result<Json<SlotsResponse>, StatusCode> {
    info!("Received request for free slots with days={}", params.days);

    if params.days <= 0 || params.days > MAX_QUERY_DAYS {
        warn!(
            "Rejecting free-slot request with out-of-range days={}",
            params.days
        );
        return Err(StatusCode::BAD_REQUEST);
    }

    if !state.calendar.is_connected() {
        info!("No calendar connected, returning empty slot list");
        return Ok(Json(SlotsResponse {
            configured: state.calendar.is_configured(),
            connected: false,
            slots: Vec::new(),
        }));
    }

    let now = Utc::now();
    let time_max = now + Duration::days(params.days);

    match state.calendar.query_free_busy(now, time_max).await {
        Ok(busy) => {
            let slots = generate_free_slots(now, &busy, &state.settings, params.days as u32);
            info!(
                "Generated {} free slots from {} busy intervals",
                slots.len(),
                busy.len()
            );
            Ok(Json(SlotsResponse {
                configured: true,
                connected: true,
                slots,
            }))
        }
        Err(err) => {
            error!("Failed to query free/busy data: {}", err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
