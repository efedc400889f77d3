//! Outreach Availability Service
//!
//! This library computes free meeting slots from a user's calendar for
//! cold-outreach scheduling. Two generators share one arithmetic core:
//!
//! - `services::availability`: the rule-based multi-week generator that
//!   renders buffered, variable-length windows as an email-ready string
//! - `services::free_busy`: the fixed-grid generator that produces
//!   discrete 30-minute bookable slots for UI slot-picking
//!
//! # Modules
//!
//! - `client`: GoogleCalendarClient for calendar read operations
//! - `services::schedule`: shared rounding, working-window, and slot
//!   strategy primitives
//! - `handlers` / `routes`: the HTTP boundary

pub mod client;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


// Re-export the main types for ease of use
pub use client::GoogleCalendarClient;
pub use handlers::api::AppState;
pub use routes::create_router;
