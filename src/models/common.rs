use serde::Deserialize;

// Largest scan window a caller may request, in days
pub const MAX_QUERY_DAYS: i64 = 365;

// Query parameters for the free-slot endpoint
#[derive(Debug, Deserialize)]
pub struct SlotQueryParams {
    #[serde(default = "default_days")]
    pub days: i64,
}

pub fn default_days() -> i64 {
    7
}
