use chrono_tz::Tz;
use std::env;
use tracing::warn;

// Documented defaults for user-level scheduling configuration
pub const DEFAULT_WORK_START_HOUR: u32 = 10;
pub const DEFAULT_WORK_END_HOUR: u32 = 17;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

// Event-title prefixes treated as soft holds (non-blocking) by the
// rule-based generator
pub const DEFAULT_IGNORED_PREFIXES: &[&str] = &["bepp", "hold", "tentative"];

/// User-configured working hours and timezone for the fixed-grid slot
/// generator. Immutable for the duration of a computation.
#[derive(Debug, Clone)]
pub struct UserSettings {
    pub working_hours_start: u32,
    pub working_hours_end: u32,
    pub timezone: Tz,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            working_hours_start: DEFAULT_WORK_START_HOUR,
            working_hours_end: DEFAULT_WORK_END_HOUR,
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl UserSettings {
    /// Load settings from environment variables, falling back to the
    /// documented defaults on missing or unparseable values
    pub fn from_env() -> Self {
        Self {
            working_hours_start: parse_hour_env("WORKING_HOURS_START", DEFAULT_WORK_START_HOUR),
            working_hours_end: parse_hour_env("WORKING_HOURS_END", DEFAULT_WORK_END_HOUR),
            timezone: parse_timezone_env("TIMEZONE"),
        }
    }
}

/// Working window and ignore-list for the rule-based availability
/// generator, as explicit configuration with documented defaults.
#[derive(Debug, Clone)]
pub struct AvailabilityPolicy {
    pub start_hour: u32,
    pub end_hour: u32,
    pub timezone: Tz,
    pub ignored_prefixes: Vec<String>,
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_WORK_START_HOUR,
            end_hour: DEFAULT_WORK_END_HOUR,
            timezone: DEFAULT_TIMEZONE,
            ignored_prefixes: DEFAULT_IGNORED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl AvailabilityPolicy {
    /// Build the policy from the user settings plus the optional
    /// AVAILABILITY_IGNORE_PREFIXES override (comma-separated)
    pub fn from_env(settings: &UserSettings) -> Self {
        let ignored_prefixes = match env::var("AVAILABILITY_IGNORE_PREFIXES") {
            Ok(list) => list
                .split(',')
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            Err(_) => DEFAULT_IGNORED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        };

        Self {
            start_hour: settings.working_hours_start,
            end_hour: settings.working_hours_end,
            timezone: settings.timezone,
            ignored_prefixes,
        }
    }
}

fn parse_hour_env(name: &str, default: u32) -> u32 {
    match env::var(name) {
        Ok(value) => match value.parse::<u32>() {
            Ok(hour) if hour < 24 => hour,
            _ => {
                warn!("Invalid {} value '{}', using default {}", name, value, default);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_timezone_env(name: &str) -> Tz {
    match env::var(name) {
        Ok(value) => match value.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "Unknown {} value '{}', using default {}",
                    name, value, DEFAULT_TIMEZONE
                );
                DEFAULT_TIMEZONE
            }
        },
        Err(_) => DEFAULT_TIMEZONE,
    }
}
