use std::env;

use chrono_tz::Tz;
use tracing::warn;

use crate::temporal::{LocalFrame, DEFAULT_TIMEZONE};

pub const DEFAULT_PROJECT_ID: &str = "waq8cp43";
pub const DEFAULT_DATASET: &str = "production";
pub const DEFAULT_API_VERSION: &str = "2025-02-15";

/// Connection settings for the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_cdn: false,
        }
    }
}

impl SanityConfig {
    /// Query endpoint for the configured project and dataset.
    pub fn query_url(&self) -> String {
        let host = if self.use_cdn { "apicdn.sanity.io" } else { "api.sanity.io" };
        let version = self.api_version.trim_start_matches('v');
        format!("https://{}.{}/v{}/data/query/{}", self.project_id, host, version, self.dataset)
    }
}

/// Everything the handler needs from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub sanity: SanityConfig,
    pub frame: LocalFrame,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = SanityConfig::default();
        let sanity = SanityConfig {
            project_id: get("SANITY_PROJECT_ID").unwrap_or(defaults.project_id),
            dataset: get("SANITY_DATASET").unwrap_or(defaults.dataset),
            api_version: get("SANITY_API_VERSION").unwrap_or(defaults.api_version),
            use_cdn: get("SANITY_USE_CDN").map(|v| v.eq_ignore_ascii_case("true") || v == "1").unwrap_or(false),
        };
        let frame = LocalFrame::new(timezone_from(get("SCHEDULE_TIMEZONE").as_deref()));
        Self { sanity, frame }
    }
}

/// Resolve an IANA zone name, falling back to the club default.
pub fn timezone_from(name: Option<&str>) -> Tz {
    match name {
        None => DEFAULT_TIMEZONE,
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => tz,
            Err(e) => {
                warn!(timezone = %name, error = %e, "Unknown SCHEDULE_TIMEZONE, using default");
                DEFAULT_TIMEZONE
            }
        },
    }
}
