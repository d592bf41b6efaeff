use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Static public key every client sends as `Authorization: Bearer <key>`.
    pub api_key: String,
    /// Path prefix all routes are nested under, e.g. `/make-server`.
    pub api_prefix: String,
    /// Days of availability generated per catalog service.
    pub catalog_days: u32,
    pub cors_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "trailbook.db".to_string()),
            api_key: env::var("API_KEY").unwrap_or_else(|_| "changeme".to_string()),
            api_prefix: normalize_prefix(
                &env::var("API_PREFIX").unwrap_or_else(|_| "/make-server".to_string()),
            ),
            catalog_days: parse_catalog_days(env::var("CATALOG_DAYS").ok().as_deref()),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
        }
    }
}

const DEFAULT_CATALOG_DAYS: u32 = 90;
const MAX_CATALOG_DAYS: u32 = 730;

/// Unset or unparsable falls back to the default; anything else is clamped to 1..=730.
pub fn parse_catalog_days(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_CATALOG_DAYS)
        .clamp(1, MAX_CATALOG_DAYS)
}

/// Leading slash, no trailing slash; an empty or "/" prefix means routes live at the root.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
