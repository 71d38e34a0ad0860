//! Engine configuration read from the environment.

use chrono::Duration;

use jojo_domain::SpecialArmorPolicy;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite:jojo.db?mode=rwc";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub session_ttl: Duration,
    pub special_armor_policy: SpecialArmorPolicy,
    /// `*` or a comma-separated origin list. `None` disables CORS.
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_port = match var("SERVER_PORT").or_else(|| var("PORT")) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid server port, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let session_ttl_hours = match var("SESSION_TTL_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) => hours,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "Invalid SESSION_TTL_HOURS, using {}",
                        DEFAULT_SESSION_TTL_HOURS
                    );
                    DEFAULT_SESSION_TTL_HOURS
                }
            },
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        let special_armor_policy = match var("SPECIAL_ARMOR_POLICY") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid SPECIAL_ARMOR_POLICY, using overwrite");
                SpecialArmorPolicy::default()
            }),
            None => SpecialArmorPolicy::default(),
        };

        Self {
            server_host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            server_port,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            session_ttl: Duration::hours(session_ttl_hours),
            special_armor_policy,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
