use std::fmt;
use std::time::Duration;

/// Runtime configuration, read from the environment (`.env` supported).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub identity_url: String,
    pub identity_api_key: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub cookie_secure: bool,
    pub app_name: String,
    pub superuser_role: String,
    pub profile_ttl: Duration,
    pub http_timeout: Duration,
    pub notice_dismiss_ms: u64,
    pub report_chart_limit: usize,
    pub suppressed_log_patterns: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has an invalid value: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let number = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
                None => Ok(default),
            }
        };

        Ok(AppConfig {
            backend_url: required("BACKEND_URL")?,
            identity_url: get("IDENTITY_URL")
                .unwrap_or_else(|| "https://identitytoolkit.googleapis.com".to_string()),
            identity_api_key: required("IDENTITY_API_KEY")?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            session_key: get("SESSION_KEY"),
            cookie_secure: matches!(get("COOKIE_SECURE").as_deref(), Some("true" | "1" | "yes")),
            app_name: get("APP_NAME").unwrap_or_else(|| "Volunteer Admin".to_string()),
            superuser_role: get("SUPERUSER_ROLE").unwrap_or_else(|| "admin".to_string()),
            profile_ttl: Duration::from_secs(number("PROFILE_TTL_SECS", 300)?),
            http_timeout: Duration::from_secs(number("HTTP_TIMEOUT_SECS", 15)?),
            notice_dismiss_ms: number("NOTICE_DISMISS_MS", 4000)?,
            report_chart_limit: number("REPORT_CHART_LIMIT", 10)? as usize,
            suppressed_log_patterns: get("SUPPRESSED_LOG_PATTERNS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("BACKEND_URL", "http://api.local"),
            ("IDENTITY_API_KEY", "k"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.superuser_role, "admin");
        assert_eq!(cfg.profile_ttl, Duration::from_secs(300));
        assert_eq!(cfg.notice_dismiss_ms, 4000);
        assert_eq!(cfg.report_chart_limit, 10);
        assert!(!cfg.cookie_secure);
        assert!(cfg.session_key.is_none());
        assert!(cfg.suppressed_log_patterns.is_empty());
    }

    #[test]
    fn missing_backend_url_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("IDENTITY_API_KEY", "k"), ("BACKEND_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("BACKEND_URL"));
    }

    #[test]
    fn bad_numbers_are_reported_with_their_key() {
        let err = AppConfig::from_lookup(lookup(&[
            ("BACKEND_URL", "http://api.local"),
            ("IDENTITY_API_KEY", "k"),
            ("PROFILE_TTL_SECS", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid { key: "PROFILE_TTL_SECS", value: "soon".into() });
    }

    #[test]
    fn suppression_patterns_are_split_and_trimmed() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("BACKEND_URL", "http://api.local"),
            ("IDENTITY_API_KEY", "k"),
            ("SUPPRESSED_LOG_PATTERNS", "deprecated header, ,legacy cookie"),
            ("COOKIE_SECURE", "true"),
        ]))
        .unwrap();
        assert_eq!(cfg.suppressed_log_patterns, vec!["deprecated header", "legacy cookie"]);
        assert!(cfg.cookie_secure);
    }
}
