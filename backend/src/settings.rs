//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SPARK_*` environment variables and config
//! files. Optional values fall back to the defaults below through accessors
//! so the raw struct stays a faithful picture of what was configured.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::HttpIdentity;
use crate::outbound::supabase::SupabaseConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Errors raised while interpreting configured values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid URL for {field}='{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("http_timeout_seconds must be positive")]
    ZeroTimeout,
}

/// Configuration for the `spark-backend` server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SPARK")]
pub struct SparkSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Overpass interpreter URL.
    pub overpass_endpoint: Option<String>,
    /// Nominatim base URL; `/search` and `/reverse` are appended.
    pub nominatim_endpoint: Option<String>,
    /// Supabase project URL. Fixture adapters are used when unset.
    pub supabase_url: Option<String>,
    /// Supabase anon key sent as `apikey`.
    pub supabase_anon_key: Option<String>,
    /// Link embedded in password-reset emails.
    pub password_reset_redirect: Option<String>,
    /// Timeout for every outbound request.
    pub http_timeout_seconds: Option<u64>,
    /// `User-Agent` sent to the public map services.
    pub user_agent: Option<String>,
    /// `Contact` header sent to the public map services.
    pub contact: Option<String>,
    /// Browser origins allowed to open `/ws`; comma-separated in the
    /// environment.
    pub allowed_origins: Option<Vec<String>>,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: Option<bool>,
    /// `SameSite` policy for the session cookie: `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is missing.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session: bool,
}

impl SparkSettings {
    /// Parsed listen address, falling back to [`DEFAULT_BIND_ADDR`].
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] for malformed input.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .trim()
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// # Errors
    /// Returns [`SettingsError::InvalidUrl`] for malformed input.
    pub fn overpass_endpoint(&self) -> Result<Url, SettingsError> {
        parse_url(
            "overpass_endpoint",
            self.overpass_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_OVERPASS_ENDPOINT),
        )
    }

    /// # Errors
    /// Returns [`SettingsError::InvalidUrl`] for malformed input.
    pub fn nominatim_endpoint(&self) -> Result<Url, SettingsError> {
        parse_url(
            "nominatim_endpoint",
            self.nominatim_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_NOMINATIM_ENDPOINT),
        )
    }

    /// # Errors
    /// Returns [`SettingsError::ZeroTimeout`] when configured as zero.
    pub fn http_timeout(&self) -> Result<Duration, SettingsError> {
        match self.http_timeout_seconds {
            Some(0) => Err(SettingsError::ZeroTimeout),
            Some(seconds) => Ok(Duration::from_secs(seconds)),
            None => Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS)),
        }
    }

    pub fn identity(&self) -> HttpIdentity {
        let defaults = HttpIdentity::default();
        HttpIdentity {
            user_agent: non_blank(self.user_agent.as_deref()).unwrap_or(defaults.user_agent),
            contact: non_blank(self.contact.as_deref()).unwrap_or(defaults.contact),
        }
    }

    /// Supabase project settings, or `None` unless both URL and key are set.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidUrl`] for a malformed project URL.
    pub fn supabase(&self) -> Result<Option<SupabaseConfig>, SettingsError> {
        let (Some(url), Some(anon_key)) = (
            non_blank(self.supabase_url.as_deref()),
            non_blank(self.supabase_anon_key.as_deref()),
        ) else {
            return Ok(None);
        };
        Ok(Some(SupabaseConfig {
            url: parse_url("supabase_url", &url)?,
            anon_key,
            timeout: self.http_timeout()?,
        }))
    }

    pub fn password_reset_redirect(&self) -> Option<String> {
        non_blank(self.password_reset_redirect.as_deref())
    }

    /// Configured origins, trimmed with blanks dropped.
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.allowed_origins
            .iter()
            .flatten()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value.trim()).map_err(|source| SettingsError::InvalidUrl {
        field,
        value: value.to_owned(),
        source,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 14] = [
        "SPARK_BIND_ADDR",
        "SPARK_OVERPASS_ENDPOINT",
        "SPARK_NOMINATIM_ENDPOINT",
        "SPARK_SUPABASE_URL",
        "SPARK_SUPABASE_ANON_KEY",
        "SPARK_PASSWORD_RESET_REDIRECT",
        "SPARK_HTTP_TIMEOUT_SECONDS",
        "SPARK_USER_AGENT",
        "SPARK_CONTACT",
        "SPARK_ALLOWED_ORIGINS",
        "SPARK_COOKIE_SECURE",
        "SPARK_SAME_SITE",
        "SPARK_SESSION_KEY_FILE",
        "SPARK_ALLOW_EPHEMERAL_SESSION",
    ];

    fn cleared_env(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> SparkSettings {
        SparkSettings::load_from_iter([OsString::from("spark-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_configured() {
        let _guard = lock_env(cleared_env(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("default addr")
        );
        assert_eq!(
            settings.overpass_endpoint().expect("overpass").as_str(),
            DEFAULT_OVERPASS_ENDPOINT
        );
        assert_eq!(
            settings.http_timeout().expect("timeout"),
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS)
        );
        assert_eq!(settings.identity(), HttpIdentity::default());
        assert!(settings.supabase().expect("supabase").is_none());
        assert!(settings.allowed_origins().is_empty());
        assert!(!settings.allow_ephemeral_session);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_env(&[
            ("SPARK_BIND_ADDR", "127.0.0.1:9000"),
            ("SPARK_SUPABASE_URL", "https://abcd.supabase.co"),
            ("SPARK_SUPABASE_ANON_KEY", "anon-key"),
            ("SPARK_HTTP_TIMEOUT_SECONDS", "5"),
            ("SPARK_ALLOWED_ORIGINS", "https://spark.example,https://m.spark.example"),
            ("SPARK_USER_AGENT", "spark-test/1.0"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        let supabase = settings.supabase().expect("supabase").expect("configured");
        assert_eq!(supabase.url.as_str(), "https://abcd.supabase.co/");
        assert_eq!(supabase.timeout, Duration::from_secs(5));
        assert_eq!(
            settings.allowed_origins(),
            vec!["https://spark.example", "https://m.spark.example"]
        );
        assert_eq!(settings.identity().user_agent, "spark-test/1.0");
    }

    #[rstest]
    #[case("SPARK_BIND_ADDR", "not-an-addr")]
    #[case("SPARK_OVERPASS_ENDPOINT", "overpass")]
    #[case("SPARK_HTTP_TIMEOUT_SECONDS", "0")]
    fn invalid_values_surface_as_errors(#[case] name: &str, #[case] value: &str) {
        let _guard = lock_env(cleared_env(&[(name, value)]));

        let settings = load_from_empty_args();
        let failed = settings.bind_addr().is_err()
            || settings.overpass_endpoint().is_err()
            || settings.http_timeout().is_err();
        assert!(failed, "{name}={value} should be rejected");
    }

    #[rstest]
    fn blank_origins_are_dropped() {
        let _guard = lock_env(cleared_env(&[]));

        let mut settings = load_from_empty_args();
        settings.allowed_origins = Some(vec![
            " https://spark.example ".to_owned(),
            " ".to_owned(),
            "https://m.spark.example".to_owned(),
        ]);
        assert_eq!(
            settings.allowed_origins(),
            vec!["https://spark.example", "https://m.spark.example"]
        );
    }

    #[rstest]
    fn supabase_requires_both_url_and_key() {
        let _guard = lock_env(cleared_env(&[("SPARK_SUPABASE_URL", "https://abcd.supabase.co")]));

        let settings = load_from_empty_args();
        assert!(settings.supabase().expect("supabase").is_none());
    }
}
