//! Session cookie settings resolved from [`SparkSettings`].
//!
//! Debug builds tolerate missing toggles and fall back to a generated key with
//! a warning. Release builds require an explicit `cookie_secure` and
//! `same_site` and a key file of at least [`SESSION_KEY_MIN_LEN`] bytes.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::SparkSettings;

pub const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use spark_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Resolved cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("same_site=None requires cookie_secure")]
    InsecureSameSiteNone,
    #[error("allow_ephemeral_session must be disabled in release builds")]
    EphemeralNotAllowed,
}

/// Resolve session settings for the given build mode.
///
/// # Errors
/// Returns [`SessionConfigError`] when a release build is missing a toggle,
/// carries an invalid value, or cannot read a long enough key.
pub fn session_settings(
    settings: &SparkSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = cookie_secure(settings, mode)?;
    let same_site = same_site(settings, mode, cookie_secure)?;
    if settings.allow_ephemeral_session && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(settings, mode)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn cookie_secure(settings: &SparkSettings, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match settings.cookie_secure {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!("cookie_secure not set; defaulting to secure");
            Ok(true)
        }
        None => Err(SessionConfigError::Missing {
            name: "cookie_secure",
        }),
    }
}

fn same_site(
    settings: &SparkSettings,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let Some(value) = settings.same_site.as_deref() else {
        if mode.is_debug() {
            return Ok(default_same_site);
        }
        return Err(SessionConfigError::Missing { name: "same_site" });
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("same_site=None without cookie_secure; browsers may reject the cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid same_site, using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::Invalid {
            name: "same_site",
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn session_key(settings: &SparkSettings, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let path = settings.session_key_file();
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || settings.allow_ephemeral_session => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

#[cfg(test)]
mod tests;
