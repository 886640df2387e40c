//! Unit tests for session configuration resolution.

use super::*;
use rstest::{fixture, rstest};
use uuid::Uuid;

#[derive(Debug)]
struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("spark-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'a'; len])?;
        Ok(Self { path })
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn missing_key_path() -> PathBuf {
    std::env::temp_dir().join(format!("spark-missing-key-{}", Uuid::new_v4()))
}

#[fixture]
fn unset() -> SparkSettings {
    SparkSettings {
        bind_addr: None,
        overpass_endpoint: None,
        nominatim_endpoint: None,
        supabase_url: None,
        supabase_anon_key: None,
        password_reset_redirect: None,
        http_timeout_seconds: None,
        user_agent: None,
        contact: None,
        allowed_origins: None,
        cookie_secure: None,
        same_site: None,
        session_key_file: Some(missing_key_path()),
        allow_ephemeral_session: false,
    }
}

fn release_ready(mut settings: SparkSettings, key_file: &TempKeyFile) -> SparkSettings {
    settings.cookie_secure = Some(true);
    settings.same_site = Some("Strict".to_owned());
    settings.session_key_file = Some(key_file.path.clone());
    settings
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn release_valid_settings_succeed(unset: SparkSettings) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file");
    let settings = session_settings(&release_ready(unset, &key_file), BuildMode::Release)
        .expect("expected valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn release_missing_cookie_secure_is_rejected(unset: SparkSettings) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file");
    let mut settings = release_ready(unset, &key_file);
    settings.cookie_secure = None;

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected missing cookie_secure to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::Missing {
            name: "cookie_secure"
        }
    ));
}

#[rstest]
#[case(None)]
#[case(Some("sideways"))]
fn release_requires_a_valid_same_site(unset: SparkSettings, #[case] value: Option<&str>) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file");
    let mut settings = release_ready(unset, &key_file);
    settings.same_site = value.map(str::to_owned);

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected same_site to be rejected",
    );
    assert!(matches!(
        err,
        SessionConfigError::Missing { name: "same_site" }
            | SessionConfigError::Invalid {
                name: "same_site",
                ..
            }
    ));
}

#[rstest]
fn release_insecure_none_same_site_is_rejected(unset: SparkSettings) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file");
    let mut settings = release_ready(unset, &key_file);
    settings.cookie_secure = Some(false);
    settings.same_site = Some("None".to_owned());

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected insecure SameSite=None to fail",
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_ephemeral_enabled_is_rejected(unset: SparkSettings) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file");
    let mut settings = release_ready(unset, &key_file);
    settings.allow_ephemeral_session = true;

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected ephemeral to be rejected in release",
    );
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_missing_key_file_is_rejected(unset: SparkSettings) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file");
    let mut settings = release_ready(unset, &key_file);
    settings.session_key_file = Some(missing_key_path());

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected missing key file to fail",
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
#[case(BuildMode::Release)]
#[case(BuildMode::Debug)]
fn short_keys_are_rejected(unset: SparkSettings, #[case] mode: BuildMode) {
    let key_file = TempKeyFile::new(32).expect("key file");
    let err = expect_error(
        session_settings(&release_ready(unset, &key_file), mode),
        "expected short key to fail",
    );
    assert!(matches!(err, SessionConfigError::KeyTooShort { length: 32, .. }));
}

#[rstest]
fn debug_defaults_allow_ephemeral_key(unset: SparkSettings) {
    let settings =
        session_settings(&unset, BuildMode::Debug).expect("debug defaults should succeed");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_invalid_same_site_falls_back_to_default(mut unset: SparkSettings) {
    unset.same_site = Some("unexpected".to_owned());
    let settings =
        session_settings(&unset, BuildMode::Debug).expect("debug should fall back to defaults");
    assert_eq!(settings.same_site, SameSite::Lax);
}
