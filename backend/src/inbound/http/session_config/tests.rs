//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug)]
struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len])?;
        Ok(Self { path })
    }

    fn path_str(&self) -> &str {
        self.path
            .to_str()
            .expect("temporary path should be valid UTF-8")
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: HashMap<String, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_vars(key_path: &str) -> HashMap<String, String> {
    HashMap::from([
        (KEY_FILE_ENV.to_string(), key_path.to_string()),
        (COOKIE_SECURE_ENV.to_string(), "1".to_string()),
        (SAMESITE_ENV.to_string(), "Strict".to_string()),
        (ALLOW_EPHEMERAL_ENV.to_string(), "0".to_string()),
    ])
}

fn release_error(vars: HashMap<String, String>) -> SessionConfigError {
    let env = mock_env(vars);
    match session_settings_from_env(&env, BuildMode::Release) {
        Ok(_) => panic!("release settings unexpectedly accepted"),
        Err(error) => error,
    }
}

#[rstest]
#[case::cookie_secure(COOKIE_SECURE_ENV)]
#[case::same_site(SAMESITE_ENV)]
#[case::allow_ephemeral(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggle(#[case] name: &'static str) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed");
    let mut vars = release_vars(key_file.path_str());
    vars.remove(name);

    let err = release_error(vars);
    assert!(matches!(err, SessionConfigError::MissingEnv { name: got } if got == name));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_invalid_cookie_secure(#[case] value: &str) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed");
    let mut vars = release_vars(key_file.path_str());
    vars.insert(COOKIE_SECURE_ENV.to_string(), value.to_string());

    let err = release_error(vars);
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed");
    let mut vars = release_vars(key_file.path_str());
    vars.insert(ALLOW_EPHEMERAL_ENV.to_string(), "1".to_string());

    let err = release_error(vars);
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_unreadable_key_file() {
    let mut vars = release_vars("/nonexistent/session_key");
    vars.remove(KEY_FILE_ENV);
    vars.insert(
        KEY_FILE_ENV.to_string(),
        "/nonexistent/session_key".to_string(),
    );

    let err = release_error(vars);
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_short_key() {
    let key_file = TempKeyFile::new(32).expect("key file creation should succeed");

    let err = release_error(release_vars(key_file.path_str()));
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 32, .. }
    ));
}

#[rstest]
fn release_rejects_same_site_none_on_insecure_cookie() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed");
    let mut vars = release_vars(key_file.path_str());
    vars.insert(COOKIE_SECURE_ENV.to_string(), "0".to_string());
    vars.insert(SAMESITE_ENV.to_string(), "None".to_string());

    let err = release_error(vars);
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_accepts_explicit_valid_settings() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed");
    let env = mock_env(release_vars(key_file.path_str()));

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("expected valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn release_accepts_same_site_none_when_secure() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed");
    let mut vars = release_vars(key_file.path_str());
    vars.insert(SAMESITE_ENV.to_string(), "None".to_string());
    let env = mock_env(vars);

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("expected valid settings");
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn debug_defaults_to_lax_with_ephemeral_key() {
    let env = mock_env(HashMap::new());
    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults should succeed");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_invalid_same_site_falls_back_to_default() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed");
    let mut vars = release_vars(key_file.path_str());
    vars.insert(SAMESITE_ENV.to_string(), "unexpected".to_string());
    let env = mock_env(vars);

    let settings = session_settings_from_env(&env, BuildMode::Debug)
        .expect("debug should fall back to defaults");
    assert_eq!(settings.same_site, SameSite::Lax);
}
