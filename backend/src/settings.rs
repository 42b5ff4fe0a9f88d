//! Application settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Top-level settings controlling the listener, database, and link minting.
///
/// Values come from CLI flags, `TRIPTRACK_*` environment variables, or a
/// configuration file, in that order of precedence.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRIPTRACK")]
pub struct AppSettings {
    /// PostgreSQL connection string; fixture data is served when unset.
    pub database_url: Option<String>,
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Externally reachable base URL used when minting tour QR links.
    pub public_base_url: Option<String>,
}

impl AppSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the configured public base URL, falling back to the default.
    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for application settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("TRIPTRACK_DATABASE_URL", None::<String>),
            ("TRIPTRACK_BIND_ADDR", None::<String>),
            ("TRIPTRACK_PUBLIC_BASE_URL", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.database_url.is_none());
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.public_base_url(), DEFAULT_PUBLIC_BASE_URL);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "TRIPTRACK_DATABASE_URL",
                Some("postgres://localhost/triptrack".to_owned()),
            ),
            ("TRIPTRACK_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "TRIPTRACK_PUBLIC_BASE_URL",
                Some("https://tours.example.edu".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/triptrack")
        );
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090");
        assert_eq!(settings.public_base_url(), "https://tours.example.edu");
    }
}
