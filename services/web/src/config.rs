//! Service configuration
//!
//! Defaults are layered under `VSAFE_`-prefixed environment variables, e.g.
//! `VSAFE_BIND_ADDRESS=127.0.0.1:9000` or `VSAFE_SECURE_COOKIES=true`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Web service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub bind_address: String,
    /// Directory holding uploaded files; pictures go to `profile_pics/` below it
    pub media_root: PathBuf,
    /// Session lifetime in seconds (default: two weeks)
    pub session_ttl_seconds: i64,
    /// Whether the session cookie carries the `Secure` attribute
    pub secure_cookies: bool,
    /// Largest accepted registration body in bytes
    pub max_upload_bytes: usize,
}

/// Longest accepted session lifetime: ten years
pub const MAX_SESSION_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

impl AppConfig {
    /// Load configuration from defaults and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .set_default("bind_address", "0.0.0.0:8000")?
            .set_default("media_root", "media")?
            .set_default("session_ttl_seconds", 1_209_600_i64)?
            .set_default("secure_cookies", false)?
            .set_default("max_upload_bytes", 5_i64 * 1024 * 1024)?
            .add_source(Environment::with_prefix("VSAFE").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SESSION_TTL_SECONDS).contains(&self.session_ttl_seconds) {
            return Err(ConfigError::Message(format!(
                "session_ttl_seconds must be between 1 and {}, got {}",
                MAX_SESSION_TTL_SECONDS, self.session_ttl_seconds
            )));
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Message(
                "max_upload_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.media_root, PathBuf::from("media"));
        assert_eq!(config.session_ttl_seconds, 1_209_600);
        assert!(!config.secure_cookies);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        unsafe {
            std::env::set_var("VSAFE_BIND_ADDRESS", "127.0.0.1:9000");
            std::env::set_var("VSAFE_SECURE_COOKIES", "true");
            std::env::set_var("VSAFE_SESSION_TTL_SECONDS", "60");
        }

        let config = AppConfig::load().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert!(config.secure_cookies);
        assert_eq!(config.session_ttl_seconds, 60);

        unsafe {
            std::env::remove_var("VSAFE_BIND_ADDRESS");
            std::env::remove_var("VSAFE_SECURE_COOKIES");
            std::env::remove_var("VSAFE_SESSION_TTL_SECONDS");
        }
    }

    #[test]
    #[serial]
    fn test_session_ttl_out_of_range_is_rejected() {
        let too_large = (MAX_SESSION_TTL_SECONDS + 1).to_string();

        for ttl in ["0", "-60", too_large.as_str(), "9223372036854775807"] {
            unsafe {
                std::env::set_var("VSAFE_SESSION_TTL_SECONDS", ttl);
            }

            let result = AppConfig::load();
            assert!(
                matches!(result, Err(ConfigError::Message(_))),
                "ttl {} must be rejected",
                ttl
            );
        }

        unsafe {
            std::env::set_var("VSAFE_SESSION_TTL_SECONDS", MAX_SESSION_TTL_SECONDS.to_string());
        }
        assert_eq!(
            AppConfig::load().unwrap().session_ttl_seconds,
            MAX_SESSION_TTL_SECONDS
        );

        unsafe {
            std::env::remove_var("VSAFE_SESSION_TTL_SECONDS");
        }
    }

    #[test]
    #[serial]
    fn test_zero_upload_limit_is_rejected() {
        unsafe {
            std::env::set_var("VSAFE_MAX_UPLOAD_BYTES", "0");
        }

        assert!(matches!(AppConfig::load(), Err(ConfigError::Message(_))));

        unsafe {
            std::env::remove_var("VSAFE_MAX_UPLOAD_BYTES");
        }
    }
}
