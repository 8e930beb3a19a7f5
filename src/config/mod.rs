// Configuration layer - environment-driven settings and logging
pub mod logging;

pub use logging::{init_logging, LoggingConfig, LoggingError};

use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),
}

/// Bootstrap administrator credentials, seeded on first boot
#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
}

/// Process-level settings loaded once at startup
///
/// Secrets are required; everything else has a development default.
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub session_secret: String,
    pub password_pepper: String,
    pub admin: AdminBootstrap,
}

impl Settings {
    /// Load settings from environment variables
    ///
    /// # Errors
    /// Returns `SettingsError::Missing` when `SESSION_SECRET` or
    /// `PASSWORD_PEPPER` is unset.
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://rbac.db?mode=rwc".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| SettingsError::Missing("SESSION_SECRET"))?;
        let password_pepper =
            env::var("PASSWORD_PEPPER").map_err(|_| SettingsError::Missing("PASSWORD_PEPPER"))?;

        let admin = AdminBootstrap {
            username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
            email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
        };

        Ok(Self {
            database_url,
            bind_addr,
            session_secret,
            password_pepper,
            admin,
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("bind_addr", &self.bind_addr)
            .field("session_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            session_secret: "super-secret-session".to_string(),
            password_pepper: "super-secret-pepper".to_string(),
            admin: AdminBootstrap {
                username: "admin".to_string(),
                password: "admin123".to_string(),
                name: "Administrator".to_string(),
                email: "admin@example.com".to_string(),
            },
        };

        let debug = format!("{:?} {:?}", settings, settings.admin);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("admin123"));
        assert!(debug.contains("<redacted>"));
    }
}
