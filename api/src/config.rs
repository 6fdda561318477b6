use anyhow::{bail, Context, Result};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./recipes.db?mode=rwc";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Runtime settings read from the environment (and `.env` via dotenv)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub environment: String,
    pub auth: AuthSettings,
    pub max_page_size: u32,
}

/// Bearer-token validation settings shared with the auth extractor
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: Option<String>,
    pub disabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let port = match env::var("PORT") {
            Ok(v) => v
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", v))?,
            Err(_) => DEFAULT_PORT,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let disabled = env::var("AUTH_DISABLED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let jwt_secret = env::var("API_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        if jwt_secret.is_none() && !disabled {
            bail!("API_JWT_SECRET must be set (or AUTH_DISABLED=true for local development)");
        }

        let max_page_size = match env::var("MAX_PAGE_SIZE") {
            Ok(v) => v
                .parse::<u32>()
                .with_context(|| format!("Invalid MAX_PAGE_SIZE value: {}", v))?,
            Err(_) => DEFAULT_MAX_PAGE_SIZE,
        };
        if max_page_size == 0 {
            bail!("MAX_PAGE_SIZE must be greater than zero");
        }

        Ok(Self {
            database_url,
            port,
            environment,
            auth: AuthSettings {
                jwt_secret,
                disabled,
            },
            max_page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DATABASE_URL",
        "PORT",
        "ENVIRONMENT",
        "AUTH_DISABLED",
        "API_JWT_SECRET",
        "MAX_PAGE_SIZE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_with_secret() {
        clear_env();
        env::set_var("API_JWT_SECRET", "s3cret");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("s3cret"));
        assert!(!config.auth.disabled);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_secret_is_rejected() {
        clear_env();
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("API_JWT_SECRET"));
    }

    #[test]
    #[serial]
    fn test_auth_disabled_allows_missing_secret() {
        clear_env();
        env::set_var("AUTH_DISABLED", "true");
        let config = AppConfig::from_env().unwrap();
        assert!(config.auth.disabled);
        assert!(config.auth.jwt_secret.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("API_JWT_SECRET", "x");
        env::set_var("PORT", "9090");
        env::set_var("MAX_PAGE_SIZE", "25");
        env::set_var("DATABASE_URL", "sqlite::memory:");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.max_page_size, 25);
        assert_eq!(config.database_url, "sqlite::memory:");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_numbers_are_rejected() {
        clear_env();
        env::set_var("API_JWT_SECRET", "x");
        env::set_var("PORT", "eighty");
        assert!(AppConfig::from_env().is_err());

        env::remove_var("PORT");
        env::set_var("MAX_PAGE_SIZE", "0");
        assert!(AppConfig::from_env().is_err());
        clear_env();
    }
}
