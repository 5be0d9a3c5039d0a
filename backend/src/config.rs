//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from `ATOMFIT_*` environment variables, configuration files
//! and command-line overrides, in the usual OrthoConfig precedence. Every
//! field is optional; accessors apply the defaults.

use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::PageLimits;
use serde::Deserialize;

use crate::domain::{DEFAULT_INVITATION_TTL_HOURS, PASSWORD_MIN, ValidationPolicy};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_ACTIVATION_BASE_URL: &str = "http://localhost:8080/activate";

/// Errors raised when settings are present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured.
    #[error("database URL is not configured; set ATOMFIT_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    /// Page size settings contradict each other.
    #[error("page limits are invalid: {message}")]
    InvalidPageLimits { message: String },
    /// A numeric setting is outside its accepted range.
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Application settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ATOMFIT")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Deadline for each store operation, in milliseconds.
    pub query_timeout_ms: Option<u64>,
    /// Invitation lifetime in hours.
    pub invitation_ttl_hours: Option<i64>,
    /// Base of the activation link sent with invitations.
    pub activation_base_url: Option<String>,
    /// Page size used when a caller omits `limit`.
    pub page_default_limit: Option<u32>,
    /// Largest accepted page size.
    pub page_max_limit: Option<u32>,
    /// Minimum password length for new accounts.
    pub password_min: Option<usize>,
    /// `json` for structured logs; anything else is human-readable.
    pub log_format: Option<String>,
}

impl AppSettings {
    /// Configured database URL, falling back to `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when neither is set.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Pool configuration derived from these settings.
    ///
    /// # Errors
    ///
    /// Fails when the database URL is missing or a size is zero.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let max_size = positive(
            self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE),
            "pool_max_size",
        )?;
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(max_size)
            .with_min_idle(Some(max_size.min(2)))
            .with_query_timeout(self.query_timeout()?))
    }

    /// Deadline applied to each store operation.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotPositive`] for a zero timeout.
    pub fn query_timeout(&self) -> Result<Duration, SettingsError> {
        let millis = positive(
            self.query_timeout_ms.unwrap_or(DEFAULT_QUERY_TIMEOUT_MS),
            "query_timeout_ms",
        )?;
        Ok(Duration::from_millis(millis))
    }

    /// Invitation lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotPositive`] for a zero or negative TTL.
    pub fn invitation_ttl(&self) -> Result<chrono::TimeDelta, SettingsError> {
        let hours = self
            .invitation_ttl_hours
            .unwrap_or(DEFAULT_INVITATION_TTL_HOURS);
        if hours <= 0 {
            return Err(SettingsError::NotPositive {
                field: "invitation_ttl_hours",
            });
        }
        chrono::TimeDelta::try_hours(hours).ok_or(SettingsError::NotPositive {
            field: "invitation_ttl_hours",
        })
    }

    /// Base of the activation link.
    pub fn activation_base_url(&self) -> &str {
        self.activation_base_url
            .as_deref()
            .unwrap_or(DEFAULT_ACTIVATION_BASE_URL)
    }

    /// Validation policy handed to the request validator.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidPageLimits`] when the default page
    /// size is zero or above the maximum.
    pub fn validation_policy(&self) -> Result<ValidationPolicy, SettingsError> {
        let defaults = PageLimits::default();
        let page_limits = PageLimits::new(
            self.page_default_limit
                .unwrap_or_else(|| defaults.default_limit()),
            self.page_max_limit.unwrap_or_else(|| defaults.max_limit()),
        )
        .map_err(|err| SettingsError::InvalidPageLimits {
            message: err.to_string(),
        })?;
        Ok(ValidationPolicy {
            page_limits,
            password_min: self.password_min.unwrap_or(PASSWORD_MIN),
            ..ValidationPolicy::default()
        })
    }

    /// Requested log format.
    pub fn log_format(&self) -> LogFormat {
        match self.log_format.as_deref().map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

fn positive<T>(value: T, field: &'static str) -> Result<T, SettingsError>
where
    T: PartialOrd + Default,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(SettingsError::NotPositive { field })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 10] = [
        "ATOMFIT_DATABASE_URL",
        "ATOMFIT_POOL_MAX_SIZE",
        "ATOMFIT_QUERY_TIMEOUT_MS",
        "ATOMFIT_INVITATION_TTL_HOURS",
        "ATOMFIT_ACTIVATION_BASE_URL",
        "ATOMFIT_PAGE_DEFAULT_LIMIT",
        "ATOMFIT_PAGE_MAX_LIMIT",
        "ATOMFIT_PASSWORD_MIN",
        "ATOMFIT_LOG_FORMAT",
        "DATABASE_URL",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
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

    fn blank() -> AppSettings {
        AppSettings {
            database_url: None,
            pool_max_size: None,
            query_timeout_ms: None,
            invitation_ttl_hours: None,
            activation_base_url: None,
            page_default_limit: None,
            page_max_limit: None,
            password_min: None,
            log_format: None,
        }
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("atomfit")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
        assert_eq!(settings.query_timeout(), Ok(Duration::from_millis(5_000)));
        assert_eq!(
            settings.invitation_ttl(),
            Ok(chrono::TimeDelta::hours(DEFAULT_INVITATION_TTL_HOURS))
        );
        assert_eq!(settings.activation_base_url(), DEFAULT_ACTIVATION_BASE_URL);
        assert_eq!(settings.log_format(), LogFormat::Pretty);
        assert_eq!(
            settings.validation_policy().expect("default policy"),
            ValidationPolicy::default()
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("ATOMFIT_DATABASE_URL", "postgres://db/atomfit"),
            ("ATOMFIT_QUERY_TIMEOUT_MS", "250"),
            ("ATOMFIT_INVITATION_TTL_HOURS", "24"),
            ("ATOMFIT_PAGE_MAX_LIMIT", "50"),
            ("ATOMFIT_LOG_FORMAT", "JSON"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.database_url().as_deref(),
            Ok("postgres://db/atomfit")
        );
        assert_eq!(settings.query_timeout(), Ok(Duration::from_millis(250)));
        assert_eq!(settings.invitation_ttl(), Ok(chrono::TimeDelta::hours(24)));
        assert_eq!(settings.log_format(), LogFormat::Json);
        assert_eq!(
            settings
                .validation_policy()
                .expect("policy")
                .page_limits
                .max_limit(),
            50
        );
    }

    #[rstest]
    fn database_url_falls_back_to_the_conventional_variable() {
        let _guard = lock_env(env_with(&[("DATABASE_URL", "postgres://fallback/db")]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.database_url().as_deref(),
            Ok("postgres://fallback/db")
        );
    }

    #[rstest]
    #[case(Some(0), None)]
    #[case(Some(80), Some(40))]
    fn contradictory_page_limits_are_rejected(
        #[case] page_default_limit: Option<u32>,
        #[case] page_max_limit: Option<u32>,
    ) {
        let settings = AppSettings {
            page_default_limit,
            page_max_limit,
            ..blank()
        };

        assert!(matches!(
            settings.validation_policy(),
            Err(SettingsError::InvalidPageLimits { .. })
        ));
    }

    #[rstest]
    fn zero_query_timeout_is_rejected() {
        let settings = AppSettings {
            query_timeout_ms: Some(0),
            ..blank()
        };

        assert_eq!(
            settings.query_timeout(),
            Err(SettingsError::NotPositive {
                field: "query_timeout_ms"
            })
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    fn non_positive_invitation_ttl_is_rejected(#[case] hours: i64) {
        let settings = AppSettings {
            invitation_ttl_hours: Some(hours),
            ..blank()
        };

        assert!(matches!(
            settings.invitation_ttl(),
            Err(SettingsError::NotPositive { .. })
        ));
    }
}
