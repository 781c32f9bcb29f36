//! Configuration types.

use std::time::Duration;

use serde::Deserialize;

/// The persistence strategy backed by the trip-planner middleware API.
///
/// Account features only activate under this strategy.
pub const OTP_MIDDLEWARE_STRATEGY: &str = "otp_middleware";

/// Auth0 tenant settings the application shell uses to start logins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Auth0Config {
    pub domain: String,
    pub client_id: String,
    pub audience: String,
}

/// Endpoint settings for the middleware persistence API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MiddlewareConfig {
    /// Base URL, e.g. `https://middleware.example.com`.
    pub api_base_url: String,
    /// Deployment API key sent alongside the bearer token, if required.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// The `persistence` section of the application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub auth0: Option<Auth0Config>,
    #[serde(default)]
    pub otp_middleware: Option<MiddlewareConfig>,
}

impl PersistenceConfig {
    fn uses_middleware(&self) -> bool {
        self.enabled && self.strategy.as_deref() == Some(OTP_MIDDLEWARE_STRATEGY)
    }

    /// The Auth0 settings, or `None` when persistence is disabled or uses
    /// another strategy.
    pub fn auth0_config(&self) -> Option<&Auth0Config> {
        if self.uses_middleware() {
            self.auth0.as_ref()
        } else {
            None
        }
    }

    /// The middleware endpoint settings, gated like [`Self::auth0_config`].
    pub fn middleware_config(&self) -> Option<&MiddlewareConfig> {
        if self.uses_middleware() {
            self.otp_middleware.as_ref()
        } else {
            None
        }
    }
}

/// Tuning for the access-token polling loop.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Delay before the first retry.
    pub poll_interval: Duration,
    /// Upper bound for the backed-off delay.
    pub max_interval: Duration,
    /// Token checks before giving up with a timeout.
    pub max_poll_attempts: u32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(8),
            max_poll_attempts: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_config() -> PersistenceConfig {
        PersistenceConfig {
            enabled: true,
            strategy: Some(OTP_MIDDLEWARE_STRATEGY.to_string()),
            auth0: Some(Auth0Config {
                domain: "example.auth0.com".to_string(),
                client_id: "client123".to_string(),
                audience: "https://middleware.example.com".to_string(),
            }),
            otp_middleware: Some(MiddlewareConfig {
                api_base_url: "https://middleware.example.com".to_string(),
                api_key: Some("key".to_string()),
            }),
        }
    }

    #[test]
    fn auth0_config_available_when_fully_configured() {
        let config = active_config();
        assert!(config.auth0_config().is_some());
        assert!(config.middleware_config().is_some());
    }

    #[test]
    fn auth0_config_gated_on_enabled() {
        let config = PersistenceConfig {
            enabled: false,
            ..active_config()
        };
        assert!(config.auth0_config().is_none());
        assert!(config.middleware_config().is_none());
    }

    #[test]
    fn auth0_config_gated_on_strategy() {
        let config = PersistenceConfig {
            strategy: Some("localStorage".to_string()),
            ..active_config()
        };
        assert!(config.auth0_config().is_none());

        let config = PersistenceConfig {
            strategy: None,
            ..active_config()
        };
        assert!(config.auth0_config().is_none());
    }

    #[test]
    fn auth0_config_absent_when_section_missing() {
        let config = PersistenceConfig {
            auth0: None,
            ..active_config()
        };
        assert!(config.auth0_config().is_none());
        // The middleware endpoint gate is independent of the auth0 section.
        assert!(config.middleware_config().is_some());
    }

    #[test]
    fn persistence_config_deserializes() {
        let json = serde_json::json!({
            "enabled": true,
            "strategy": "otp_middleware",
            "auth0": {
                "domain": "example.auth0.com",
                "client_id": "client123",
                "audience": "https://middleware.example.com"
            },
            "otp_middleware": {
                "api_base_url": "https://middleware.example.com"
            }
        });
        let config: PersistenceConfig = serde_json::from_value(json).unwrap();
        assert!(config.auth0_config().is_some());
        let middleware = config.middleware_config().unwrap();
        assert_eq!(middleware.api_base_url, "https://middleware.example.com");
        assert!(middleware.api_key.is_none());
    }

    #[test]
    fn empty_persistence_section_is_inert() {
        let config: PersistenceConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!config.enabled);
        assert!(config.auth0_config().is_none());
        assert!(config.middleware_config().is_none());
    }

    #[test]
    fn acquisition_defaults() {
        let config = AcquisitionConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.max_interval, Duration::from_secs(8));
        assert_eq!(config.max_poll_attempts, 30);
    }
}
