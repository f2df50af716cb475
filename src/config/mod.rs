//! Configuration loading and management
//!
//! Settings come from an optional YAML file and are then overridden by
//! environment variables, so a container can run with no file at all.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_BIND: &str = "CATALOG_BIND";
pub const ENV_JWT_SECRET: &str = "CATALOG_JWT_SECRET";
pub const ENV_TOKEN_TTL_DAYS: &str = "CATALOG_TOKEN_TTL_DAYS";

/// Longest accepted token lifetime, in days
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind (e.g., "127.0.0.1:3000")
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Token signing settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HMAC secret for session tokens
    pub jwt_secret: String,

    /// Token lifetime in days
    pub token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_days: 7,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .finish()
    }
}

/// Password policy toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub reject_common: bool,
    pub reject_numeric: bool,
    pub reject_similar: bool,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            reject_common: true,
            reject_numeric: true,
            reject_similar: true,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub password: PasswordConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET) {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup(ENV_TOKEN_TTL_DAYS) {
            self.auth.token_ttl_days = ttl.parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_TOKEN_TTL_DAYS.to_string(),
                message: format!("'{}' is not a whole number of days", ttl),
            })?;
        }
        Ok(self)
    }

    /// Check the settings the server cannot start without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.jwt_secret".to_string(),
                message: format!("must be set (or provide {})", ENV_JWT_SECRET),
            });
        }
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&self.auth.token_ttl_days) {
            return Err(ConfigError::InvalidValue {
                field: "auth.token_ttl_days".to_string(),
                message: format!("must be between 1 and {}", MAX_TOKEN_TTL_DAYS),
            });
        }
        if self.password.min_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "password.min_length".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration with a fixed secret, for tests and local runs
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            auth: AuthConfig {
                jwt_secret: secret.into(),
                ..AuthConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.auth.token_ttl_days, 7);
        assert_eq!(config.password.min_length, 8);
        assert!(config.validate().is_err(), "empty secret must be rejected");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str(
            r#"
auth:
  jwt_secret: "s3cret"
password:
  min_length: 10
"#,
        )
        .unwrap();

        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_ttl_days, 7);
        assert_eq!(config.password.min_length, 10);
        assert!(config.password.reject_common);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let yaml = serde_yaml::to_string(&AppConfig::with_secret("from-file")).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = AppConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.auth.jwt_secret, "from-file");
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = AppConfig::from_yaml_str("auth: [not, a, map]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BIND, "0.0.0.0:8080"),
            (ENV_JWT_SECRET, "env-secret"),
            (ENV_TOKEN_TTL_DAYS, "1"),
        ]);

        let config = AppConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.auth.jwt_secret, "env-secret");
        assert_eq!(config.auth.token_ttl_days, 1);
    }

    #[test]
    fn test_bad_ttl_override() {
        let err = AppConfig::default()
            .with_overrides(|key| (key == ENV_TOKEN_TTL_DAYS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = AppConfig::with_secret("x");
        config.auth.token_ttl_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ttl_upper_bound() {
        let mut config = AppConfig::with_secret("x");
        config.auth.token_ttl_days = MAX_TOKEN_TTL_DAYS;
        assert!(config.validate().is_ok());

        for days in [MAX_TOKEN_TTL_DAYS + 1, 100_000_000, i64::MAX] {
            config.auth.token_ttl_days = days;
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "auth.token_ttl_days"));
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig::with_secret("super-secret-value");
        assert!(!format!("{:?}", config).contains("super-secret-value"));
    }
}
