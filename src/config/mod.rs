//! Environment-driven configuration. Defaults cover local development;
//! production requires every value to be set explicitly.

use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub port: u16,
    pub provider: ProviderConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

/// Endpoint and keys for the external identity/storage platform. The anon
/// key authenticates end-user flows, the service key backend row access.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub anon_key: String,
    pub service_key: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(AppError::Config)?;

        let is_prod = environment == Environment::Prod;

        let config = Config {
            environment,
            service_name: get_env("SERVICE_NAME", Some("roster-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            port: get_env("PORT", Some("8000"), is_prod)?
                .parse()
                .map_err(|e: std::num::ParseIntError| AppError::Config(e.to_string()))?,
            provider: ProviderConfig {
                base_url: get_env("PROVIDER_URL", Some("http://localhost:54321"), is_prod)?
                    .trim_end_matches('/')
                    .to_string(),
                anon_key: get_env("PROVIDER_ANON_KEY", Some("dev-anon-key"), is_prod)?,
                service_key: get_env("PROVIDER_SERVICE_KEY", Some("dev-service-key"), is_prod)?,
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:5173,http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.port == 0 {
            return Err(AppError::Config("PORT must be greater than 0".to_string()));
        }

        if self.provider.base_url.is_empty() {
            return Err(AppError::Config("PROVIDER_URL must not be empty".to_string()));
        }

        if self.environment == Environment::Prod
            && self.security.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(AppError::Config(
                "Wildcard CORS origin not allowed in production".to_string(),
            ));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::Config(format!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::Config(format!("{} is required but not set", key)))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
