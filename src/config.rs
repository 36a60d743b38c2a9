//! Configuration module for environment variables and application settings

use anyhow::{Context, Result, anyhow};
use std::env;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: usize = 16;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const DEV_JWT_SECRET: &str = "dev_secret";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3001,http://localhost:3002,http://localhost:3003";

#[derive(Debug, Clone)]
pub struct Config {
    /// `true` when `ENV=prod`
    pub production: bool,

    /// Server configuration
    pub server: ServerConfig,

    /// Postgres settings; `None` selects the in-memory store
    pub database: Option<DatabaseSettings>,

    /// Token signing configuration
    pub auth: AuthConfig,

    /// Cross-origin settings for the browser frontend
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: usize,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_ttl_hours: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age_secs: u64,
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has invalid value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let production = lookup("ENV").is_some_and(|env| env.eq_ignore_ascii_case("prod"));

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if production => anyhow::bail!("JWT_SECRET environment variable is required when ENV=prod"),
            None => {
                tracing::warn!("⚠️  JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let token_ttl_hours = parse_or(lookup("TOKEN_TTL_HOURS"), "TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        if token_ttl_hours <= 0 {
            anyhow::bail!("TOKEN_TTL_HOURS must be positive");
        }

        let database = match lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            Some(url) => Some(DatabaseSettings {
                url,
                max_connections: parse_or(
                    lookup("DATABASE_MAX_CONNECTIONS"),
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            }),
            None => None,
        };

        let allowed_origins: Vec<String> = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        // Credentialed CORS needs explicit origins
        if allowed_origins.iter().any(|origin| origin == "*") {
            anyhow::bail!("CORS_ALLOWED_ORIGINS must list explicit origins, \"*\" is not allowed");
        }

        let default_host = if production { "0.0.0.0" } else { "127.0.0.1" };

        Ok(Self {
            production,
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| default_host.to_string()),
                port: parse_or(lookup("PORT"), "PORT", DEFAULT_PORT).context("Invalid server port")?,
            },
            database,
            auth: AuthConfig {
                jwt_secret,
                issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "shopmarket".to_string()),
                token_ttl_hours,
            },
            cors: CorsConfig {
                allowed_origins,
                max_age_secs: 12 * 3600,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(!config.production);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.database.is_none());
        assert_eq!(config.auth.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.cors.allowed_origins.len(), 3);
    }

    #[test]
    fn test_production_requires_secret_and_binds_all_interfaces() {
        assert!(load(&[("ENV", "prod")]).is_err());

        let config = load(&[("ENV", "prod"), ("JWT_SECRET", "s3cr3t"), ("PORT", "9000")]).unwrap();
        assert!(config.production);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(!format!("{:?}", config.auth).contains("s3cr3t"));
    }

    #[test]
    fn test_database_settings() {
        let config = load(&[
            ("DATABASE_URL", "postgres://u:p@localhost/shop"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ])
        .unwrap();
        let database = config.database.unwrap();
        assert_eq!(database.url, "postgres://u:p@localhost/shop");
        assert_eq!(database.max_connections, 4);
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("TOKEN_TTL_HOURS", "0")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("DATABASE_MAX_CONNECTIONS", "-1")]).is_err());
    }

    #[test]
    fn test_cors_origin_list() {
        let config = load(&[("CORS_ALLOWED_ORIGINS", "https://shop.example.com, ,http://localhost:3000")]).unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://shop.example.com".to_string(), "http://localhost:3000".to_string()]
        );
    }

    #[test]
    fn test_wildcard_cors_origin_is_rejected() {
        assert!(load(&[("CORS_ALLOWED_ORIGINS", "*")]).is_err());
        assert!(load(&[("CORS_ALLOWED_ORIGINS", "https://shop.example.com, *")]).is_err());
    }
}
