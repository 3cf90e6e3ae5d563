use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sessions: SessionConfig,
    #[serde(default)]
    pub chamber: ChamberConfig,
    pub bootstrap: Option<BootstrapConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self> {
        let configured_path =
            std::env::var("CAMARA_CONFIG").unwrap_or_else(|_| "config/camara.toml".to_string());
        assert!(
            !configured_path.is_empty(),
            "Configuration path must be non-empty"
        );
        assert!(
            configured_path.len() < 4096,
            "Configuration path length exceeds hard limit"
        );

        let mut builder = Config::builder()
            .add_source(File::new(&configured_path, FileFormat::Toml).required(true));

        if let Ok(env_override) = std::env::var("CAMARA_ENV") {
            if !env_override.is_empty() {
                let env_file = format!("config/camara.{}.toml", env_override);
                if Path::new(&env_file).exists() {
                    builder = builder.add_source(File::new(&env_file, FileFormat::Toml));
                }
            }
        }

        let settings = builder
            .build()
            .map_err(|err| map_config_error(err, &configured_path))?;
        let config: Self = settings
            .try_deserialize()
            .context("Failed to deserialize API configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            bail!("Database URL must be specified");
        }
        if self.server.port == 0 {
            bail!("Server port must be greater than zero");
        }
        if let Some(min) = self.database.min_connections {
            if min > self.database.max_connections {
                bail!("Max connections must be >= min connections");
            }
        }
        if self.database.max_connections == 0 || self.database.max_connections > 128 {
            bail!("Max connections must be between 1 and 128");
        }
        self.sessions.ensure_bounds()?;
        self.chamber.ensure_bounds()?;
        if let Some(bootstrap) = self.bootstrap.as_ref() {
            if bootstrap.superuser_username.trim().is_empty() {
                bail!("Bootstrap superuser username must not be empty");
            }
            crate::accounts::validate_password(&bootstrap.superuser_password)
                .context("Bootstrap superuser password rejected")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Option<IpAddr>,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        let host = self.host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(self.port != 0, "HTTP port cannot be zero");
        SocketAddr::new(host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_seconds: u64,
    pub max_sessions: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    fn ensure_bounds(&self) -> Result<()> {
        if self.ttl_seconds < 60 {
            bail!("Session TTL must be at least one minute");
        }
        if self.ttl_seconds > 86_400 {
            bail!("Session TTL cannot exceed one day");
        }
        if self.max_sessions < 10 {
            bail!("Session capacity must be at least 10");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChamberConfig {
    /// Member limit used while no configuration row exists
    #[serde(default = "ChamberConfig::default_fallback_member_limit")]
    pub fallback_member_limit: i32,
    #[serde(default = "ChamberConfig::default_time_limit_seconds")]
    pub default_time_limit_seconds: i32,
}

impl Default for ChamberConfig {
    fn default() -> Self {
        Self {
            fallback_member_limit: Self::default_fallback_member_limit(),
            default_time_limit_seconds: Self::default_time_limit_seconds(),
        }
    }
}

impl ChamberConfig {
    const fn default_fallback_member_limit() -> i32 {
        15
    }

    const fn default_time_limit_seconds() -> i32 {
        crate::voting::service::DEFAULT_TIME_LIMIT_SECONDS
    }

    fn ensure_bounds(&self) -> Result<()> {
        if self.fallback_member_limit <= 0
            || self.fallback_member_limit > crate::registry::MAX_MEMBER_LIMIT
        {
            bail!("Fallback member limit out of range");
        }
        if self.default_time_limit_seconds <= 0
            || self.default_time_limit_seconds > crate::voting::service::MAX_TIME_LIMIT_SECONDS
        {
            bail!("Default voting time limit out of range");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    pub superuser_username: String,
    pub superuser_password: String,
}

fn map_config_error(err: ConfigError, path: &str) -> ConfigError {
    match err {
        ConfigError::NotFound(_) => ConfigError::NotFound(path.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<ApiConfig> {
        let config: ApiConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    const BASE: &str = r#"
        [server]
        port = 8080

        [database]
        url = "postgres://camara@localhost/camara"
        max_connections = 8

        [sessions]
        ttl_seconds = 3600
        max_sessions = 1000
    "#;

    #[test]
    fn chamber_defaults_apply_when_section_missing() {
        let config = parse(BASE).expect("valid config");
        assert_eq!(config.chamber.fallback_member_limit, 15);
        assert_eq!(config.chamber.default_time_limit_seconds, 60);
        assert!(config.bootstrap.is_none());
        assert_eq!(config.server.address().port(), 8080);
    }

    #[test]
    fn short_bootstrap_password_is_rejected() {
        let toml = format!(
            "{BASE}\n[bootstrap]\nsuperuser_username = \"admin\"\nsuperuser_password = \"123\"\n"
        );
        assert!(parse(&toml).is_err());
    }

    #[test]
    fn session_ttl_bounds_are_enforced() {
        let toml = BASE.replace("ttl_seconds = 3600", "ttl_seconds = 5");
        assert!(parse(&toml).is_err());
    }
}
