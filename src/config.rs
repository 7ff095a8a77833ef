//! Server configuration, built from command-line arguments and environment
//! variables.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

use crate::core::DEFAULT_MAX_YEARS;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid max years: {0}. Must be > 0")]
    InvalidMaxYears(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: LogLevel,
    /// Year ceiling handed to the amortization engine on every request.
    pub max_years: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            log_level: LogLevel::default(),
            max_years: DEFAULT_MAX_YEARS,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Raw values as they arrive from clap; `None` falls back to the default.
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub max_years: Option<u32>,
}

pub fn build_config(args: &ConfigArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = ServerConfig::default();

    if let Some(host) = &args.host {
        config.host = host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(host.clone()))?;
    }
    if let Some(port) = args.port {
        if port == 0 {
            return Err(ConfigError::InvalidPort(port));
        }
        config.port = port;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.parse()?;
    }
    if let Some(max_years) = args.max_years {
        if max_years == 0 {
            return Err(ConfigError::InvalidMaxYears(max_years));
        }
        config.max_years = max_years;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_args_given() {
        let config = build_config(&ConfigArgs::default()).expect("defaults are valid");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.max_years, DEFAULT_MAX_YEARS);
    }

    #[test]
    fn args_override_defaults() {
        let args = ConfigArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(3000),
            log_level: Some("DEBUG".to_string()),
            max_years: Some(50),
        };
        let config = build_config(&args).expect("valid args");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.max_years, 50);
    }

    #[test]
    fn rejects_invalid_values() {
        let args = ConfigArgs {
            port: Some(0),
            ..ConfigArgs::default()
        };
        assert_eq!(build_config(&args), Err(ConfigError::InvalidPort(0)));

        let args = ConfigArgs {
            host: Some("not-an-ip".to_string()),
            ..ConfigArgs::default()
        };
        assert!(matches!(
            build_config(&args),
            Err(ConfigError::InvalidHost(_))
        ));

        let args = ConfigArgs {
            log_level: Some("loud".to_string()),
            ..ConfigArgs::default()
        };
        assert!(matches!(
            build_config(&args),
            Err(ConfigError::InvalidLogLevel(_))
        ));

        let args = ConfigArgs {
            max_years: Some(0),
            ..ConfigArgs::default()
        };
        assert_eq!(build_config(&args), Err(ConfigError::InvalidMaxYears(0)));
    }

    #[test]
    fn log_level_round_trips_through_display() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
        }
    }
}
