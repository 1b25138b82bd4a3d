//! Configuration management for pollftp
//!
//! Start-up settings for the binary. Sources are layered: built-in
//! defaults, then an optional `config.toml` (or the file named by
//! `POLLFTP_CONFIG`), then `POLLFTP_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::server::SessionSettings;
use crate::transfer::MIN_BUFFER_SIZE;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_VAR: &str = "POLLFTP_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "config";

/// Longest idle or login timeout accepted, one week.
pub const MAX_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address both listeners bind to
    pub bind_address: String,

    /// Port for the FTP control connection
    pub control_port: u16,

    /// The one port passive data connections are accepted on
    pub passive_port: u16,

    /// Address advertised in PASV replies, for servers behind NAT
    pub passive_address: Option<String>,

    /// Directory served as `/`
    pub server_root: String,

    /// Login factors; empty disables the factor
    pub username: String,
    pub password: String,

    pub idle_timeout_secs: u64,
    pub login_timeout_secs: u64,

    /// Interval at which the binary polls the engine
    pub poll_interval_ms: u64,

    /// Upper bound for an active-mode connect
    pub connect_timeout_ms: u64,

    /// Largest transfer buffer the engine may allocate
    pub max_buffer_size: usize,
}

impl ServerConfig {
    /// Load configuration from defaults, file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from(&path)
    }

    /// Load configuration with `path` as the (optional) file source.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("POLLFTP").try_parsing(true))
            .build()?;
        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("control_port", 2121)?
            .set_default("passive_port", 50009)?
            .set_default("server_root", "./server_root")?
            .set_default("username", "")?
            .set_default("password", "")?
            .set_default("idle_timeout_secs", 300)?
            .set_default("login_timeout_secs", 10)?
            .set_default("poll_interval_ms", 10)?
            .set_default("connect_timeout_ms", 500)?
            .set_default("max_buffer_size", 32 * 1024)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control_port == 0 || self.passive_port == 0 {
            return Err(ConfigError::Message("Ports cannot be 0".into()));
        }

        if self.control_port == self.passive_port {
            return Err(ConfigError::Message(
                "control_port and passive_port must differ".into(),
            ));
        }

        if self.server_root.is_empty() {
            return Err(ConfigError::Message("server_root cannot be empty".into()));
        }

        if self.idle_timeout_secs == 0
            || self.login_timeout_secs == 0
            || self.poll_interval_ms == 0
            || self.connect_timeout_ms == 0
        {
            return Err(ConfigError::Message(
                "timeouts and the poll interval must be greater than 0".into(),
            ));
        }

        if self.idle_timeout_secs > MAX_TIMEOUT_SECS || self.login_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Message(format!(
                "timeouts cannot exceed {} seconds",
                MAX_TIMEOUT_SECS
            )));
        }

        if self.max_buffer_size < MIN_BUFFER_SIZE {
            return Err(ConfigError::Message(format!(
                "max_buffer_size must be at least {}",
                MIN_BUFFER_SIZE
            )));
        }

        self.bind_ip()?;
        self.passive_ip()?;
        Ok(())
    }

    fn bind_ip(&self) -> Result<IpAddr, ConfigError> {
        self.bind_address
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid bind_address: {}", e)))
    }

    fn passive_ip(&self) -> Result<Option<Ipv4Addr>, ConfigError> {
        match self.passive_address.as_deref() {
            None | Some("") => Ok(None),
            Some(addr) => addr
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::Message(format!("invalid passive_address: {}", e))),
        }
    }

    pub fn control_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.control_port))
    }

    pub fn passive_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.passive_port))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Engine settings derived from this configuration.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        let defaults = SessionSettings::default();
        Ok(SessionSettings {
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            login_timeout: Duration::from_secs(self.login_timeout_secs),
            passive_address: self.passive_ip()?,
            max_buffer_size: self.max_buffer_size,
            retrieve_buffer_size: defaults.retrieve_buffer_size,
            store_buffer_size: defaults.store_buffer_size,
            buffer_budget: defaults.buffer_budget,
        })
    }
}
