//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Listener binding address (loopback by default; the port is
    /// configurable, not a protocol constant)
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Pacing delay between exchange-loop iterations
    pub session_interval: Duration,
    /// Maximum bytes consumed from the socket per iteration
    pub read_buffer_bytes: usize,
    /// Simulation tick rate driven by the binary
    pub simulation_tps: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BRIDGE_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        let session_interval_ms = parse_or("SESSION_INTERVAL_MS", 16u64)?;
        let read_buffer_bytes = parse_or("READ_BUFFER_BYTES", 256usize)?;
        let simulation_tps = parse_or("SIMULATION_TPS", 60u32)?;

        if read_buffer_bytes == 0 {
            return Err(ConfigError::Invalid("READ_BUFFER_BYTES"));
        }
        if simulation_tps == 0 {
            return Err(ConfigError::Invalid("SIMULATION_TPS"));
        }

        Ok(Self {
            bind_addr: bind_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            session_interval: Duration::from_millis(session_interval_ms),
            read_buffer_bytes,
            simulation_tps,
        })
    }

    /// Tick period implied by the configured simulation rate
    pub fn tick_period(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.simulation_tps as u64)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().expect("static address"),
            log_level: "info".to_string(),
            session_interval: Duration::from_millis(16),
            read_buffer_bytes: 256,
            simulation_tps: 60,
        }
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(var)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid bind address format")]
    InvalidAddress,
}
