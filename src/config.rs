//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `dashboard.toml`.
//!     loads configuration from file or falls back to defaults.
//!
//! structure:
//!     - ServerConfig: Where the web server binds.
//!     - PagesConfig: Where the html page templates live.
//!     - LoggingConfig: Log level and per-tick reading output.
//!
//! the simulation itself (drift ranges, clamps, tick interval) is fixed
//! and has no section here.
//!
//! runs before logging is initialized (the log level comes from here),
//! so load messages go straight to stdout.
//!
//! ==============================================================================

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pages: PagesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PagesConfig {
    pub template_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_sensor_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_sensor_data: false,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}

impl DashboardConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        Self::parse(&content)
    }

    /// Parse configuration from toml text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
    }

    /// Load with default fallback from the standard locations
    pub fn load_or_default() -> Self {
        Self::load_first_or_default(&[
            PathBuf::from("config").join("dashboard.toml"),
            PathBuf::from("..").join("config").join("dashboard.toml"),
        ])
    }

    /// First candidate that exists and parses wins; otherwise defaults
    pub fn load_first_or_default(paths: &[PathBuf]) -> Self {
        let mut rejected = 0;

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load(path) {
                Ok(config) => {
                    println!("[CONFIG] Loaded from {}", path.display());
                    return config;
                }
                Err(e) => {
                    println!("[CONFIG] Warning: Skipping {}: {}", path.display(), e);
                    rejected += 1;
                }
            }
        }

        if rejected == 0 {
            println!("[CONFIG] No config file found - using defaults");
        } else {
            println!("[CONFIG] Warning: No usable config file - using defaults");
        }
        Self::default()
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("┌─────────────────────────────────────────┐");
        println!("│         DASHBOARD CONFIGURATION         │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Bind: {}:{}", self.server.host, self.server.port);
        println!("│ Templates: {}", self.pages.template_dir.display());
        println!("│ Log Level: {}", self.logging.level);
        println!("│ Show Sensor Data: {}", self.logging.show_sensor_data);
        println!("└─────────────────────────────────────────┘");
    }
}
