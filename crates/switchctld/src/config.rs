//! Configuration file support for switchctld
//!
//! Loads and validates the daemon configuration and device inventory from
//! TOML files. Default location: /etc/switchctl/switchctl.toml

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use switchctl_core::{Device, ExecutorOptions, SshOptions};

use crate::error::{Result, SwitchctlError};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/switchctl/switchctl.toml";

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Device executor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Per-device operation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum devices contacted at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// SSH transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshConfig {
    /// ssh client binary
    #[serde(default = "default_ssh_binary")]
    pub binary: String,

    /// Login user (ssh client default when unset)
    #[serde(default)]
    pub username: Option<String>,

    /// SSH port
    #[serde(default = "default_ssh_port")]
    pub port: u16,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Verify device host keys
    #[serde(default = "default_strict_host_key_checking")]
    pub strict_host_key_checking: bool,
}

/// Complete switchctld configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchctlConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Executor configuration
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// SSH transport configuration
    #[serde(default)]
    pub ssh: SshConfig,

    /// Device inventory
    #[serde(default)]
    pub devices: Vec<Device>,
}

// Default functions
fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_concurrency() -> usize {
    20
}

fn default_ssh_binary() -> String {
    switchctl_core::transport::SSH_CMD.to_string()
}

fn default_ssh_port() -> u16 {
    22
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_strict_host_key_checking() -> bool {
    true
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            binary: default_ssh_binary(),
            username: None,
            port: default_ssh_port(),
            connect_timeout_secs: default_connect_timeout(),
            strict_host_key_checking: default_strict_host_key_checking(),
        }
    }
}

impl SwitchctlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SwitchctlError::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                SwitchctlError::Configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(SwitchctlError::Io(e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> Result<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Get per-device timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.executor.timeout_secs)
    }

    /// Get ssh connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.ssh.connect_timeout_secs)
    }

    /// Executor options from this configuration
    pub fn executor_options(&self) -> ExecutorOptions {
        ExecutorOptions {
            timeout: self.timeout(),
            max_concurrency: self.executor.max_concurrency,
        }
    }

    /// SSH transport options from this configuration
    pub fn ssh_options(&self) -> SshOptions {
        SshOptions {
            binary: self.ssh.binary.clone(),
            username: self.ssh.username.clone(),
            port: self.ssh.port,
            connect_timeout: self.connect_timeout(),
            strict_host_key_checking: self.ssh.strict_host_key_checking,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            return Err(SwitchctlError::Configuration(
                "bind must not be empty".to_string(),
            ));
        }

        if self.executor.timeout_secs == 0 {
            return Err(SwitchctlError::Configuration(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        if self.executor.max_concurrency == 0 {
            return Err(SwitchctlError::Configuration(
                "max_concurrency must be > 0".to_string(),
            ));
        }

        if self.ssh.port == 0 {
            return Err(SwitchctlError::Configuration(
                "ssh port must be > 0".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for device in &self.devices {
            if device.name.trim().is_empty() || device.address.trim().is_empty() {
                return Err(SwitchctlError::Configuration(format!(
                    "device entry needs a name and an address: {:?}",
                    device
                )));
            }
            if !names.insert(device.name.to_ascii_lowercase()) {
                return Err(SwitchctlError::Configuration(format!(
                    "duplicate device name: {}",
                    device.name
                )));
            }
        }

        Ok(())
    }
}
