//! Error types for fleet operations.
//!
//! [`TransportError`] describes why a single device call failed and is
//! carried inside per-device results. [`CoreError`] is what the service
//! operations return to their caller; its variants map onto client and
//! server error classes via [`CoreError::http_status`].

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for service operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while talking to one device.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The local command could not be spawned or its pipes failed.
    #[error("Failed to execute command '{command}': {source}")]
    Spawn {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The command ran but exited non-zero.
    #[error("Command failed: '{command}' (exit code {exit_code}): {output}")]
    CommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// The device rejected a configuration line.
    #[error("Device rejected configuration: {message}")]
    Rejected {
        /// Device error text.
        message: String,
    },

    /// Output could not be turned into a structured response.
    #[error("Unparseable output for '{command}': {message}")]
    Parse {
        /// The command whose output was parsed.
        command: String,
        /// What was wrong with it.
        message: String,
    },

    /// The device did not answer within the caller's budget.
    #[error("Timed out after {}s", after.as_secs_f64())]
    Timeout {
        /// The timeout that was exceeded.
        after: Duration,
    },

    /// The transport cannot drive this device or request.
    #[error("Unsupported: {what}")]
    Unsupported {
        /// Description of the unsupported request.
        what: String,
    },

    /// The per-device task ended abnormally.
    #[error("Device task aborted: {message}")]
    Aborted {
        /// Join error text.
        message: String,
    },
}

impl TransportError {
    /// Creates a parse error.
    pub fn parse(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported-request error.
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported { what: what.into() }
    }
}

/// Errors returned by the fleet service operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Host identifier matched nothing in the inventory.
    #[error("Host '{host}' not found in inventory.")]
    HostNotFound {
        /// The identifier that was looked up.
        host: String,
    },

    /// A fleet MAC scan produced no access-port sightings.
    #[error("MAC address {mac} not found on any access port")]
    MacNotFound {
        /// The MAC address, as requested.
        mac: String,
    },

    /// The device does not report the requested interface.
    #[error("Interface '{interface}' not found on {host}")]
    InterfaceNotFound {
        /// Host identifier.
        host: String,
        /// Canonical interface name.
        interface: String,
    },

    /// A request field was missing or malformed.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// Error message.
        message: String,
    },

    /// A configuration push was rejected or could not be delivered.
    #[error("Failed to change VLAN on {host}: {message}")]
    WriteFailure {
        /// Host identifier.
        host: String,
        /// Underlying device error text.
        message: String,
    },

    /// A read against the device failed.
    #[error("Device {host} failed: {source}")]
    Transport {
        /// Device name.
        host: String,
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl CoreError {
    /// Creates a host-not-found error.
    pub fn host_not_found(host: impl Into<String>) -> Self {
        Self::HostNotFound { host: host.into() }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a transport error for `host`.
    pub fn transport(host: impl Into<String>, source: TransportError) -> Self {
        Self::Transport {
            host: host.into(),
            source,
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status class for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            CoreError::HostNotFound { .. }
            | CoreError::MacNotFound { .. }
            | CoreError::InterfaceNotFound { .. } => 404,
            CoreError::Validation { .. } => 400,
            CoreError::WriteFailure { .. }
            | CoreError::Transport { .. }
            | CoreError::Internal { .. } => 500,
        }
    }
}
