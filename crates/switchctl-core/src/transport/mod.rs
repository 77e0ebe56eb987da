//! Device transport abstraction.
//!
//! The executor only ever talks to devices through [`Transport`]. The
//! bundled [`SshCliTransport`] drives IOS-style CLIs through the system
//! ssh client; tests substitute their own implementations.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::model::{Device, Getter, GetterResponse};

pub mod ios;
mod ssh;

pub use ssh::{SshCliTransport, SshOptions, SSH_CMD};

/// Executes getters and configuration pushes against one device.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Runs one read-only getter.
    async fn get(&self, device: &Device, getter: &Getter) -> Result<GetterResponse, TransportError>;

    /// Pushes configuration lines in order, returning the device output.
    async fn push_config(&self, device: &Device, lines: &[String])
        -> Result<String, TransportError>;
}
