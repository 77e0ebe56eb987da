//! switchctld - HTTP front end for switch fleet operations
//!
//! Serves the fleet operations of `switchctl-core` over HTTP:
//! running-config retrieval, access VLAN changes, port status and
//! fleet-wide MAC location.

pub mod config;
pub mod error;
pub mod rest_api;

use std::sync::Arc;

use switchctl_core::{Executor, FleetService, SshCliTransport, StaticInventory, Transport};

pub use config::{SwitchctlConfig, DEFAULT_CONFIG_PATH};
pub use error::{Result, SwitchctlError};
pub use rest_api::{router, AppState};

/// Wire the fleet service from a validated configuration
pub fn build_service(config: &SwitchctlConfig) -> FleetService {
    let transport: Arc<dyn Transport> = Arc::new(SshCliTransport::new(config.ssh_options()));
    let executor = Executor::new(transport, config.executor_options());
    let inventory = Arc::new(StaticInventory::new(config.devices.clone()));
    FleetService::new(inventory, executor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchctl_core::Device;

    #[test]
    fn test_build_service_uses_inventory() {
        let config = SwitchctlConfig {
            devices: vec![
                Device::new("SW1", "172.17.57.240"),
                Device::new("SW2", "172.17.57.241"),
            ],
            ..Default::default()
        };
        assert_eq!(build_service(&config).device_count(), 2);
    }
}
