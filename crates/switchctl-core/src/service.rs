//! Request-level operations over the device fleet.
//!
//! [`FleetService`] is what the HTTP layer calls. Each call takes a fresh
//! inventory snapshot, resolves its target, fans the work out through
//! the [`Executor`] and folds the per-device results into one answer.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use switchctl_types::{normalize_interface, MacAddress, ParseError, VlanId};

use crate::commands::{build_change_vlan_lines, is_single_line};
use crate::error::{CoreError, CoreResult, TransportError};
use crate::executor::Executor;
use crate::inventory::Inventory;
use crate::locator::locate_mac;
use crate::model::{
    Getter, MacSighting, MacTable, Operation, OperationResult, PortStatus, VlanTable,
};
use crate::normalizer::build_port_status;

const BANNER_WIDTH: usize = 50;
const RULE_WIDTH: usize = 30;

/// Running configuration of the devices behind a host identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    pub hostname: String,
    pub config: String,
}

/// Outcome of a successful VLAN change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanChange {
    pub message: String,
    pub host: String,
    pub interface: String,
    pub vlan: String,
    pub description: Option<String>,
}

/// Fleet operations backed by an inventory and an executor.
#[derive(Clone)]
pub struct FleetService {
    inventory: Arc<dyn Inventory>,
    executor: Executor,
}

impl FleetService {
    pub fn new(inventory: Arc<dyn Inventory>, executor: Executor) -> Self {
        Self {
            inventory,
            executor,
        }
    }

    /// Number of devices in the current inventory snapshot.
    pub fn device_count(&self) -> usize {
        self.inventory.snapshot().len()
    }

    /// Fetches and renders the running configuration of `hostname`.
    ///
    /// Devices that fail are reported inline. The call only fails when
    /// every resolved device failed.
    #[instrument(skip(self))]
    pub async fn get_config(&self, hostname: &str) -> CoreResult<ConfigReport> {
        let hostname = required("hostname", hostname)?;
        let snapshot = self.inventory.snapshot();
        let devices = snapshot.resolve(hostname)?;

        let results = self
            .executor
            .execute(&devices, &Operation::read([Getter::Config]))
            .await;

        let mut config = String::new();
        let mut first_error = None;
        let mut succeeded = 0;

        for (device, result) in results {
            config.push_str(&render_banner(&device.name));

            match running_config(result) {
                Ok(running) => {
                    config.push_str(&render_running_config(&running));
                    succeeded += 1;
                }
                Err(e) => {
                    config.push_str(&format!(
                        "Failed to get config from {}: {}\n",
                        device.name, e
                    ));
                    if first_error.is_none() {
                        first_error = Some((device.name, e));
                    }
                }
            }
        }

        if succeeded == 0 {
            if let Some((name, e)) = first_error {
                return Err(CoreError::transport(name, e));
            }
        }

        info!(devices = succeeded, "Fetched running configuration");
        Ok(ConfigReport {
            hostname: hostname.to_string(),
            config,
        })
    }

    /// Moves `interface` on `host` to access VLAN `new_vlan`.
    ///
    /// The interface may be given in shorthand; the configuration is
    /// pushed with the canonical name. Any device rejecting the change
    /// fails the whole call.
    #[instrument(skip(self))]
    pub async fn change_vlan(
        &self,
        host: &str,
        interface: &str,
        new_vlan: &str,
        description: Option<&str>,
    ) -> CoreResult<VlanChange> {
        let host = required("host", host)?;
        let interface = required("interface", interface)?;
        let new_vlan = required("new_vlan", new_vlan)?;

        if !is_single_line(interface) {
            return Err(CoreError::validation(
                "interface",
                "must not contain control characters",
            ));
        }
        let description = description.map(str::trim).filter(|d| !d.is_empty());
        if description.is_some_and(|d| !is_single_line(d)) {
            return Err(CoreError::validation(
                "description",
                "must not contain control characters",
            ));
        }
        let vlan: VlanId = new_vlan
            .parse()
            .map_err(|e: ParseError| CoreError::validation("new_vlan", e.to_string()))?;

        let snapshot = self.inventory.snapshot();
        let devices = snapshot.resolve(host)?;

        let interface = normalize_interface(interface);
        let lines = build_change_vlan_lines(&interface, vlan, description);
        let results = self
            .executor
            .execute(&devices, &Operation::write(lines))
            .await;

        for (device, result) in results {
            if let Err(e) = result.into_outcome() {
                warn!(device = %device.name, error = %e, "VLAN change rejected");
                return Err(CoreError::WriteFailure {
                    host: device.name,
                    message: e.to_string(),
                });
            }
        }

        info!(interface = %interface, vlan = %vlan, "VLAN changed");
        Ok(VlanChange {
            message: format!(
                "Successfully changed {} to VLAN {} on {}",
                interface, vlan, host
            ),
            host: host.to_string(),
            interface,
            vlan: vlan.to_string(),
            description: description.map(str::to_string),
        })
    }

    /// Reports link state, VLAN, MAC and description of one port.
    ///
    /// When the identifier resolves to several devices the first one in
    /// inventory order is queried.
    #[instrument(skip(self))]
    pub async fn get_port_status(&self, host: &str, interface: &str) -> CoreResult<PortStatus> {
        let host = required("host", host)?;
        let interface = required("interface", interface)?;

        let snapshot = self.inventory.snapshot();
        let devices = snapshot.resolve(host)?;
        let device = devices[0];

        let op = Operation::read([
            Getter::Interfaces,
            Getter::MacAddressTable { address: None },
            Getter::Vlans,
        ]);
        let mut results = self.executor.execute(&[device], &op).await;
        let result = results
            .remove(device)
            .ok_or_else(|| CoreError::internal(format!("no result for {}", device.name)))?;

        let payload = result
            .into_outcome()
            .map_err(|e| CoreError::transport(&device.name, e))?;
        let read = payload
            .as_read()
            .ok_or_else(|| CoreError::internal("read returned a write report"))?;
        let interfaces = read
            .interfaces()
            .ok_or_else(|| CoreError::internal("interface table missing from response"))?;

        let no_macs = MacTable::new();
        let no_vlans = VlanTable::new();
        build_port_status(
            host,
            interfaces,
            read.mac_table().unwrap_or(&no_macs),
            read.vlans().unwrap_or(&no_vlans),
            interface,
        )
    }

    /// Locates a MAC address, given in `xxxx.yyyy.zzzz` form, across the
    /// whole fleet.
    #[instrument(skip(self))]
    pub async fn find_mac(&self, mac: &str) -> CoreResult<Vec<MacSighting>> {
        let mac = MacAddress::parse_dotted(mac.trim()).map_err(|_| {
            CoreError::validation("mac", "expected format xxxx.yyyy.zzzz")
        })?;
        let snapshot = self.inventory.snapshot();
        locate_mac(&self.executor, &snapshot, mac).await
    }
}

/// Extracts the running configuration from a config read.
///
/// A successful read that carries no configuration counts as a failure
/// of that device.
fn running_config(result: OperationResult) -> Result<String, TransportError> {
    let payload = result.into_outcome()?;
    payload
        .as_read()
        .and_then(|r| r.config())
        .map(|c| c.running.clone())
        .ok_or_else(|| {
            TransportError::parse(
                Getter::Config.name(),
                "response carried no running configuration",
            )
        })
}

fn render_banner(name: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("\n{rule}\nConfiguration for {name}\n{rule}\n")
}

fn render_running_config(running: &str) -> String {
    let lines: Vec<&str> = running.lines().collect();
    let mut out = format!(
        "Running Configuration ({} lines):\n{}\n",
        lines.len(),
        "-".repeat(RULE_WIDTH)
    );
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Trims `value`, rejecting it when nothing is left.
fn required<'a>(field: &str, value: &'a str) -> CoreResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    Ok(value)
}
