//! Inventory snapshots and host resolution.
//!
//! Each request works against one [`InventorySnapshot`] handed out by the
//! [`Inventory`] collaborator. The snapshot is read-only; resolution
//! borrows devices from it for the duration of the request.

use std::sync::Arc;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::model::Device;

/// Source of inventory snapshots.
pub trait Inventory: Send + Sync {
    /// Returns the snapshot to use for one request.
    fn snapshot(&self) -> Arc<InventorySnapshot>;
}

/// Immutable view of the managed devices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    devices: Vec<Device>,
}

impl InventorySnapshot {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Looks a device up by its exact inventory name.
    pub fn get(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Resolves a host identifier against device name OR management
    /// address.
    ///
    /// Names compare case-insensitively, addresses exactly. An identifier
    /// that matches nothing is a [`CoreError::HostNotFound`], never an
    /// empty success.
    pub fn resolve(&self, identifier: &str) -> CoreResult<Vec<&Device>> {
        let wanted = identifier.trim();
        let matched: Vec<&Device> = self
            .devices
            .iter()
            .filter(|d| d.name.eq_ignore_ascii_case(wanted) || d.address == wanted)
            .collect();

        if matched.is_empty() {
            debug!(host = %wanted, "Host not in inventory");
            return Err(CoreError::host_not_found(wanted));
        }

        debug!(host = %wanted, matched = matched.len(), "Resolved host");
        Ok(matched)
    }
}

/// Inventory backed by a fixed device list (e.g. from the config file).
#[derive(Debug, Clone)]
pub struct StaticInventory {
    snapshot: Arc<InventorySnapshot>,
}

impl StaticInventory {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            snapshot: Arc::new(InventorySnapshot::new(devices)),
        }
    }
}

impl Inventory for StaticInventory {
    fn snapshot(&self) -> Arc<InventorySnapshot> {
        Arc::clone(&self.snapshot)
    }
}
