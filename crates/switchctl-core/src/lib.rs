//! Device-fleet orchestration for switchctl.
//!
//! This crate resolves host identifiers against an inventory, dispatches
//! read and write operations to switches concurrently and folds the
//! per-device results into port status reports, configuration dumps and
//! MAC sightings.
//!
//! # Architecture
//!
//! ```text
//! FleetService
//!     ├── Inventory ──► InventorySnapshot::resolve
//!     ├── Executor ───► Transport (SshCliTransport, test fakes)
//!     ├── normalizer::build_port_status
//!     └── locator::locate_mac
//! ```

pub mod commands;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod locator;
pub mod model;
pub mod normalizer;
pub mod service;
pub mod shell;
pub mod transport;

pub use error::{CoreError, CoreResult, TransportError};
pub use executor::{Executor, ExecutorOptions};
pub use inventory::{Inventory, InventorySnapshot, StaticInventory};
pub use locator::locate_mac;
pub use model::{
    Destinations, Device, DeviceConfig, Getter, GetterResponse, InterfaceRecord, InterfaceTable,
    MacSighting, MacTable, MacTableEntry, Operation, OperationResult, Payload, PortStatus,
    ReadOp, ReadResponse, SwitchportInfo, VlanRecord, VlanTable, WriteOp, WriteReport,
};
pub use normalizer::build_port_status;
pub use service::{ConfigReport, FleetService, VlanChange};
pub use transport::{SshCliTransport, SshOptions, Transport};

// Re-export the shared primitives for convenience
pub use switchctl_types::{
    is_aggregate_interface, normalize_interface, InterfaceName, LinkState, MacAddress, VlanId,
};
