//! Device, operation and response types.
//!
//! Getter responses are a tagged union, one variant per getter, so that
//! consumers match on shape instead of probing loosely typed maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use switchctl_types::{LinkState, MacAddress, VlanId};

use crate::error::TransportError;

/// A managed switch as known to the inventory.
///
/// Devices order by name, then address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Device {
    /// Inventory name (e.g. "SW1").
    pub name: String,
    /// Management address (IP or DNS name).
    pub address: String,
    /// Platform hint for the transport ("ios" when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            platform: None,
        }
    }

    /// Sets the platform hint.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}

/// A read-only structured query against a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "getter", rename_all = "snake_case")]
pub enum Getter {
    /// Running configuration.
    Config,
    /// Interface table (link state, description).
    Interfaces,
    /// MAC address table, optionally restricted to one address.
    MacAddressTable {
        #[serde(skip_serializing_if = "Option::is_none")]
        address: Option<MacAddress>,
    },
    /// VLAN table with member interfaces.
    Vlans,
    /// Switchport mode of a single interface.
    Switchport { interface: String },
}

impl Getter {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Getter::Config => "config",
            Getter::Interfaces => "interfaces",
            Getter::MacAddressTable { .. } => "mac_address_table",
            Getter::Vlans => "vlans",
            Getter::Switchport { .. } => "switchport",
        }
    }
}

/// One or more getters run against a device without mutating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOp {
    getters: Vec<Getter>,
}

impl ReadOp {
    pub fn new(getters: impl IntoIterator<Item = Getter>) -> Self {
        Self {
            getters: getters.into_iter().collect(),
        }
    }

    pub fn getters(&self) -> &[Getter] {
        &self.getters
    }
}

/// Configuration lines pushed to a device in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOp {
    lines: Vec<String>,
}

impl WriteOp {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Operation dispatched by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Read(ReadOp),
    Write(WriteOp),
}

impl Operation {
    /// Shorthand for a read of the given getters.
    pub fn read(getters: impl IntoIterator<Item = Getter>) -> Self {
        Operation::Read(ReadOp::new(getters))
    }

    /// Shorthand for a configuration push.
    pub fn write(lines: Vec<String>) -> Self {
        Operation::Write(WriteOp::new(lines))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Read(_) => "read",
            Operation::Write(_) => "write",
        }
    }
}

/// Device configuration as returned by the config getter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub running: String,
}

/// One row of the interface table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    /// Line protocol up.
    pub is_up: bool,
    #[serde(default)]
    pub description: String,
}

impl InterfaceRecord {
    pub fn link_state(&self) -> LinkState {
        LinkState::from_up(self.is_up)
    }
}

/// Interface table keyed by the name the device reported.
pub type InterfaceTable = BTreeMap<String, InterfaceRecord>;

/// Destination port(s) of a MAC table entry.
///
/// Platforms disagree on whether this is a single name or a list; both
/// shapes are accepted and flattened by [`MacTableEntry::destinations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Destinations {
    One(String),
    Many(Vec<String>),
}

/// One row of the MAC address table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacTableEntry {
    pub mac: MacAddress,
    pub vlan: VlanId,
    /// Entry type as reported (e.g. "DYNAMIC", "STATIC").
    #[serde(rename = "type", default)]
    pub mac_type: String,
    #[serde(default, alias = "interface", alias = "ports")]
    pub interfaces: Option<Destinations>,
}

impl MacTableEntry {
    /// Destination interfaces as a list. Missing destinations give an
    /// empty list.
    pub fn destinations(&self) -> Vec<&str> {
        match &self.interfaces {
            Some(Destinations::One(name)) => vec![name.as_str()],
            Some(Destinations::Many(names)) => names.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }
}

/// MAC address table.
pub type MacTable = Vec<MacTableEntry>;

/// One VLAN and its member interfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

/// VLAN table keyed by VLAN id (ascending iteration order).
pub type VlanTable = BTreeMap<VlanId, VlanRecord>;

/// Switchport state of one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchportInfo {
    pub interface: String,
    /// Operational (or administrative) mode, e.g. "static access", "trunk".
    pub mode: Option<String>,
}

impl SwitchportInfo {
    /// True when the reported mode mentions trunking.
    pub fn is_trunk(&self) -> bool {
        self.mode
            .as_deref()
            .is_some_and(|mode| mode.to_ascii_lowercase().contains("trunk"))
    }
}

/// Structured response of one getter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "getter", content = "data", rename_all = "snake_case")]
pub enum GetterResponse {
    Config(DeviceConfig),
    Interfaces(InterfaceTable),
    MacAddressTable(MacTable),
    Vlans(VlanTable),
    Switchport(SwitchportInfo),
}

/// Responses of a read, in getter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadResponse {
    pub responses: Vec<GetterResponse>,
}

impl ReadResponse {
    pub fn config(&self) -> Option<&DeviceConfig> {
        self.responses.iter().find_map(|r| match r {
            GetterResponse::Config(c) => Some(c),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> Option<&InterfaceTable> {
        self.responses.iter().find_map(|r| match r {
            GetterResponse::Interfaces(t) => Some(t),
            _ => None,
        })
    }

    pub fn mac_table(&self) -> Option<&MacTable> {
        self.responses.iter().find_map(|r| match r {
            GetterResponse::MacAddressTable(t) => Some(t),
            _ => None,
        })
    }

    pub fn vlans(&self) -> Option<&VlanTable> {
        self.responses.iter().find_map(|r| match r {
            GetterResponse::Vlans(t) => Some(t),
            _ => None,
        })
    }

    pub fn switchport(&self) -> Option<&SwitchportInfo> {
        self.responses.iter().find_map(|r| match r {
            GetterResponse::Switchport(s) => Some(s),
            _ => None,
        })
    }
}

/// What a write left behind on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    /// Lines pushed, in order.
    pub lines: Vec<String>,
    /// Raw device output.
    pub output: String,
}

/// Successful outcome of an operation on one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Read(ReadResponse),
    Write(WriteReport),
}

impl Payload {
    pub fn as_read(&self) -> Option<&ReadResponse> {
        match self {
            Payload::Read(r) => Some(r),
            Payload::Write(_) => None,
        }
    }

    pub fn as_write(&self) -> Option<&WriteReport> {
        match self {
            Payload::Write(w) => Some(w),
            Payload::Read(_) => None,
        }
    }
}

/// Per-device result of an executed operation.
///
/// The outcome is a `Result`, so a resolved operation always carries
/// exactly one of payload or error.
#[derive(Debug)]
pub struct OperationResult {
    pub device: String,
    pub outcome: Result<Payload, TransportError>,
}

impl OperationResult {
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&TransportError> {
        self.outcome.as_ref().err()
    }

    /// Read response, if the operation was a successful read.
    pub fn read(&self) -> Option<&ReadResponse> {
        self.payload().and_then(Payload::as_read)
    }

    pub fn into_outcome(self) -> Result<Payload, TransportError> {
        self.outcome
    }
}

/// Unified status of one switch port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortStatus {
    pub host: String,
    pub interface: String,
    pub vlan: Option<VlanId>,
    pub mac_address: Option<MacAddress>,
    pub description: String,
    pub link_state: LinkState,
}

/// A MAC address seen behind an access port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MacSighting {
    pub switch: String,
    pub interface: String,
    pub vlan: VlanId,
    pub mac_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mac_entry_accepts_single_destination() {
        let entry: MacTableEntry = serde_json::from_str(
            r#"{"mac": "300a.60a0.324b", "vlan": 10, "type": "DYNAMIC", "interface": "Gi1/0/2"}"#,
        )
        .unwrap();
        assert_eq!(entry.destinations(), vec!["Gi1/0/2"]);
        assert_eq!(entry.vlan.as_u16(), 10);
    }

    #[test]
    fn test_mac_entry_accepts_destination_list() {
        let entry: MacTableEntry = serde_json::from_str(
            r#"{"mac": "30:0a:60:a0:32:4b", "vlan": 10, "type": "STATIC", "interfaces": ["Gi1/0/2", "Gi1/0/3"]}"#,
        )
        .unwrap();
        assert_eq!(entry.destinations(), vec!["Gi1/0/2", "Gi1/0/3"]);
    }

    #[test]
    fn test_mac_entry_without_destination() {
        let entry: MacTableEntry =
            serde_json::from_str(r#"{"mac": "300a.60a0.324b", "vlan": 1, "type": "STATIC"}"#)
                .unwrap();
        assert!(entry.destinations().is_empty());
    }

    #[test]
    fn test_switchport_trunk_detection() {
        let mut info = SwitchportInfo {
            interface: "GigabitEthernet1/0/1".to_string(),
            mode: Some("Trunk".to_string()),
        };
        assert!(info.is_trunk());
        info.mode = Some("static access".to_string());
        assert!(!info.is_trunk());
        info.mode = None;
        assert!(!info.is_trunk());
    }

    #[test]
    fn test_read_response_accessors() {
        let response = ReadResponse {
            responses: vec![
                GetterResponse::Interfaces(InterfaceTable::new()),
                GetterResponse::Config(DeviceConfig {
                    running: "hostname SW1".to_string(),
                }),
            ],
        };
        assert!(response.interfaces().is_some());
        assert_eq!(response.config().unwrap().running, "hostname SW1");
        assert!(response.vlans().is_none());
        assert!(response.mac_table().is_none());
    }

    #[test]
    fn test_operation_result_exactly_one_side() {
        let ok = OperationResult {
            device: "SW1".to_string(),
            outcome: Ok(Payload::Read(ReadResponse::default())),
        };
        assert!(ok.success());
        assert!(ok.payload().is_some() && ok.error().is_none());

        let failed = OperationResult {
            device: "SW2".to_string(),
            outcome: Err(TransportError::unsupported("netconf")),
        };
        assert!(!failed.success());
        assert!(failed.payload().is_none() && failed.error().is_some());
    }
}
