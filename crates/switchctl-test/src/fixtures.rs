//! Test fixtures for fleet scenarios
//!
//! Provides reusable switch definitions for exercising the fleet service

use std::collections::HashMap;
use std::time::Duration;

use switchctl_core::{
    normalize_interface, Destinations, Device, InterfaceRecord, InterfaceTable, MacAddress,
    MacTable, MacTableEntry, VlanId, VlanRecord, VlanTable,
};

/// MAC address used by the locate scenarios
pub const HOST_MAC: &str = "300a.60a0.324b";

/// Everything a fake switch answers with
#[derive(Debug, Clone)]
pub struct SwitchFixture {
    /// Inventory record
    pub device: Device,
    /// Running configuration text
    pub running_config: String,
    /// Interface table
    pub interfaces: InterfaceTable,
    /// MAC address table
    pub mac_table: MacTable,
    /// VLAN table
    pub vlans: VlanTable,
    /// Switchport mode per canonical interface name
    pub switchport_modes: HashMap<String, String>,
    /// Error text returned for every getter
    pub read_failure: Option<String>,
    /// Error text returned for every config push
    pub write_failure: Option<String>,
    /// Interfaces whose switchport query fails
    pub switchport_failures: Vec<String>,
    /// Added latency per call
    pub delay: Option<Duration>,
}

impl SwitchFixture {
    /// Create a switch with an empty state
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            device: Device::new(name, address),
            running_config: String::new(),
            interfaces: InterfaceTable::new(),
            mac_table: MacTable::new(),
            vlans: VlanTable::new(),
            switchport_modes: HashMap::new(),
            read_failure: None,
            write_failure: None,
            switchport_failures: Vec::new(),
            delay: None,
        }
    }

    /// Set the running configuration
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.running_config = config.into();
        self
    }

    /// Add an interface
    pub fn with_interface(mut self, name: &str, is_up: bool, description: &str) -> Self {
        self.interfaces.insert(
            name.to_string(),
            InterfaceRecord {
                is_up,
                description: description.to_string(),
            },
        );
        self
    }

    /// Add a MAC table entry with a single destination port
    pub fn with_mac(self, mac: &str, vlan: u16, interface: &str) -> Self {
        self.with_mac_entry(mac, vlan, Some(Destinations::One(interface.to_string())))
    }

    /// Add a MAC table entry with an arbitrary destination shape
    pub fn with_mac_entry(
        mut self,
        mac: &str,
        vlan: u16,
        interfaces: Option<Destinations>,
    ) -> Self {
        self.mac_table.push(MacTableEntry {
            mac: parse_mac(mac),
            vlan: vlan_id(vlan),
            mac_type: "DYNAMIC".to_string(),
            interfaces,
        });
        self
    }

    /// Add a VLAN with its member ports
    pub fn with_vlan(mut self, vlan: u16, name: &str, members: &[&str]) -> Self {
        self.vlans.insert(
            vlan_id(vlan),
            VlanRecord {
                name: name.to_string(),
                interfaces: members.iter().map(|m| m.to_string()).collect(),
            },
        );
        self
    }

    /// Set the switchport mode of an interface
    pub fn with_switchport(mut self, interface: &str, mode: &str) -> Self {
        self.switchport_modes
            .insert(normalize_interface(interface), mode.to_string());
        self
    }

    /// Make every getter fail
    pub fn unreachable(mut self) -> Self {
        self.read_failure = Some(format!(
            "ssh: connect to host {} port 22: Connection timed out",
            self.device.address
        ));
        self
    }

    /// Make every config push fail
    pub fn rejecting_writes(mut self, message: impl Into<String>) -> Self {
        self.write_failure = Some(message.into());
        self
    }

    /// Make the switchport query of one interface fail
    pub fn failing_switchport(mut self, interface: &str) -> Self {
        self.switchport_failures.push(normalize_interface(interface));
        self
    }

    /// Delay every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Parse a MAC address in any accepted notation
pub fn parse_mac(mac: &str) -> MacAddress {
    mac.parse().expect("Invalid MAC address in fixture")
}

/// Build a VLAN id
pub fn vlan_id(vlan: u16) -> VlanId {
    VlanId::new(vlan).expect("Invalid VLAN id in fixture")
}

/// Common switch fixtures
pub mod switch_fixtures {
    use super::*;

    /// Access switch with a printer on Gi1/0/2 and an uplink trunk
    pub fn access_switch(name: &str, address: &str) -> SwitchFixture {
        SwitchFixture::new(name, address)
            .with_config(format!(
                "version 15.2\nhostname {}\n!\ninterface GigabitEthernet1/0/2\n switchport access vlan 10\n!\nend",
                name
            ))
            .with_interface("GigabitEthernet1/0/1", true, "uplink")
            .with_interface("GigabitEthernet1/0/2", true, "Printer room 4")
            .with_interface("GigabitEthernet1/0/48", false, "")
            .with_interface("Port-channel1", true, "to core")
            .with_vlan(1, "default", &["Gi1/0/48"])
            .with_vlan(10, "users", &["Gi1/0/2"])
            .with_switchport("Gi1/0/1", "trunk")
            .with_switchport("Gi1/0/2", "static access")
            .with_switchport("Gi1/0/48", "static access")
    }

    /// Switch that learned `mac` only over a port-channel
    pub fn aggregate_sighting(name: &str, address: &str, mac: &str) -> SwitchFixture {
        access_switch(name, address).with_mac(mac, 10, "Port-channel1")
    }

    /// Switch that learned `mac` over its trunk uplink
    pub fn trunk_sighting(name: &str, address: &str, mac: &str) -> SwitchFixture {
        access_switch(name, address).with_mac(mac, 10, "Gi1/0/1")
    }

    /// Switch with `mac` attached to access port Gi1/0/2
    pub fn access_sighting(name: &str, address: &str, mac: &str) -> SwitchFixture {
        access_switch(name, address).with_mac(mac, 10, "Gi1/0/2")
    }
}

/// Four-switch fleet used by the locate scenarios
///
/// - SW1 sees [`HOST_MAC`] on Port-channel1
/// - SW2 sees it on its trunk Gi1/0/1
/// - SW3 has it on access port Gi1/0/2
/// - SW4 is unreachable
pub fn locate_fleet() -> Vec<SwitchFixture> {
    use switch_fixtures::*;

    vec![
        aggregate_sighting("SW1", "172.17.57.240", HOST_MAC),
        trunk_sighting("SW2", "172.17.57.241", HOST_MAC),
        access_sighting("SW3", "172.17.57.242", HOST_MAC),
        access_switch("SW4", "172.17.57.243").unreachable(),
    ]
}
