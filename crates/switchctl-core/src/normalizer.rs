//! Builds a unified port view out of the per-getter tables.

use switchctl_types::{InterfaceName, VlanId};

use crate::error::{CoreError, CoreResult};
use crate::model::{InterfaceTable, MacTable, PortStatus, VlanTable};

/// Assembles the [`PortStatus`] of `target` on `host`.
///
/// The target may be given in shorthand; every table is matched on the
/// canonical name. VLAN resolution prefers a MAC table entry on the port,
/// then the lowest VLAN listing the port as a member, and otherwise
/// leaves the VLAN unset.
pub fn build_port_status(
    host: &str,
    interfaces: &InterfaceTable,
    mac_table: &MacTable,
    vlans: &VlanTable,
    target: &str,
) -> CoreResult<PortStatus> {
    let name = InterfaceName::parse(target);

    let record = interfaces
        .iter()
        .find(|(reported, _)| name.matches(reported))
        .map(|(_, record)| record)
        .ok_or_else(|| CoreError::InterfaceNotFound {
            host: host.to_string(),
            interface: name.canonical().to_string(),
        })?;

    let mac_entry = mac_table
        .iter()
        .find(|entry| entry.destinations().iter().any(|d| name.matches(d)));

    let vlan = match mac_entry {
        Some(entry) => Some(entry.vlan),
        None => vlan_membership(vlans, &name),
    };

    Ok(PortStatus {
        host: host.to_string(),
        interface: name.canonical().to_string(),
        vlan,
        mac_address: mac_entry.map(|entry| entry.mac),
        description: record.description.clone(),
        link_state: record.link_state(),
    })
}

fn vlan_membership(vlans: &VlanTable, name: &InterfaceName) -> Option<VlanId> {
    vlans
        .iter()
        .find(|(_, record)| record.interfaces.iter().any(|m| name.matches(m)))
        .map(|(id, _)| *id)
}
