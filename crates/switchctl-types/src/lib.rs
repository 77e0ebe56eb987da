//! Switch primitives shared across the switchctl workspace.
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses, including the Cisco
//!   dotted `xxxx.yyyy.zzzz` notation switches print in their MAC tables
//! - [`VlanId`]: IEEE 802.1Q VLAN identifiers
//! - [`InterfaceName`] and [`normalize_interface`]: vendor shorthand
//!   interface names expanded to their canonical long form
//! - [`LinkState`]: operational up/down state of a port

mod interface;
mod mac;
mod vlan;

pub use interface::{is_aggregate_interface, normalize_interface, InterfaceName, LinkState};
pub use mac::MacAddress;
pub use vlan::VlanId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(String),
}
