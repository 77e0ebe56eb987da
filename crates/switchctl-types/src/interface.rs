//! Interface naming and port state.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alphabetic prefix followed by a port path such as `1/0/48` or `0.100`.
static SHORTHAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)([0-9/.]+)$").expect("Invalid regex pattern"));

/// Lowercased shorthand prefix -> canonical interface type.
const INTERFACE_PREFIXES: &[(&str, &str)] = &[
    ("gi", "GigabitEthernet"),
    ("fa", "FastEthernet"),
    ("te", "TenGigabitEthernet"),
    ("fo", "FortyGigabitEthernet"),
    ("hu", "HundredGigabitEthernet"),
    ("eth", "Ethernet"),
    ("lo", "Loopback"),
    ("po", "Port-channel"),
    ("vl", "Vlan"),
    ("se", "Serial"),
    ("tu", "Tunnel"),
];

/// Expands a vendor shorthand interface name to its canonical long form.
///
/// Names that are already canonical, or that do not fit the
/// `<letters><digits/slashes/dots>` shape, come back unchanged, so the
/// function is total and idempotent.
///
/// ```
/// use switchctl_types::normalize_interface;
///
/// assert_eq!(normalize_interface("gi1/0/48"), "GigabitEthernet1/0/48");
/// assert_eq!(normalize_interface("Po12"), "Port-channel12");
/// assert_eq!(normalize_interface("GigabitEthernet1/0/48"), "GigabitEthernet1/0/48");
/// assert_eq!(normalize_interface("Xy9"), "Xy9");
/// ```
pub fn normalize_interface(raw: &str) -> String {
    let Some(caps) = SHORTHAND_RE.captures(raw) else {
        return raw.to_string();
    };

    let prefix = caps[1].to_ascii_lowercase();
    INTERFACE_PREFIXES
        .iter()
        .find(|(short, _)| *short == prefix)
        .map(|(_, full)| format!("{}{}", full, &caps[2]))
        .unwrap_or_else(|| raw.to_string())
}

/// Returns true for port-channel (aggregate) interfaces in either form.
///
/// The `po` prefix check also covers the long `Port-channel` spelling.
pub fn is_aggregate_interface(name: &str) -> bool {
    name.trim().to_ascii_lowercase().starts_with("po")
}

/// An interface reference in canonical form, compared against device
/// output in any spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceName {
    canonical: String,
}

impl InterfaceName {
    /// Normalizes `raw` to its canonical form.
    pub fn parse(raw: &str) -> Self {
        Self {
            canonical: normalize_interface(raw.trim()),
        }
    }

    /// Canonical long-form name.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// True if `other` names the same interface, in any spelling.
    pub fn matches(&self, other: &str) -> bool {
        normalize_interface(other.trim()).eq_ignore_ascii_case(&self.canonical)
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Operational link state of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    /// Link is up.
    Up,
    /// Link is down (default for unknown ports).
    #[default]
    Down,
}

impl LinkState {
    /// Link state from an `is_up` flag.
    pub const fn from_up(is_up: bool) -> Self {
        if is_up {
            LinkState::Up
        } else {
            LinkState::Down
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkState::Up => "up",
            LinkState::Down => "down",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expands_every_known_prefix() {
        let cases = [
            ("gi1/0/48", "GigabitEthernet1/0/48"),
            ("Gi1/0/1", "GigabitEthernet1/0/1"),
            ("fa0/1", "FastEthernet0/1"),
            ("Te1/1/1", "TenGigabitEthernet1/1/1"),
            ("fo1/0/49", "FortyGigabitEthernet1/0/49"),
            ("Hu1/0/1", "HundredGigabitEthernet1/0/1"),
            ("eth1/1", "Ethernet1/1"),
            ("lo0", "Loopback0"),
            ("Po12", "Port-channel12"),
            ("vl10", "Vlan10"),
            ("Se0/0/0", "Serial0/0/0"),
            ("tu100", "Tunnel100"),
            ("Gi1/0/1.100", "GigabitEthernet1/0/1.100"),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_interface(raw), expected, "input {raw}");
        }
    }

    #[test]
    fn test_unknown_or_malformed_passes_through() {
        assert_eq!(normalize_interface("Xy9"), "Xy9");
        assert_eq!(normalize_interface("Port-channel1"), "Port-channel1");
        assert_eq!(normalize_interface("gi"), "gi");
        assert_eq!(normalize_interface("1/0/1"), "1/0/1");
        assert_eq!(normalize_interface(""), "");
        assert_eq!(normalize_interface("gi 1/0/1"), "gi 1/0/1");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "gi1/0/48",
            "GigabitEthernet1/0/48",
            "fa0/1",
            "te1/1/1",
            "fo1/0/49",
            "hu1/0/1",
            "eth1/1",
            "Ethernet1/1",
            "lo0",
            "Loopback0",
            "po1",
            "Port-channel1",
            "vl10",
            "Vlan10",
            "se0/0",
            "tu1",
            "Xy9",
            "mgmt0",
            "",
            "CPU",
        ];
        for raw in samples {
            let once = normalize_interface(raw);
            assert_eq!(normalize_interface(&once), once, "input {raw}");
        }
    }

    #[test]
    fn test_interface_name_is_canonical() {
        let name = InterfaceName::parse(" Gi1/0/2 ");
        assert_eq!(name.canonical(), "GigabitEthernet1/0/2");
        assert_eq!(name, InterfaceName::parse("GigabitEthernet1/0/2"));
        assert_eq!(name.to_string(), "GigabitEthernet1/0/2");
    }

    #[test]
    fn test_interface_name_matches_any_spelling() {
        let name = InterfaceName::parse("gi1/0/2");
        assert!(name.matches("Gi1/0/2"));
        assert!(name.matches("GigabitEthernet1/0/2"));
        assert!(!name.matches("Gi1/0/20"));
    }

    #[test]
    fn test_aggregate_detection() {
        assert!(is_aggregate_interface("Po1"));
        assert!(is_aggregate_interface("port-channel10"));
        assert!(is_aggregate_interface("Port-channel1"));
        assert!(!is_aggregate_interface("Gi1/0/1"));
    }

    #[test]
    fn test_link_state() {
        assert_eq!(LinkState::from_up(true), LinkState::Up);
        assert_eq!(LinkState::from_up(false), LinkState::Down);
        assert_eq!(LinkState::Up.to_string(), "up");
    }
}
