//! Configuration line builders for port operations.

use switchctl_types::VlanId;

/// Enter interface configuration mode.
pub const INTERFACE_CMD: &str = "interface";

/// Leave interface configuration mode.
pub const EXIT_CMD: &str = "exit";

/// Build the interface-mode line for `interface`.
pub fn build_interface_line(interface: &str) -> String {
    format!("{} {}", INTERFACE_CMD, interface)
}

/// Build the access VLAN assignment line.
pub fn build_access_vlan_line(vlan: VlanId) -> String {
    format!("switchport access vlan {}", vlan)
}

/// Build the port description line.
pub fn build_description_line(description: &str) -> String {
    format!("description {}", description)
}

/// Build the ordered lines that move an access port to a new VLAN.
///
/// The description line is only emitted when a non-empty description is
/// given.
pub fn build_change_vlan_lines(
    interface: &str,
    vlan: VlanId,
    description: Option<&str>,
) -> Vec<String> {
    let mut lines = vec![
        build_interface_line(interface),
        build_access_vlan_line(vlan),
    ];
    if let Some(desc) = description.filter(|d| !d.is_empty()) {
        lines.push(build_description_line(desc));
    }
    lines.push(EXIT_CMD.to_string());
    lines
}

/// True when `value` is safe to embed in a single configuration line.
pub fn is_single_line(value: &str) -> bool {
    !value.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vlan(id: u16) -> VlanId {
        VlanId::new(id).unwrap()
    }

    #[test]
    fn test_change_vlan_lines() {
        let lines = build_change_vlan_lines("GigabitEthernet1/0/48", vlan(10), None);
        assert_eq!(
            lines,
            vec![
                "interface GigabitEthernet1/0/48",
                "switchport access vlan 10",
                "exit",
            ]
        );
    }

    #[test]
    fn test_change_vlan_lines_with_description() {
        let lines = build_change_vlan_lines("Gi1/0/2", vlan(20), Some("Printer room 4"));
        assert_eq!(
            lines,
            vec![
                "interface Gi1/0/2",
                "switchport access vlan 20",
                "description Printer room 4",
                "exit",
            ]
        );
    }

    #[test]
    fn test_empty_description_is_skipped() {
        let lines = build_change_vlan_lines("Gi1/0/2", vlan(20), Some(""));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_is_single_line() {
        assert!(is_single_line("GigabitEthernet1/0/48"));
        assert!(is_single_line("Printer room 4"));
        assert!(!is_single_line("Gi1/0/1\nshutdown"));
        assert!(!is_single_line("desc\r"));
    }
}
