//! Cisco IOS CLI commands and output parsers.

use switchctl_types::{normalize_interface, MacAddress, VlanId};

use crate::error::TransportError;
use crate::model::{
    DeviceConfig, Destinations, Getter, GetterResponse, InterfaceRecord, InterfaceTable,
    MacTable, MacTableEntry, SwitchportInfo, VlanRecord, VlanTable,
};

/// Platforms this module knows how to drive.
pub const SUPPORTED_PLATFORMS: &[&str] = &["ios", "iosxe", "cisco_ios", "cisco_xe"];

/// Error markers IOS prints when it refuses a line.
const REJECTION_MARKERS: &[&str] = &[
    "% Invalid input",
    "% Incomplete command",
    "% Ambiguous command",
    "% Bad mask",
    "% Unrecognized command",
];

/// CLI command implementing a getter.
pub fn getter_command(getter: &Getter) -> String {
    match getter {
        Getter::Config => "show running-config".to_string(),
        Getter::Interfaces => "show interfaces description".to_string(),
        Getter::MacAddressTable { address: None } => "show mac address-table".to_string(),
        Getter::MacAddressTable { address: Some(mac) } => {
            format!("show mac address-table address {}", mac.to_dotted())
        }
        Getter::Vlans => "show vlan brief".to_string(),
        Getter::Switchport { interface } => format!("show interfaces {} switchport", interface),
    }
}

/// Wraps configuration lines in a configure-terminal session script.
pub fn config_script(lines: &[String]) -> String {
    let mut script = String::from("terminal length 0\nconfigure terminal\n");
    for line in lines {
        script.push_str(line);
        script.push('\n');
    }
    script.push_str("end\n");
    script
}

/// Scans session output for lines the device refused.
pub fn check_config_output(output: &str) -> Result<(), TransportError> {
    let rejected: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| REJECTION_MARKERS.iter().any(|m| line.starts_with(m)))
        .collect();

    if rejected.is_empty() {
        Ok(())
    } else {
        Err(TransportError::Rejected {
            message: rejected.join("; "),
        })
    }
}

/// Parses the output of [`getter_command`] for `getter`.
pub fn parse_response(getter: &Getter, output: &str) -> Result<GetterResponse, TransportError> {
    Ok(match getter {
        Getter::Config => GetterResponse::Config(parse_running_config(output)),
        Getter::Interfaces => GetterResponse::Interfaces(parse_interfaces_description(output)),
        Getter::MacAddressTable { .. } => {
            GetterResponse::MacAddressTable(parse_mac_address_table(output))
        }
        Getter::Vlans => GetterResponse::Vlans(parse_vlan_brief(output)),
        Getter::Switchport { interface } => {
            GetterResponse::Switchport(parse_switchport(interface, output).ok_or_else(|| {
                TransportError::parse(getter_command(getter), "no switchport information")
            })?)
        }
    })
}

/// `show running-config`, minus the banner IOS prints before it.
pub fn parse_running_config(output: &str) -> DeviceConfig {
    let running = output
        .lines()
        .skip_while(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with("Building configuration")
        })
        .collect::<Vec<_>>()
        .join("\n");
    DeviceConfig { running }
}

/// `show interfaces description`.
///
/// ```text
/// Interface                      Status         Protocol Description
/// Gi1/0/1                        up             up       Printer
/// Gi1/0/2                        admin down     down
/// ```
pub fn parse_interfaces_description(output: &str) -> InterfaceTable {
    let mut table = InterfaceTable::new();
    let mut description_col: Option<usize> = None;

    for line in output.lines() {
        if line.starts_with("Interface") {
            description_col = line.find("Description");
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }

        let (protocol, rest_index) = if tokens[1] == "admin" && tokens.len() >= 4 {
            (tokens[3], 4)
        } else {
            (tokens[2], 3)
        };

        let description = match description_col {
            Some(col) => line.get(col..).unwrap_or("").trim().to_string(),
            None => tokens[rest_index.min(tokens.len())..].join(" "),
        };

        table.insert(
            normalize_interface(tokens[0]),
            InterfaceRecord {
                is_up: protocol.eq_ignore_ascii_case("up"),
                description,
            },
        );
    }

    table
}

/// `show mac address-table [address X]`.
///
/// ```text
/// Vlan    Mac Address       Type        Ports
/// ----    -----------       --------    -----
///   10    300a.60a0.324b    DYNAMIC     Gi1/0/2
/// ```
pub fn parse_mac_address_table(output: &str) -> MacTable {
    let mut table = MacTable::new();

    for line in output.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }
        // Header, separator and "All" (CPU) rows fall out here.
        let (Ok(vlan), Ok(mac)) = (tokens[0].parse::<VlanId>(), tokens[1].parse::<MacAddress>())
        else {
            continue;
        };

        let ports: Vec<String> = tokens[3..]
            .join(" ")
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        let interfaces = match ports.len() {
            0 => None,
            1 => ports.into_iter().next().map(Destinations::One),
            _ => Some(Destinations::Many(ports)),
        };

        table.push(MacTableEntry {
            mac,
            vlan,
            mac_type: tokens[2].to_string(),
            interfaces,
        });
    }

    table
}

/// `show vlan brief`, including port lists wrapped onto continuation lines.
///
/// ```text
/// VLAN Name                             Status    Ports
/// ---- -------------------------------- --------- -------------------------------
/// 10   USERS                            active    Gi1/0/1, Gi1/0/2,
///                                                 Gi1/0/5
/// ```
pub fn parse_vlan_brief(output: &str) -> VlanTable {
    let mut table = VlanTable::new();
    let mut current: Option<VlanId> = None;

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let starts_indented = line.starts_with(char::is_whitespace);
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let ports_text = if starts_indented {
            match current {
                Some(_) => tokens.join(" "),
                None => continue,
            }
        } else {
            match tokens[0].parse::<VlanId>() {
                Ok(id) if tokens.len() >= 3 => {
                    current = Some(id);
                    table.insert(
                        id,
                        VlanRecord {
                            name: tokens[1].to_string(),
                            interfaces: Vec::new(),
                        },
                    );
                    tokens[3..].join(" ")
                }
                _ => {
                    current = None;
                    continue;
                }
            }
        };

        if let Some(record) = current.and_then(|id| table.get_mut(&id)) {
            record.interfaces.extend(
                ports_text
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
            );
        }
    }

    table
}

/// `show interfaces X switchport`.
///
/// Prefers the operational mode; falls back to the administrative mode
/// when the port is down.
pub fn parse_switchport(interface: &str, output: &str) -> Option<SwitchportInfo> {
    let mut admin_mode = None;
    let mut oper_mode = None;
    let mut seen = false;

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Administrative Mode" => {
                admin_mode = Some(value.to_string());
                seen = true;
            }
            "Operational Mode" => {
                oper_mode = Some(value.to_string());
                seen = true;
            }
            "Switchport" => seen = true,
            _ => {}
        }
    }

    if !seen {
        return None;
    }

    let mode = match oper_mode {
        Some(mode) if mode != "down" => Some(mode),
        _ => admin_mode,
    };

    Some(SwitchportInfo {
        interface: normalize_interface(interface),
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INTERFACES: &str = "\
Interface                      Status         Protocol Description
Gi1/0/1                        up             up       Printer  room 4
Gi1/0/2                        admin down     down
Gi1/0/48                       down           down     spare
Po1                            up             up       uplink";

    const MAC_TABLE: &str = "\
          Mac Address Table
-------------------------------------------

Vlan    Mac Address       Type        Ports
----    -----------       --------    -----
 All    0100.0ccc.cccc    STATIC      CPU
  10    300a.60a0.324b    DYNAMIC     Gi1/0/2
  20    300a.60a0.324b    DYNAMIC     Po1
  30    0011.2233.4455    STATIC      Gi1/0/3, Gi1/0/4
Total Mac Addresses for this criterion: 3";

    const VLAN_BRIEF: &str = "\
VLAN Name                             Status    Ports
---- -------------------------------- --------- -------------------------------
1    default                          active    Gi1/0/3, Gi1/0/4
10   USERS                            active    Gi1/0/1, Gi1/0/2,
                                                Gi1/0/5
20   VOICE                            active
1002 fddi-default                     act/unsup";

    #[test]
    fn test_getter_commands() {
        let mac: MacAddress = "300a.60a0.324b".parse().unwrap();
        assert_eq!(
            getter_command(&Getter::MacAddressTable { address: Some(mac) }),
            "show mac address-table address 300a.60a0.324b"
        );
        assert_eq!(
            getter_command(&Getter::Switchport {
                interface: "GigabitEthernet1/0/1".to_string()
            }),
            "show interfaces GigabitEthernet1/0/1 switchport"
        );
        assert_eq!(getter_command(&Getter::Config), "show running-config");
    }

    #[test]
    fn test_config_script_keeps_order() {
        let lines = vec![
            "interface GigabitEthernet1/0/48".to_string(),
            "switchport access vlan 10".to_string(),
            "exit".to_string(),
        ];
        assert_eq!(
            config_script(&lines),
            "terminal length 0\nconfigure terminal\ninterface GigabitEthernet1/0/48\nswitchport access vlan 10\nexit\nend\n"
        );
    }

    #[test]
    fn test_check_config_output_rejection() {
        let output = "SW1(config)#interface Gi1/0/99\n                   ^\n% Invalid input detected at '^' marker.\n";
        match check_config_output(output) {
            Err(TransportError::Rejected { message }) => {
                assert!(message.starts_with("% Invalid input"))
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
        assert!(check_config_output("SW1(config-if)#exit\nSW1#").is_ok());
    }

    #[test]
    fn test_parse_running_config_strips_banner() {
        let config = parse_running_config("Building configuration...\n\nCurrent configuration : 10 bytes\n!\nhostname SW1");
        assert_eq!(
            config.running,
            "Current configuration : 10 bytes\n!\nhostname SW1"
        );
    }

    #[test]
    fn test_parse_interfaces_description() {
        let table = parse_interfaces_description(INTERFACES);
        assert_eq!(table.len(), 4);

        let gi1 = &table["GigabitEthernet1/0/1"];
        assert!(gi1.is_up);
        assert_eq!(gi1.description, "Printer  room 4");

        let gi2 = &table["GigabitEthernet1/0/2"];
        assert!(!gi2.is_up);
        assert_eq!(gi2.description, "");

        assert_eq!(table["GigabitEthernet1/0/48"].description, "spare");
        assert!(table["Port-channel1"].is_up);
    }

    #[test]
    fn test_parse_mac_address_table() {
        let table = parse_mac_address_table(MAC_TABLE);
        assert_eq!(table.len(), 3);

        assert_eq!(table[0].vlan.as_u16(), 10);
        assert_eq!(table[0].mac_type, "DYNAMIC");
        assert_eq!(table[0].destinations(), vec!["Gi1/0/2"]);

        assert_eq!(table[1].destinations(), vec!["Po1"]);
        assert_eq!(table[2].destinations(), vec!["Gi1/0/3", "Gi1/0/4"]);
    }

    #[test]
    fn test_parse_vlan_brief_with_continuation() {
        let table = parse_vlan_brief(VLAN_BRIEF);
        let users = &table[&VlanId::new(10).unwrap()];
        assert_eq!(users.name, "USERS");
        assert_eq!(users.interfaces, vec!["Gi1/0/1", "Gi1/0/2", "Gi1/0/5"]);

        assert!(table[&VlanId::new(20).unwrap()].interfaces.is_empty());
        assert_eq!(
            table[&VlanId::new(1).unwrap()].interfaces,
            vec!["Gi1/0/3", "Gi1/0/4"]
        );
        assert!(table.contains_key(&VlanId::new(1002).unwrap()));
    }

    #[test]
    fn test_parse_switchport_access() {
        let output = "\
Name: Gi1/0/2
Switchport: Enabled
Administrative Mode: static access
Operational Mode: static access
Access Mode VLAN: 10 (USERS)";
        let info = parse_switchport("Gi1/0/2", output).unwrap();
        assert_eq!(info.interface, "GigabitEthernet1/0/2");
        assert_eq!(info.mode.as_deref(), Some("static access"));
        assert!(!info.is_trunk());
    }

    #[test]
    fn test_parse_switchport_down_uses_admin_mode() {
        let output = "\
Name: Gi1/0/1
Switchport: Enabled
Administrative Mode: trunk
Operational Mode: down";
        let info = parse_switchport("Gi1/0/1", output).unwrap();
        assert!(info.is_trunk());
    }

    #[test]
    fn test_parse_switchport_garbage() {
        assert!(parse_switchport("Gi1/0/1", "% Invalid input detected").is_none());
        let err = parse_response(
            &Getter::Switchport {
                interface: "Gi1/0/1".to_string(),
            },
            "",
        );
        assert!(matches!(err, Err(TransportError::Parse { .. })));
    }
}
