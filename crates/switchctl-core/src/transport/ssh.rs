//! CLI transport over the system ssh client.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{ios, Transport};
use crate::error::TransportError;
use crate::model::{Device, Getter, GetterResponse};
use crate::shell::{self, shellquote};

/// Path to the ssh client.
pub const SSH_CMD: &str = "/usr/bin/ssh";

/// Connection parameters shared by every device session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshOptions {
    /// ssh client binary.
    pub binary: String,
    /// Login user; the client default applies when unset.
    pub username: Option<String>,
    pub port: u16,
    pub connect_timeout: Duration,
    pub strict_host_key_checking: bool,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            binary: SSH_CMD.to_string(),
            username: None,
            port: 22,
            connect_timeout: Duration::from_secs(10),
            strict_host_key_checking: true,
        }
    }
}

/// Runs IOS CLI commands through non-interactive ssh sessions.
///
/// Authentication is left to the ssh client (keys, agent, ssh_config);
/// sessions run in batch mode and never prompt.
#[derive(Debug, Clone, Default)]
pub struct SshCliTransport {
    options: SshOptions,
}

impl SshCliTransport {
    pub fn new(options: SshOptions) -> Self {
        Self { options }
    }

    fn destination(&self, device: &Device) -> String {
        match &self.options.username {
            Some(user) => format!("{}@{}", user, device.address),
            None => device.address.clone(),
        }
    }

    fn base_command(&self, device: &Device) -> String {
        format!(
            "{} -o BatchMode=yes -o ConnectTimeout={} -o StrictHostKeyChecking={} -p {} {}",
            self.options.binary,
            self.options.connect_timeout.as_secs().max(1),
            if self.options.strict_host_key_checking {
                "yes"
            } else {
                "no"
            },
            self.options.port,
            shellquote(&self.destination(device)),
        )
    }

    /// Command line running a single remote CLI command.
    pub fn build_exec_cmd(&self, device: &Device, remote: &str) -> String {
        format!("{} {}", self.base_command(device), shellquote(remote))
    }

    /// Command line opening a session that reads commands from stdin.
    pub fn build_session_cmd(&self, device: &Device) -> String {
        format!("{} -T", self.base_command(device))
    }

    fn check_platform(device: &Device) -> Result<(), TransportError> {
        match device.platform.as_deref() {
            None => Ok(()),
            Some(p) if ios::SUPPORTED_PLATFORMS.contains(&p.to_ascii_lowercase().as_str()) => Ok(()),
            Some(p) => Err(TransportError::unsupported(format!(
                "platform '{}' on {}",
                p, device.name
            ))),
        }
    }
}

#[async_trait]
impl Transport for SshCliTransport {
    #[instrument(skip(self, device, getter), fields(device = %device.name, getter = getter.name()))]
    async fn get(&self, device: &Device, getter: &Getter) -> Result<GetterResponse, TransportError> {
        Self::check_platform(device)?;

        let remote = ios::getter_command(getter);
        let cmd = self.build_exec_cmd(device, &remote);
        let output = shell::exec_or_fail(&cmd, None).await?;
        debug!(bytes = output.len(), "Getter output received");

        ios::parse_response(getter, &output)
    }

    #[instrument(skip(self, device, lines), fields(device = %device.name, lines = lines.len()))]
    async fn push_config(
        &self,
        device: &Device,
        lines: &[String],
    ) -> Result<String, TransportError> {
        Self::check_platform(device)?;

        let script = ios::config_script(lines);
        let cmd = self.build_session_cmd(device);
        let output = shell::exec_or_fail(&cmd, Some(&script)).await?;
        ios::check_config_output(&output)?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SshOptions {
        SshOptions {
            username: Some("netops".to_string()),
            ..SshOptions::default()
        }
    }

    #[test]
    fn test_build_exec_cmd() {
        let transport = SshCliTransport::new(options());
        let device = Device::new("SW1", "172.17.57.240");
        let cmd = transport.build_exec_cmd(&device, "show vlan brief");
        assert_eq!(
            cmd,
            "/usr/bin/ssh -o BatchMode=yes -o ConnectTimeout=10 -o StrictHostKeyChecking=yes -p 22 \"netops@172.17.57.240\" \"show vlan brief\""
        );
    }

    #[test]
    fn test_build_session_cmd_without_user() {
        let transport = SshCliTransport::default();
        let cmd = transport.build_session_cmd(&Device::new("SW1", "sw1.example.net"));
        assert!(cmd.ends_with("\"sw1.example.net\" -T"));
    }

    #[test]
    fn test_address_is_quoted() {
        let transport = SshCliTransport::new(options());
        let cmd = transport.build_exec_cmd(&Device::new("evil", "$(reboot)"), "show clock");
        assert!(cmd.contains("\"netops@\\$(reboot)\""));
    }

    #[test]
    fn test_platform_check() {
        assert!(SshCliTransport::check_platform(&Device::new("a", "b")).is_ok());
        assert!(
            SshCliTransport::check_platform(&Device::new("a", "b").with_platform("IOS")).is_ok()
        );
        assert!(matches!(
            SshCliTransport::check_platform(&Device::new("a", "b").with_platform("junos")),
            Err(TransportError::Unsupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_surfaces_client_failure() {
        // `false` stands in for an ssh client that cannot connect.
        let transport = SshCliTransport::new(SshOptions {
            binary: "false".to_string(),
            ..SshOptions::default()
        });
        let result = transport
            .get(&Device::new("SW1", "10.0.0.1"), &Getter::Vlans)
            .await;
        assert!(matches!(result, Err(TransportError::CommandFailed { .. })));
    }
}
