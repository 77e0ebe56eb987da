//! In-memory transport serving [`SwitchFixture`]s
//!
//! Every call is recorded so tests can assert on what reached the
//! devices, the same way the daemons capture shell commands in mock mode.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use switchctl_core::{
    normalize_interface, Device, DeviceConfig, Executor, ExecutorOptions, FleetService, Getter,
    GetterResponse, StaticInventory, SwitchportInfo, Transport, TransportError,
};

use crate::fixtures::SwitchFixture;

/// A getter call seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCall {
    pub device: String,
    pub getter: Getter,
}

/// A configuration push seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCall {
    pub device: String,
    pub lines: Vec<String>,
}

/// Transport answering from fixtures instead of real switches
#[derive(Debug, Default)]
pub struct FakeTransport {
    switches: HashMap<(String, String), SwitchFixture>,
    gets: Mutex<Vec<GetCall>>,
    pushes: Mutex<Vec<PushCall>>,
}

impl FakeTransport {
    /// Create a transport serving the given switches
    pub fn new(switches: impl IntoIterator<Item = SwitchFixture>) -> Self {
        Self {
            switches: switches
                .into_iter()
                .map(|s| ((s.device.name.clone(), s.device.address.clone()), s))
                .collect(),
            ..Default::default()
        }
    }

    /// Getter calls received so far
    pub fn get_calls(&self) -> Vec<GetCall> {
        self.gets.lock().clone()
    }

    /// Configuration pushes received so far
    pub fn push_calls(&self) -> Vec<PushCall> {
        self.pushes.lock().clone()
    }

    /// Number of getter calls of one kind
    pub fn count_gets(&self, getter_name: &str) -> usize {
        self.gets
            .lock()
            .iter()
            .filter(|c| c.getter.name() == getter_name)
            .count()
    }

    fn switch(&self, device: &Device) -> Result<&SwitchFixture, TransportError> {
        self.switches
            .get(&(device.name.clone(), device.address.clone()))
            .ok_or_else(|| TransportError::Rejected {
                message: format!("no such device: {}", device.name),
            })
    }

    async fn pause(switch: &SwitchFixture) {
        if let Some(delay) = switch.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, device: &Device, getter: &Getter) -> Result<GetterResponse, TransportError> {
        self.gets.lock().push(GetCall {
            device: device.name.clone(),
            getter: getter.clone(),
        });

        let switch = self.switch(device)?;
        Self::pause(switch).await;

        if let Some(message) = &switch.read_failure {
            return Err(TransportError::CommandFailed {
                command: getter.name().to_string(),
                exit_code: 255,
                output: message.clone(),
            });
        }

        let response = match getter {
            Getter::Config => GetterResponse::Config(DeviceConfig {
                running: switch.running_config.clone(),
            }),
            Getter::Interfaces => GetterResponse::Interfaces(switch.interfaces.clone()),
            Getter::MacAddressTable { address } => GetterResponse::MacAddressTable(
                switch
                    .mac_table
                    .iter()
                    .filter(|e| address.map_or(true, |a| a == e.mac))
                    .cloned()
                    .collect(),
            ),
            Getter::Vlans => GetterResponse::Vlans(switch.vlans.clone()),
            Getter::Switchport { interface } => {
                let canonical = normalize_interface(interface);
                if switch.switchport_failures.contains(&canonical) {
                    return Err(TransportError::parse(
                        format!("show interfaces {} switchport", interface),
                        "session dropped",
                    ));
                }
                GetterResponse::Switchport(SwitchportInfo {
                    mode: switch.switchport_modes.get(&canonical).cloned(),
                    interface: canonical,
                })
            }
        };

        Ok(response)
    }

    async fn push_config(
        &self,
        device: &Device,
        lines: &[String],
    ) -> Result<String, TransportError> {
        let switch = self.switch(device)?;
        Self::pause(switch).await;

        if let Some(message) = &switch.write_failure {
            return Err(TransportError::Rejected {
                message: message.clone(),
            });
        }

        self.pushes.lock().push(PushCall {
            device: device.name.clone(),
            lines: lines.to_vec(),
        });
        Ok(format!("{}(config)#end", device.name))
    }
}

/// Fleet service wired to a [`FakeTransport`] over the given switches
///
/// Returns the transport too, for asserting on recorded calls.
pub fn fake_fleet(
    switches: Vec<SwitchFixture>,
    options: ExecutorOptions,
) -> (FleetService, Arc<FakeTransport>) {
    let devices = switches.iter().map(|s| s.device.clone()).collect();
    let transport = Arc::new(FakeTransport::new(switches));
    let executor = Executor::new(Arc::clone(&transport) as Arc<dyn Transport>, options);
    let service = FleetService::new(Arc::new(StaticInventory::new(devices)), executor);
    (service, transport)
}
