//! Concurrent dispatch of one operation across a device set.
//!
//! Every device runs in its own task, bounded by a semaphore and a
//! per-device timeout. Failures stay with the device that produced them:
//! the caller always gets one [`OperationResult`] per requested device.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::error::TransportError;
use crate::model::{Device, Operation, OperationResult, Payload, ReadResponse, WriteReport};
use crate::transport::Transport;

/// Default per-device timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of devices contacted at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

/// Executor tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorOptions {
    pub timeout: Duration,
    pub max_concurrency: usize,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Runs operations against many devices at once.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    options: ExecutorOptions,
    permits: Arc<Semaphore>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, options: ExecutorOptions) -> Self {
        let permits = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
        Self {
            transport,
            options,
            permits,
        }
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Executes `op` on every device, returning one result per device.
    ///
    /// Results are keyed by the device itself, so two devices sharing a
    /// name still get separate entries.
    ///
    /// A device that fails, times out or panics yields an error entry;
    /// it never affects the other entries.
    #[instrument(skip(self, devices, op), fields(op = op.kind(), devices = devices.len()))]
    pub async fn execute(
        &self,
        devices: &[&Device],
        op: &Operation,
    ) -> BTreeMap<Device, OperationResult> {
        let mut handles = Vec::with_capacity(devices.len());

        for device in devices {
            let key = (*device).clone();
            let device = key.clone();
            let op = op.clone();
            let transport = Arc::clone(&self.transport);
            let permits = Arc::clone(&self.permits);
            let timeout = self.options.timeout;

            let handle = tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| TransportError::Aborted {
                        message: e.to_string(),
                    })?;
                match tokio::time::timeout(timeout, perform(transport.as_ref(), &device, &op)).await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(TransportError::Timeout { after: timeout }),
                }
            });
            handles.push((key, handle));
        }

        let mut results = BTreeMap::new();
        for (device, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(TransportError::Aborted {
                    message: e.to_string(),
                }),
            };

            match &outcome {
                Ok(_) => debug!(device = %device.name, "Operation succeeded"),
                Err(e) => warn!(
                    device = %device.name,
                    address = %device.address,
                    error = %e,
                    "Operation failed"
                ),
            }

            let result = OperationResult {
                device: device.name.clone(),
                outcome,
            };
            results.insert(device, result);
        }

        results
    }
}

/// Runs one operation against one device.
///
/// Getters of a read run in order; the first failure fails the read.
async fn perform(
    transport: &dyn Transport,
    device: &Device,
    op: &Operation,
) -> Result<Payload, TransportError> {
    match op {
        Operation::Read(read) => {
            let mut responses = Vec::with_capacity(read.getters().len());
            for getter in read.getters() {
                responses.push(transport.get(device, getter).await?);
            }
            Ok(Payload::Read(ReadResponse { responses }))
        }
        Operation::Write(write) => {
            let output = transport.push_config(device, write.lines()).await?;
            Ok(Payload::Write(WriteReport {
                lines: write.lines().to_vec(),
                output,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceConfig, Getter, GetterResponse};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves a config to every device, failing or stalling selected ones.
    #[derive(Default)]
    struct StubTransport {
        failing: Vec<String>,
        stalled: Vec<String>,
        pushed: Mutex<Vec<(String, Vec<String>)>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(
            &self,
            device: &Device,
            _getter: &Getter,
        ) -> Result<GetterResponse, TransportError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.stalled.contains(&device.name) {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            if self.failing.contains(&device.name) {
                return Err(TransportError::Rejected {
                    message: "authentication failed".to_string(),
                });
            }
            Ok(GetterResponse::Config(DeviceConfig {
                running: format!("hostname {}", device.name),
            }))
        }

        async fn push_config(
            &self,
            device: &Device,
            lines: &[String],
        ) -> Result<String, TransportError> {
            self.pushed
                .lock()
                .unwrap()
                .push((device.name.clone(), lines.to_vec()));
            Ok(String::new())
        }
    }

    fn result_for<'a>(
        results: &'a BTreeMap<Device, OperationResult>,
        name: &str,
    ) -> &'a OperationResult {
        results
            .iter()
            .find(|(device, _)| device.name == name)
            .map(|(_, result)| result)
            .unwrap()
    }

    fn fleet(n: usize) -> Vec<Device> {
        (1..=n)
            .map(|i| Device::new(format!("SW{}", i), format!("10.0.0.{}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let transport = Arc::new(StubTransport {
            failing: vec!["SW2".to_string(), "SW4".to_string()],
            ..Default::default()
        });
        let executor = Executor::new(transport, ExecutorOptions::default());
        let devices = fleet(5);
        let refs: Vec<&Device> = devices.iter().collect();

        let results = executor
            .execute(&refs, &Operation::read([Getter::Config]))
            .await;

        assert_eq!(results.len(), 5);
        assert_eq!(results.values().filter(|r| !r.success()).count(), 2);
        assert!(!result_for(&results, "SW2").success());
        assert_eq!(
            result_for(&results, "SW3").read().unwrap().config().unwrap().running,
            "hostname SW3"
        );
    }

    #[tokio::test]
    async fn test_timeout_marks_only_slow_device() {
        let transport = Arc::new(StubTransport {
            stalled: vec!["SW1".to_string()],
            ..Default::default()
        });
        let executor = Executor::new(
            transport,
            ExecutorOptions {
                timeout: Duration::from_millis(200),
                ..Default::default()
            },
        );
        let devices = fleet(2);
        let refs: Vec<&Device> = devices.iter().collect();

        let results = executor
            .execute(&refs, &Operation::read([Getter::Config]))
            .await;

        assert!(matches!(
            result_for(&results, "SW1").error(),
            Some(TransportError::Timeout { .. })
        ));
        assert!(result_for(&results, "SW2").success());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let transport = Arc::new(StubTransport::default());
        let executor = Executor::new(
            Arc::clone(&transport) as Arc<dyn Transport>,
            ExecutorOptions {
                max_concurrency: 2,
                ..Default::default()
            },
        );
        let devices = fleet(8);
        let refs: Vec<&Device> = devices.iter().collect();

        let results = executor
            .execute(&refs, &Operation::read([Getter::Config]))
            .await;

        assert_eq!(results.len(), 8);
        assert!(transport.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_write_preserves_line_order() {
        let transport = Arc::new(StubTransport::default());
        let executor = Executor::new(
            Arc::clone(&transport) as Arc<dyn Transport>,
            ExecutorOptions::default(),
        );
        let devices = fleet(1);
        let lines = vec![
            "interface GigabitEthernet1/0/48".to_string(),
            "switchport access vlan 10".to_string(),
            "exit".to_string(),
        ];

        let results = executor
            .execute(&[&devices[0]], &Operation::write(lines.clone()))
            .await;

        let report = result_for(&results, "SW1")
            .payload()
            .and_then(Payload::as_write)
            .unwrap();
        assert_eq!(report.lines, lines);
        assert_eq!(
            *transport.pushed.lock().unwrap(),
            vec![("SW1".to_string(), lines)]
        );
    }

    #[tokio::test]
    async fn test_devices_sharing_a_name_keep_separate_results() {
        let transport = Arc::new(StubTransport {
            failing: vec!["SW1".to_string()],
            ..Default::default()
        });
        let executor = Executor::new(transport, ExecutorOptions::default());
        let devices = vec![
            Device::new("SW1", "10.0.0.1"),
            Device::new("SW1", "10.0.0.2"),
        ];
        let refs: Vec<&Device> = devices.iter().collect();

        let results = executor
            .execute(&refs, &Operation::read([Getter::Config]))
            .await;

        assert_eq!(results.len(), 2);
        let addresses: Vec<&str> = results.keys().map(|d| d.address.as_str()).collect();
        assert_eq!(addresses, vec!["10.0.0.1", "10.0.0.2"]);
        assert!(results.values().all(|r| r.device == "SW1" && !r.success()));
    }

    #[tokio::test]
    async fn test_empty_device_set() {
        let executor = Executor::new(Arc::new(StubTransport::default()), Default::default());
        let results = executor.execute(&[], &Operation::read([Getter::Vlans])).await;
        assert!(results.is_empty());
    }
}
