//! Fleet-wide MAC address location.
//!
//! A MAC table entry alone does not tell an attached host from a
//! forwarded one, so locating runs in two passes: a broadcast MAC table
//! lookup across the whole inventory, then a switchport query per
//! candidate interface on the device that reported it. Trunk ports and
//! port-channels never produce sightings.

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use switchctl_types::{is_aggregate_interface, normalize_interface, MacAddress};

use crate::error::{CoreError, CoreResult};
use crate::executor::Executor;
use crate::inventory::InventorySnapshot;
use crate::model::{Device, Getter, MacSighting, MacTableEntry, Operation};

/// A MAC table entry that survived the aggregate-port filter.
#[derive(Debug)]
struct Candidate<'a> {
    device: &'a Device,
    entry: MacTableEntry,
}

/// Locates `mac` behind access ports anywhere in the fleet.
///
/// Per-device failures in either pass are logged and skipped. The lookup
/// only fails, with [`CoreError::MacNotFound`], when no sighting
/// survives.
#[instrument(skip(executor, snapshot, mac), fields(mac = %mac.to_dotted(), devices = snapshot.len()))]
pub async fn locate_mac(
    executor: &Executor,
    snapshot: &InventorySnapshot,
    mac: MacAddress,
) -> CoreResult<Vec<MacSighting>> {
    let devices: Vec<&Device> = snapshot.devices().iter().collect();
    let lookup = Operation::read([Getter::MacAddressTable { address: Some(mac) }]);
    let results = executor.execute(&devices, &lookup).await;

    let mut candidates = Vec::new();
    for device in devices.iter().copied() {
        let Some(result) = results.get(device) else {
            continue;
        };
        let Some(table) = result.read().and_then(|r| r.mac_table()) else {
            if let Some(e) = result.error() {
                debug!(device = %device.name, error = %e, "Skipping device in MAC scan");
            }
            continue;
        };

        for entry in table.iter().filter(|e| e.mac == mac) {
            if is_access_candidate(entry) {
                candidates.push(Candidate {
                    device,
                    entry: entry.clone(),
                });
            } else {
                debug!(
                    device = %device.name,
                    destinations = ?entry.destinations(),
                    "Discarding aggregate or incomplete MAC entry"
                );
            }
        }
    }

    let confirmed = join_all(candidates.iter().map(|c| confirm(executor, c))).await;

    let mut sightings: Vec<MacSighting> = Vec::new();
    for sighting in confirmed.into_iter().flatten() {
        if !sightings.contains(&sighting) {
            sightings.push(sighting);
        }
    }

    if sightings.is_empty() {
        return Err(CoreError::MacNotFound {
            mac: mac.to_dotted(),
        });
    }

    info!(sightings = sightings.len(), "MAC address located");
    Ok(sightings)
}

/// True when every destination of `entry` is present and not an
/// aggregate port.
fn is_access_candidate(entry: &MacTableEntry) -> bool {
    let destinations = entry.destinations();
    !destinations.is_empty()
        && destinations
            .iter()
            .all(|d| !d.trim().is_empty() && !is_aggregate_interface(d))
}

/// Runs the switchport pass for one candidate.
///
/// A trunk on any destination drops the whole entry. An interface whose
/// switchport query fails is dropped on its own, since it cannot be
/// confirmed as an access port.
async fn confirm(executor: &Executor, candidate: &Candidate<'_>) -> Vec<MacSighting> {
    let device = candidate.device;
    let mut sightings = Vec::new();

    for interface in candidate.entry.destinations() {
        let op = Operation::read([Getter::Switchport {
            interface: interface.to_string(),
        }]);
        let mut results = executor.execute(&[device], &op).await;
        let Some(result) = results.remove(device) else {
            continue;
        };

        match result.read().and_then(|r| r.switchport()) {
            Some(info) if info.is_trunk() => {
                debug!(device = %device.name, interface, "Discarding MAC entry on trunk port");
                return Vec::new();
            }
            Some(_) => sightings.push(MacSighting {
                switch: device.name.clone(),
                interface: normalize_interface(interface.trim()),
                vlan: candidate.entry.vlan,
                mac_type: candidate.entry.mac_type.clone(),
            }),
            None => {
                if let Some(e) = result.error() {
                    warn!(device = %device.name, interface, error = %e, "Switchport query failed");
                }
            }
        }
    }

    sightings
}
