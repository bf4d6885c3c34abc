//! Services and packets.
//!
//! A service is an atomic unit of care performed in one care unit. A packet
//! bundles services that must all be scheduled on the same day to count as
//! fulfilled.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CareUnitId, PacketId, ServiceId};

/// Reference data for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Care unit performing the service.
    pub care_unit: CareUnitId,
    /// Service length in time slots.
    pub duration: i64,
    /// Service cost (consumed by the master problem only).
    pub cost: i64,
}

impl Service {
    /// Creates a service with zero cost.
    pub fn new(care_unit: impl Into<CareUnitId>, duration: i64) -> Self {
        Self {
            care_unit: care_unit.into(),
            duration,
            cost: 0,
        }
    }

    /// Sets the cost.
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }
}

/// `services.json`: Service → reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Services(BTreeMap<ServiceId, Service>);

impl Services {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service.
    pub fn with_service(mut self, id: impl Into<ServiceId>, service: Service) -> Self {
        self.0.insert(id.into(), service);
        self
    }

    /// Looks up a service.
    pub fn get(&self, id: &str) -> Option<&Service> {
        self.0.get(id)
    }

    /// Iterates services in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ServiceId, &Service)> {
        self.0.iter()
    }
}

/// `packets.json`: Packet → list of services.
///
/// The persisted list order is preserved; identity and naming only ever use
/// the sorted service set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Packets(BTreeMap<PacketId, Vec<ServiceId>>);

impl Packets {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a packet.
    pub fn with_packet<S: Into<ServiceId>>(
        mut self,
        id: impl Into<PacketId>,
        services: impl IntoIterator<Item = S>,
    ) -> Self {
        self.0
            .insert(id.into(), services.into_iter().map(Into::into).collect());
        self
    }

    /// Services of a packet.
    pub fn services(&self, id: &str) -> Option<&[ServiceId]> {
        self.0.get(id).map(Vec::as_slice)
    }

    /// Whether the packet exists.
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Iterates packets in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&PacketId, &Vec<ServiceId>)> {
        self.0.iter()
    }
}
