//! Conflict cores.
//!
//! A conflict core is the output of one infeasibility analysis: the days on
//! which a group of entangled obligations cannot all be scheduled, expressed
//! as deduplicated multipacket signatures.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::{CareUnitId, DayId, ServiceId};

/// One multipacket entry of a core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multipacket {
    /// How many patients in the core hold this exact service set.
    pub times: u32,
    /// Sorted, deduplicated services.
    pub services: Vec<ServiceId>,
}

/// A group of entangled obligations that cannot be repeated on `days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCore {
    /// Triggering day plus every day dominated by it on all affected units, sorted.
    pub days: Vec<DayId>,
    /// Signature → occurrence count and services.
    pub multipackets: BTreeMap<String, Multipacket>,
    /// Care units reached by the closure, sorted.
    pub affected_care_units: Vec<CareUnitId>,
}

impl ConflictCore {
    /// Total number of patient groups folded into this core.
    pub fn group_count(&self) -> u32 {
        self.multipackets.values().map(|m| m.times).sum()
    }
}

/// Ordered cores of one analysis pass.
///
/// Serialized as a map from `core<NN>` (zero-padded position) to core, the
/// persisted `cores.json` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictCores(Vec<ConflictCore>);

impl ConflictCores {
    /// Wraps cores in emission order.
    pub fn new(cores: Vec<ConflictCore>) -> Self {
        Self(cores)
    }

    /// Persisted key of the core at `index`.
    pub fn key(index: usize) -> String {
        format!("core{index:02}")
    }

    /// Number of cores.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no core was produced.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cores in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &ConflictCore> {
        self.0.iter()
    }

    /// Core at `index`.
    pub fn get(&self, index: usize) -> Option<&ConflictCore> {
        self.0.get(index)
    }

    /// Unwraps into the inner vector.
    pub fn into_inner(self) -> Vec<ConflictCore> {
        self.0
    }
}

impl Serialize for ConflictCores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, core) in self.0.iter().enumerate() {
            map.serialize_entry(&Self::key(index), core)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConflictCores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Keys past core99 widen, so order by numeric suffix rather than text.
        let raw: BTreeMap<String, ConflictCore> = BTreeMap::deserialize(deserializer)?;
        let mut indexed: Vec<(usize, ConflictCore)> = Vec::with_capacity(raw.len());
        for (key, core) in raw {
            let index = key
                .strip_prefix("core")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid core key '{key}'")))?;
            indexed.push((index, core));
        }
        indexed.sort_by_key(|(index, _)| *index);
        Ok(Self(indexed.into_iter().map(|(_, core)| core).collect()))
    }
}
